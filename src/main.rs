use clap::Parser;
use object_measure::{cli, client, config, error, local_image, session, terminal};
use cli::{Cli, Commands};
use config::Config;
use error::{MeasureError, Result};
use object_measure_common::Section;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("✖ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, server, json, save_result } => {
            let server_url = server.unwrap_or_else(|| config.server_url());
            let client = client::HttpClient::new(
                &server_url,
                Duration::from_secs(config.timeout_seconds),
            )?;

            let image = local_image::LocalImage::open(&image)?;
            if !json {
                println!("📏 object-measure - 物体サイズ計測\n");
                println!("- 画像: {} ({})", image.file_name, image.mime_type);
                println!("- サーバ: {}", client.base_url());
            }

            let controller = session::run_analysis(
                terminal::TerminalView::new(json),
                image,
                &client,
                config.max_upload_bytes,
            )
            .await;

            match controller.section() {
                Section::Result => {
                    let Some(result) = controller.result() else {
                        return Err(MeasureError::AnalysisFailed("結果がありません".into()));
                    };

                    if json {
                        println!("{}", serde_json::to_string_pretty(result)?);
                    }

                    if let Some(dest) = save_result {
                        client.save_result_image(&result.result_image, &dest).await?;
                        if !json {
                            println!("\n✔ 結果画像を保存: {}", dest.display());
                        }
                    }

                    if !json {
                        println!("\n✅ 解析完了");
                    }
                }
                // エラー表示はビューが済ませている（--json のときはここで出す）
                Section::Error if json => {
                    let message = controller.error_message().unwrap_or_default();
                    println!("{}", serde_json::json!({ "error": message }));
                }
                _ => {}
            }

            Ok(ExitCode::from(session::exit_status(controller.section())))
        }

        Commands::Config { set_server, show } => {
            let mut config = config;

            if let Some(url) = set_server {
                config.set_server_url(url)?;
                println!("✔ サーバURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  サーバURL: {}", config.server_url());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  最大アップロードサイズ: {} bytes", config.max_upload_bytes);
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
