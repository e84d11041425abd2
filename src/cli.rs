use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "object-measure")]
#[command(about = "画像をアップロードして物体の数と面積を計測する", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を解析サービスへ送信して結果を表示
    Analyze {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 解析サーバのURL（省略時は設定ファイル / OBJECT_MEASURE_SERVER）
        #[arg(short, long)]
        server: Option<String>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,

        /// 結果画像の保存先
        #[arg(long)]
        save_result: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 解析サーバのURLを設定
        #[arg(long)]
        set_server: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
