//! アップロード結合テスト
//!
//! ローカルに立てたテスト用サーバへ実際に送信して、画面状態の遷移を検証

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use object_measure::client::HttpClient;
use object_measure::local_image::LocalImage;
use object_measure::session::run_analysis;
use object_measure_common::{
    ImageFile, MemoryView, Section, DECODE_FAILED_MESSAGE, DEFAULT_MAX_UPLOAD_BYTES, INVALID_FILE_MESSAGE,
    PROCESSING_FAILED_MESSAGE,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    len: usize,
}

#[derive(Clone)]
enum Reply {
    Json(StatusCode, serde_json::Value),
    Text(StatusCode, &'static str),
    Stall,
}

#[derive(Clone)]
struct ServerState {
    reply: Reply,
    received: Arc<Mutex<Vec<ReceivedField>>>,
}

async fn handle_upload(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        state.received.lock().unwrap().push(ReceivedField {
            name,
            file_name,
            content_type,
            len,
        });
    }

    match state.reply {
        Reply::Json(status, body) => (status, Json(body)).into_response(),
        Reply::Text(status, text) => (status, text).into_response(),
        Reply::Stall => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK.into_response()
        }
    }
}

async fn handle_result_image() -> Response {
    ([(header::CONTENT_TYPE, "image/png")], png_bytes()).into_response()
}

async fn spawn_server(reply: Reply) -> (String, Arc<Mutex<Vec<ReceivedField>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        reply,
        received: Arc::clone(&received),
    };
    let app = Router::new()
        .route("/upload", post(handle_upload))
        .route("/results/:name", get(handle_result_image))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), received)
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 30, 30]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

fn client(url: &str) -> HttpClient {
    HttpClient::new(url, Duration::from_secs(10)).expect("client")
}

fn ten_objects() -> serde_json::Value {
    json!({
        "success": true,
        "result_image": "/results/result_1700000000_coins.png",
        "object_count": 10,
        "object_sizes": [100.4, 200.1, 150.5, 300.0, 250.2, 180.0, 320.3, 290.9, 330.1, 335.2],
        "total_area": 2456.7
    })
}

/// 解析成功 → 結果表示
#[tokio::test]
async fn test_upload_success_renders_result() {
    let (url, received) = spawn_server(Reply::Json(StatusCode::OK, ten_objects())).await;
    let image = LocalImage::from_bytes("coins.png", png_bytes());
    let expected_len = image.size() as usize;

    let controller = run_analysis(MemoryView::new(), image, &client(&url), DEFAULT_MAX_UPLOAD_BYTES).await;

    assert_eq!(controller.section(), Section::Result);
    let view = controller.view();
    assert_eq!(view.visible_sections(), vec![Section::Result]);
    assert!(view.preview.starts_with("data:image/png;base64,"));

    let rendered = view.result.as_ref().expect("rendered");
    assert_eq!(rendered.object_count, "10");
    assert_eq!(rendered.total_area, "2,457");
    assert_eq!(rendered.average_area, "246");
    assert_eq!(rendered.objects.len(), 10);
    assert_eq!(rendered.objects[0].label, "Object 1");
    assert_eq!(rendered.objects[0].area, "100");
    assert_eq!(rendered.objects[9].label, "Object 10");

    let fields = received.lock().unwrap().clone();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "file");
    assert_eq!(fields[0].file_name.as_deref(), Some("coins.png"));
    assert_eq!(fields[0].content_type.as_deref(), Some("image/png"));
    assert_eq!(fields[0].len, expected_len);
}

/// サーバ側エラー（HTTP 400）→ メッセージをそのまま表示
#[tokio::test]
async fn test_server_error_message_is_shown() {
    let (url, _) = spawn_server(Reply::Json(
        StatusCode::BAD_REQUEST,
        json!({ "error": "no objects detected" }),
    ))
    .await;
    let image = LocalImage::from_bytes("coins.png", png_bytes());

    let controller = run_analysis(MemoryView::new(), image, &client(&url), DEFAULT_MAX_UPLOAD_BYTES).await;

    assert_eq!(controller.section(), Section::Error);
    assert_eq!(controller.view().error_text, "no objects detected");
    assert!(!controller.view().is_visible(Section::Result));
}

/// JSONでないレスポンス → 汎用メッセージ
#[tokio::test]
async fn test_non_json_response_uses_generic_message() {
    let (url, _) = spawn_server(Reply::Text(
        StatusCode::INTERNAL_SERVER_ERROR,
        "<h1>Internal Server Error</h1>",
    ))
    .await;
    let image = LocalImage::from_bytes("coins.png", png_bytes());

    let controller = run_analysis(MemoryView::new(), image, &client(&url), DEFAULT_MAX_UPLOAD_BYTES).await;

    assert_eq!(controller.section(), Section::Error);
    assert_eq!(controller.view().error_text, PROCESSING_FAILED_MESSAGE);
}

/// 接続できない → 汎用メッセージ（例外内容は表示しない）
#[tokio::test]
async fn test_connection_refused_uses_generic_message() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let image = LocalImage::from_bytes("coins.png", png_bytes());
    let controller = run_analysis(
        MemoryView::new(),
        image,
        &client(&format!("http://{addr}")),
        DEFAULT_MAX_UPLOAD_BYTES,
    )
    .await;

    assert_eq!(controller.section(), Section::Error);
    assert_eq!(controller.view().error_text, PROCESSING_FAILED_MESSAGE);
    assert!(!controller.view().error_text.contains("refused"));
}

/// 応答しないサーバ → タイムアウトで汎用メッセージ
#[tokio::test]
async fn test_timeout_uses_generic_message() {
    let (url, _) = spawn_server(Reply::Stall).await;
    let image = LocalImage::from_bytes("coins.png", png_bytes());
    let client = HttpClient::new(&url, Duration::from_millis(300)).expect("client");

    let controller = run_analysis(MemoryView::new(), image, &client, DEFAULT_MAX_UPLOAD_BYTES).await;

    assert_eq!(controller.section(), Section::Error);
    assert_eq!(controller.view().error_text, PROCESSING_FAILED_MESSAGE);
}

/// 画像以外 → 送信せずにエラー
#[tokio::test]
async fn test_non_image_is_not_sent() {
    let (url, received) = spawn_server(Reply::Json(StatusCode::OK, ten_objects())).await;
    let file = LocalImage::from_bytes("notes.txt", b"hello".to_vec());

    let controller = run_analysis(MemoryView::new(), file, &client(&url), DEFAULT_MAX_UPLOAD_BYTES).await;

    assert_eq!(controller.section(), Section::Error);
    assert_eq!(controller.view().error_text, INVALID_FILE_MESSAGE);
    assert!(controller.view().preview.is_empty());
    assert!(received.lock().unwrap().is_empty());
}

/// 壊れた画像 → デコード失敗、送信しない
#[tokio::test]
async fn test_corrupt_image_is_not_sent() {
    let (url, received) = spawn_server(Reply::Json(StatusCode::OK, ten_objects())).await;
    let file = LocalImage::from_bytes("broken.png", b"definitely not a png".to_vec());

    let controller = run_analysis(MemoryView::new(), file, &client(&url), DEFAULT_MAX_UPLOAD_BYTES).await;

    assert_eq!(controller.section(), Section::Error);
    assert_eq!(controller.view().error_text, DECODE_FAILED_MESSAGE);
    assert!(received.lock().unwrap().is_empty());
}

/// 上限サイズ超過 → 送信しない
#[tokio::test]
async fn test_oversized_image_is_not_sent() {
    let (url, received) = spawn_server(Reply::Json(StatusCode::OK, ten_objects())).await;
    let image = LocalImage::from_bytes("coins.png", png_bytes());

    let controller = run_analysis(MemoryView::new(), image, &client(&url), 16).await;

    assert_eq!(controller.section(), Section::Error);
    assert!(controller.view().error_text.contains("too large"));
    assert!(received.lock().unwrap().is_empty());
}

/// ディスク上の巨大な非画像ファイル → 開いても読み込まず、送信しない
#[tokio::test]
async fn test_large_video_on_disk_is_rejected_without_sending() {
    let (url, received) = spawn_server(Reply::Json(StatusCode::OK, ten_objects())).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("movie.mp4");
    std::fs::File::create(&path).unwrap().set_len(300 * 1024 * 1024).unwrap();

    let video = LocalImage::open(&path).expect("open");
    assert_eq!(video.size(), 300 * 1024 * 1024);

    let controller = run_analysis(MemoryView::new(), video, &client(&url), DEFAULT_MAX_UPLOAD_BYTES).await;

    assert_eq!(controller.section(), Section::Error);
    assert_eq!(controller.view().error_text, INVALID_FILE_MESSAGE);
    assert!(received.lock().unwrap().is_empty());
}

/// ディスク上の巨大な画像ファイル → サイズ上限で弾き、送信しない
#[tokio::test]
async fn test_large_image_on_disk_is_rejected_by_size() {
    let (url, received) = spawn_server(Reply::Json(StatusCode::OK, ten_objects())).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("huge.png");
    std::fs::File::create(&path).unwrap().set_len(DEFAULT_MAX_UPLOAD_BYTES + 1).unwrap();

    let image = LocalImage::open(&path).expect("open");
    let controller = run_analysis(MemoryView::new(), image, &client(&url), DEFAULT_MAX_UPLOAD_BYTES).await;

    assert_eq!(controller.section(), Section::Error);
    assert_eq!(
        controller.view().error_text,
        "The selected image is too large. The limit is 16 MB."
    );
    assert!(received.lock().unwrap().is_empty());
}

/// 開いた後に読めなくなったファイル → デコード失敗としてエラー表示
#[tokio::test]
async fn test_unreadable_file_shows_decode_error() {
    let (url, received) = spawn_server(Reply::Json(StatusCode::OK, ten_objects())).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("coins.png");
    std::fs::write(&path, png_bytes()).unwrap();

    let image = LocalImage::open(&path).expect("open");
    std::fs::remove_file(&path).unwrap();

    let controller = run_analysis(MemoryView::new(), image, &client(&url), DEFAULT_MAX_UPLOAD_BYTES).await;

    assert_eq!(controller.section(), Section::Error);
    assert_eq!(controller.view().error_text, DECODE_FAILED_MESSAGE);
    assert!(received.lock().unwrap().is_empty());
}

/// ディスクから開いた画像も送信時に読み込まれる
#[tokio::test]
async fn test_image_opened_from_disk_is_sent() {
    let (url, received) = spawn_server(Reply::Json(StatusCode::OK, ten_objects())).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("coins.png");
    std::fs::write(&path, png_bytes()).unwrap();

    let image = LocalImage::open(&path).expect("open");
    let controller = run_analysis(MemoryView::new(), image, &client(&url), DEFAULT_MAX_UPLOAD_BYTES).await;

    assert_eq!(controller.section(), Section::Result);
    let fields = received.lock().unwrap().clone();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].len, png_bytes().len());
}

/// 結果画像のダウンロード
#[tokio::test]
async fn test_save_result_image() {
    let (url, _) = spawn_server(Reply::Json(StatusCode::OK, ten_objects())).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let dest = dir.path().join("result.png");

    let written = client(&url)
        .save_result_image("/results/result_1700000000_coins.png", &dest)
        .await
        .expect("download");

    let saved = std::fs::read(&dest).unwrap();
    assert_eq!(written as usize, saved.len());
    assert_eq!(saved, png_bytes());
}

/// Data URL形式の結果画像はそのまま保存
#[tokio::test]
async fn test_save_result_image_from_data_url() {
    let dir = tempdir().expect("Failed to create temp dir");
    let dest = dir.path().join("result.png");

    let written = client("http://127.0.0.1:9")
        .save_result_image("data:image/png;base64,iVBORw0KGgo=", &dest)
        .await
        .expect("save");

    assert_eq!(written, 8);
    assert_eq!(std::fs::read(&dest).unwrap(), b"\x89PNG\r\n\x1a\n");
}
