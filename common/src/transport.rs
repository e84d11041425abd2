//! ホストが実装する非同期処理の境界
//!
//! - Decoder: ファイル → プレビュー用Data URL
//! - Transport: ファイル → `POST /upload` のレスポンスボディ

use crate::error::{Error, Result};
use crate::types::ImageFile;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// アップロード先のパス
pub const UPLOAD_PATH: &str = "/upload";

/// multipartのフィールド名
pub const UPLOAD_FIELD: &str = "file";

/// 画像を解析サービスへ送信する
///
/// HTTPステータスに関わらずボディを返す。接続失敗・タイムアウト等は `Err`。
#[allow(async_fn_in_trait)]
pub trait Transport<F: ImageFile> {
    async fn upload(&self, file: &F) -> Result<String>;
}

/// 画像をプレビュー用Data URLに変換する
#[allow(async_fn_in_trait)]
pub trait Decoder<F: ImageFile> {
    async fn decode(&self, file: &F) -> Result<String>;
}

/// Data URLを生成
///
/// # Examples
/// ```
/// use object_measure_common::encode_data_url;
///
/// assert_eq!(encode_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
/// ```
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// base64形式のData URLから (MIMEタイプ, バイト列) を取り出す
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>)> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| Error::Decode("not a data URL".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Decode("data URL has no payload".into()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::Decode("data URL is not base64 encoded".into()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::Decode(e.to_string()))?;
    Ok((mime_type.to_string(), bytes))
}
