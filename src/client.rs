//! 解析サービスへのHTTPクライアント

use crate::error::{MeasureError, Result};
use crate::local_image::LocalImage;
use object_measure_common::{decode_data_url, Error as CommonError, Transport, UPLOAD_FIELD, UPLOAD_PATH};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(server_url)
            .map_err(|e| MeasureError::InvalidUrl(format!("{}: {}", server_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(MeasureError::InvalidUrl(server_url.to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn upload_url(&self) -> Result<Url> {
        self.resolve(UPLOAD_PATH)
    }

    /// 結果画像のソースを絶対URLにする（`/results/...` 等の相対パスに対応）
    pub fn resolve(&self, source: &str) -> Result<Url> {
        self.base_url
            .join(source)
            .map_err(|e| MeasureError::InvalidUrl(format!("{}: {}", source, e)))
    }

    /// 結果画像のバイト列を取得（Data URLならデコードする）
    pub async fn fetch_result_image(&self, source: &str) -> Result<Vec<u8>> {
        if source.starts_with("data:") {
            return Ok(decode_data_url(source)?.1);
        }

        let url = self.resolve(source)?;
        debug!(%url, "downloading result image");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    /// 結果画像をファイルに保存
    pub async fn save_result_image(&self, source: &str, dest: &Path) -> Result<u64> {
        let bytes = self.fetch_result_image(source).await?;
        std::fs::write(dest, &bytes)?;
        info!(path = %dest.display(), bytes = bytes.len(), "result image saved");
        Ok(bytes.len() as u64)
    }
}

impl Transport<LocalImage> for HttpClient {
    async fn upload(&self, file: &LocalImage) -> object_measure_common::Result<String> {
        let url = self
            .upload_url()
            .map_err(|e| CommonError::Transport(e.to_string()))?;

        let image = file.clone();
        let bytes = tokio::task::spawn_blocking(move || image.load())
            .await
            .map_err(|e| CommonError::Transport(e.to_string()))?
            .map_err(|e| CommonError::Transport(e.to_string()))?;

        let part = Part::bytes(bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| CommonError::Transport(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CommonError::Transport(e.to_string()))?;

        debug!(status = %response.status(), "upload response received");

        response
            .text()
            .await
            .map_err(|e| CommonError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> HttpClient {
        HttpClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_upload_url() {
        assert_eq!(
            client("http://localhost:5000").upload_url().unwrap().as_str(),
            "http://localhost:5000/upload"
        );
        assert_eq!(
            client("http://example.com/app/").upload_url().unwrap().as_str(),
            "http://example.com/upload"
        );
    }

    #[test]
    fn test_resolve_result_image() {
        let c = client("http://localhost:5000");
        assert_eq!(
            c.resolve("/results/result_1_coins.png").unwrap().as_str(),
            "http://localhost:5000/results/result_1_coins.png"
        );
        assert_eq!(
            c.resolve("https://cdn.example.com/r.png").unwrap().as_str(),
            "https://cdn.example.com/r.png"
        );
    }

    #[test]
    fn test_invalid_server_url() {
        assert!(matches!(
            HttpClient::new("not a url", Duration::from_secs(1)),
            Err(MeasureError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpClient::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(MeasureError::InvalidUrl(_))
        ));
    }
}
