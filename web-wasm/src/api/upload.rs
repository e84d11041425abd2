//! 解析サービスへの送信（fetch + FormData）

use object_measure_common::{Error, Result, Transport, UPLOAD_FIELD, UPLOAD_PATH};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, Response};

use super::file::BrowserFile;

/// ページと同じオリジンの `/upload` に送る
#[derive(Debug, Clone)]
pub struct FetchTransport {
    url: String,
}

impl FetchTransport {
    pub fn same_origin() -> Self {
        Self {
            url: UPLOAD_PATH.to_string(),
        }
    }

    async fn post(&self, file: &BrowserFile) -> std::result::Result<String, JsValue> {
        let form = FormData::new()?;
        form.append_with_blob_and_filename(UPLOAD_FIELD, &file.0, &file.0.name())?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&form);

        let request = Request::new_with_str_and_init(&self.url, &opts)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        // ステータスに関係なくボディで判定する
        let text = JsFuture::from(resp.text()?).await?;
        text.as_string()
            .ok_or_else(|| JsValue::from_str("response body is not text"))
    }
}

/// 失敗の詳細はコントローラが `tracing` で記録する
impl Transport<BrowserFile> for FetchTransport {
    async fn upload(&self, file: &BrowserFile) -> Result<String> {
        self.post(file)
            .await
            .map_err(|err| Error::Transport(format!("{:?}", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_origin_url() {
        assert_eq!(FetchTransport::same_origin().url, "/upload");
    }
}
