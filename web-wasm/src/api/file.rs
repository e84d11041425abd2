//! 選択ファイルの読み込み

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use object_measure_common::{Decoder, Error, ImageFile, Result};
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader, ProgressEvent};

/// `<input type="file">` やドロップで得た File
#[derive(Debug, Clone)]
pub struct BrowserFile(pub File);

impl ImageFile for BrowserFile {
    fn file_name(&self) -> String {
        self.0.name()
    }

    fn mime_type(&self) -> String {
        self.0.type_()
    }

    fn size(&self) -> u64 {
        self.0.size() as u64
    }
}

/// FileReader.readAsDataURL でプレビュー用のData URLを得る
#[derive(Debug, Clone, Copy, Default)]
pub struct FileReaderDecoder;

impl Decoder<BrowserFile> for FileReaderDecoder {
    async fn decode(&self, file: &BrowserFile) -> Result<String> {
        let reader = FileReader::new().map_err(js_error)?;
        let (tx, rx) = oneshot::channel::<Result<String>>();
        let tx = Rc::new(RefCell::new(Some(tx)));

        let onload = {
            let tx = Rc::clone(&tx);
            let reader = reader.clone();
            Closure::wrap(Box::new(move |_: ProgressEvent| {
                let outcome = reader
                    .result()
                    .ok()
                    .and_then(|value| value.as_string())
                    .ok_or_else(|| Error::Decode("reader returned no data URL".to_string()));
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(outcome);
                }
            }) as Box<dyn FnMut(_)>)
        };

        let onerror = {
            let tx = Rc::clone(&tx);
            Closure::wrap(Box::new(move |_: ProgressEvent| {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(Err(Error::Decode("file could not be read".to_string())));
                }
            }) as Box<dyn FnMut(_)>)
        };

        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        reader.read_as_data_url(&file.0).map_err(js_error)?;

        let outcome = rx
            .await
            .unwrap_or_else(|_| Err(Error::Decode("reader dropped".to_string())));

        reader.set_onload(None);
        reader.set_onerror(None);
        outcome
    }
}

fn js_error(value: JsValue) -> Error {
    Error::Decode(format!("{:?}", value))
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::FilePropertyBag;

    wasm_bindgen_test_configure!(run_in_browser);

    fn file(name: &str, mime: &str, bytes: &[u8]) -> BrowserFile {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let opts = FilePropertyBag::new();
        opts.set_type(mime);
        BrowserFile(File::new_with_u8_array_sequence_and_options(&parts, name, &opts).unwrap())
    }

    #[wasm_bindgen_test]
    fn browser_file_reports_name_type_and_size() {
        let png = file("coins.png", "image/png", &[1, 2, 3]);
        assert_eq!(png.file_name(), "coins.png");
        assert_eq!(png.mime_type(), "image/png");
        assert_eq!(png.size(), 3);
        assert!(png.is_image());

        assert!(!file("notes.txt", "text/plain", b"hi").is_image());
    }

    #[wasm_bindgen_test]
    async fn decoder_reads_file_as_data_url() {
        let png = file("coins.png", "image/png", &[1, 2, 3]);
        let data_url = FileReaderDecoder.decode(&png).await.unwrap();
        assert_eq!(data_url, "data:image/png;base64,AQID");
    }
}
