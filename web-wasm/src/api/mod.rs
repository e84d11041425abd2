//! ブラウザ側の非同期処理（ファイル読み込み・送信）

pub mod file;
pub mod upload;

pub use file::{BrowserFile, FileReaderDecoder};
pub use upload::FetchTransport;
