//! ローカル画像ファイル
//!
//! ディスク上の画像を、コントローラの `ImageFile` として扱う。
//! 開いた時点ではメタデータだけを読み、本体はデコード・送信時に読む。

use crate::error::{MeasureError, Result};
use image::ImageFormat;
use object_measure_common::{encode_data_url, Decoder, Error as CommonError, ImageFile};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const UNKNOWN_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct LocalImage {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    size: u64,
    /// ドロップ等で渡されたメモリ上のデータ（なければ `path` から読む）
    data: Option<Arc<[u8]>>,
}

impl LocalImage {
    pub fn open(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|_| MeasureError::FileNotFound(path.display().to_string()))?;
        if !metadata.is_file() {
            return Err(MeasureError::FileNotFound(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            mime_type: mime_for_name(&file_name),
            file_name,
            size: metadata.len(),
            data: None,
        })
    }

    /// ドロップ等でバイト列だけ渡された場合
    pub fn from_bytes(file_name: &str, bytes: impl Into<Arc<[u8]>>) -> Self {
        let data: Arc<[u8]> = bytes.into();
        Self {
            path: PathBuf::from(file_name),
            file_name: file_name.to_string(),
            mime_type: mime_for_name(file_name),
            size: data.len() as u64,
            data: Some(data),
        }
    }

    /// ファイル本体を読む（ブロッキング）
    pub fn load(&self) -> Result<Arc<[u8]>> {
        match &self.data {
            Some(data) => Ok(Arc::clone(data)),
            None => Ok(std::fs::read(&self.path)?.into()),
        }
    }
}

/// 拡張子からMIMEタイプを判定（ブラウザの File.type 相当）
pub fn mime_for_name(file_name: &str) -> String {
    ImageFormat::from_path(file_name)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_MIME.to_string())
}

impl ImageFile for LocalImage {
    fn file_name(&self) -> String {
        self.file_name.clone()
    }

    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// 読み込んで画像として読めるか確認してからData URLに変換する
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDecoder;

impl Decoder<LocalImage> for LocalDecoder {
    async fn decode(&self, file: &LocalImage) -> object_measure_common::Result<String> {
        let image = file.clone();
        let bytes = tokio::task::spawn_blocking(move || {
            let bytes = image.load().map_err(|e| e.to_string())?;
            image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
            Ok::<_, String>(bytes)
        })
        .await
        .map_err(|e| CommonError::Decode(e.to_string()))?
        .map_err(CommonError::Decode)?;

        Ok(encode_data_url(&file.mime_type, &bytes))
    }
}
