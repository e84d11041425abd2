use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use object_measure::client::HttpClient;
use object_measure::local_image::LocalImage;
use object_measure_common::{encode_data_url, Transport};

const PREVIEW_SIZE: (u32, u32) = (640, 480);

/// テクスチャ化する前のRGBA画素
pub struct Thumb {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

pub fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Image", &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"])
        .pick_file()
}

pub fn load_local(path: &Path) -> Result<LocalImage> {
    LocalImage::open(path).with_context(|| format!("open {}", path.display()))
}

/// ファイルを読み、画像として読めるか確認してData URLとプレビュー用の縮小画像を作る
///
/// ワーカースレッドで呼ぶ。
pub fn decode_preview(image: &LocalImage) -> Result<(String, Thumb)> {
    let bytes = image.load().with_context(|| format!("read {}", image.path.display()))?;
    let thumb = thumbnail(&bytes).with_context(|| format!("decode {}", image.file_name))?;
    Ok((encode_data_url(&image.mime_type, &bytes), thumb))
}

/// ワーカースレッドから送信（スレッドごとに小さいランタイムを作る）
pub fn upload_blocking(client: &HttpClient, image: &LocalImage) -> object_measure_common::Result<String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(client.upload(image))
}

pub fn fetch_result_thumb(client: &HttpClient, source: &str) -> Result<Thumb> {
    let bytes = fetch_result_bytes(client, source)?;
    thumbnail(&bytes).context("decode result image")
}

pub fn save_result_image(client: &HttpClient, source: &str, dest: &Path) -> Result<()> {
    let bytes = fetch_result_bytes(client, source)?;
    std::fs::write(dest, bytes).with_context(|| format!("write {}", dest.display()))?;
    Ok(())
}

fn fetch_result_bytes(client: &HttpClient, source: &str) -> Result<Vec<u8>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let bytes = runtime
        .block_on(client.fetch_result_image(source))
        .with_context(|| format!("fetch {source}"))?;
    Ok(bytes)
}

fn thumbnail(bytes: &[u8]) -> Result<Thumb> {
    let image = image::load_from_memory(bytes)?;
    let thumb = image.thumbnail(PREVIEW_SIZE.0, PREVIEW_SIZE.1);
    Ok(Thumb {
        size: [thumb.width() as usize, thumb.height() as usize],
        pixels: thumb.to_rgba8().into_raw(),
    })
}
