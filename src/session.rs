//! 1枚の画像を選択 → プレビュー → 送信 まで進める

use crate::client::HttpClient;
use crate::local_image::{LocalDecoder, LocalImage};
use object_measure_common::{Section, View, ViewController};

/// コントローラを最後まで進めて返す
///
/// プレビューに到達しなければ送信しない。終了時のセクションは
/// `Result` か `Error` のどちらか。
pub async fn run_analysis<V: View>(
    view: V,
    image: LocalImage,
    client: &HttpClient,
    max_upload_bytes: u64,
) -> ViewController<V, LocalImage> {
    let mut controller = ViewController::new(view).with_max_upload_bytes(max_upload_bytes);

    let section = controller.select_and_decode(Some(image), &LocalDecoder).await;
    if section == Section::Preview {
        controller.submit_with(client).await;
    }

    controller
}

/// 終了時のセクションからプロセスの終了コードを決める
///
/// エラー内容はビューが表示済みなので、ここでは数値だけを返す。
pub fn exit_status(section: Section) -> u8 {
    match section {
        Section::Result => 0,
        _ => 1,
    }
}
