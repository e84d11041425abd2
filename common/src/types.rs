//! 解析結果と選択画像の型定義
//!
//! - AnalysisResult: 解析サービスの成功レスポンス
//! - ImageFile: ホストごとのファイルハンドル（ブラウザのFile、ローカルファイル等）
//! - SelectedImage: 選択中の画像とプレビュー用Data URL

use serde::{Deserialize, Serialize};

/// 解析サービスの成功レスポンス
///
/// `object_sizes` の長さは `object_count` と一致する（パーサーで検証済み）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 検出された物体数
    pub object_count: u64,

    /// 面積の合計（px²）
    pub total_area: f64,

    /// 物体ごとの面積（検出順）
    pub object_sizes: Vec<f64>,

    /// 結果画像（URL、サーバ相対パス、またはData URL）
    pub result_image: String,
}

/// ホストが提供するファイルハンドル
pub trait ImageFile: Clone {
    fn file_name(&self) -> String;

    /// MIMEタイプ（不明な場合は空文字）
    fn mime_type(&self) -> String;

    /// バイト数
    fn size(&self) -> u64;

    fn is_image(&self) -> bool {
        self.mime_type().starts_with("image/")
    }
}

/// 選択中の画像
#[derive(Debug, Clone)]
pub struct SelectedImage<F> {
    pub file: F,
    /// デコード完了までは None
    pub preview: Option<String>,
}

impl<F> SelectedImage<F> {
    pub fn new(file: F) -> Self {
        Self { file, preview: None }
    }

    pub fn is_decoded(&self) -> bool {
        self.preview.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Named(&'static str);

    impl ImageFile for Named {
        fn file_name(&self) -> String {
            "x".into()
        }
        fn mime_type(&self) -> String {
            self.0.into()
        }
        fn size(&self) -> u64 {
            0
        }
    }

    #[test]
    fn test_is_image_by_mime_prefix() {
        assert!(Named("image/png").is_image());
        assert!(Named("image/svg+xml").is_image());
        assert!(!Named("text/plain").is_image());
        assert!(!Named("").is_image());
        assert!(!Named("application/image").is_image());
    }

    #[test]
    fn test_analysis_result_ignores_extra_fields() {
        let json = r#"{
            "success": true,
            "object_count": 2,
            "total_area": 300.5,
            "object_sizes": [100.25, 200.25],
            "result_image": "/results/result_1_a.png"
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.object_count, 2);
        assert_eq!(result.object_sizes, vec![100.25, 200.25]);
        assert_eq!(result.result_image, "/results/result_1_a.png");
    }

    #[test]
    fn test_selected_image_starts_undecoded() {
        let mut selected = SelectedImage::new(Named("image/png"));
        assert!(!selected.is_decoded());
        selected.preview = Some("data:image/png;base64,AA==".into());
        assert!(selected.is_decoded());
    }
}
