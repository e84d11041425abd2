//! ビューバインディング
//!
//! コントローラは画面要素を直接触らず、このトレイト経由で表示を更新する。

use crate::format::RenderedResult;
use crate::section::Section;

/// 画面への書き込み口
pub trait View {
    /// セクションの表示/非表示
    fn set_section_visible(&mut self, section: Section, visible: bool);

    /// プレビュー画像のソース（空文字でクリア）
    fn set_preview(&mut self, data_url: &str);

    /// 解析結果を描画（前回の内容は全て置き換える）
    fn render_result(&mut self, rendered: &RenderedResult);

    fn clear_result(&mut self);

    /// エラーメッセージ（空文字でクリア）
    fn set_error_text(&mut self, message: &str);

    /// ファイル入力の値をクリア（同じファイルを再選択できるように）
    fn clear_file_input(&mut self);
}

/// メモリ上のビュー（テスト・ヘッドレス実行用）
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    visible: [bool; 5],
    pub preview: String,
    pub error_text: String,
    pub result: Option<RenderedResult>,
    pub input_clears: usize,
    pub renders: usize,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.visible[index_of(section)]
    }

    pub fn visible_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.is_visible(*s))
            .collect()
    }
}

fn index_of(section: Section) -> usize {
    match section {
        Section::Upload => 0,
        Section::Preview => 1,
        Section::Loading => 2,
        Section::Result => 3,
        Section::Error => 4,
    }
}

impl View for MemoryView {
    fn set_section_visible(&mut self, section: Section, visible: bool) {
        self.visible[index_of(section)] = visible;
    }

    fn set_preview(&mut self, data_url: &str) {
        self.preview = data_url.to_string();
    }

    fn render_result(&mut self, rendered: &RenderedResult) {
        self.result = Some(rendered.clone());
        self.renders += 1;
    }

    fn clear_result(&mut self) {
        self.result = None;
    }

    fn set_error_text(&mut self, message: &str) {
        self.error_text = message.to_string();
    }

    fn clear_file_input(&mut self) {
        self.input_clears += 1;
    }
}
