use object_measure_common::{RenderedResult, Section, View};

/// egui用のビュー状態
///
/// コントローラから書き込まれ、毎フレームこれを見て描画する。
#[derive(Debug, Clone, Default)]
pub struct EguiView {
    visible: Vec<Section>,
    pub preview_len: usize,
    pub error_text: String,
    pub result: Option<RenderedResult>,
    pub input_generation: u64,
}

impl EguiView {
    pub fn is_visible(&self, section: Section) -> bool {
        self.visible.contains(&section)
    }
}

impl View for EguiView {
    fn set_section_visible(&mut self, section: Section, visible: bool) {
        self.visible.retain(|s| *s != section);
        if visible {
            self.visible.push(section);
        }
    }

    fn set_preview(&mut self, data_url: &str) {
        self.preview_len = data_url.len();
    }

    fn render_result(&mut self, rendered: &RenderedResult) {
        self.result = Some(rendered.clone());
    }

    fn clear_result(&mut self) {
        self.result = None;
    }

    fn set_error_text(&mut self, message: &str) {
        self.error_text = message.to_string();
    }

    // ファイルダイアログは毎回新しく開くので、世代だけ進める
    fn clear_file_input(&mut self) {
        self.input_generation += 1;
    }
}
