//! ターミナル出力のビュー

use object_measure_common::{RenderedResult, Section, View, AREA_UNIT, OBJECT_LIST_HEADING};

/// 表示中のセクションを標準出力へ書き出す
///
/// `quiet` のときは何も出力しない（`--json` 用）。
#[derive(Debug, Clone, Default)]
pub struct TerminalView {
    quiet: bool,
    active: Option<Section>,
    preview_len: usize,
    error_text: String,
    result: Option<RenderedResult>,
}

impl TerminalView {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            ..Self::default()
        }
    }

    fn announce(&self, section: Section) {
        if self.quiet {
            return;
        }
        match section {
            Section::Upload => {}
            Section::Preview => {
                println!("✔ プレビュー準備完了 ({} bytes data URL)", self.preview_len);
            }
            Section::Loading => {
                println!("- 解析中...");
            }
            Section::Result => {
                if let Some(result) = &self.result {
                    print!("{}", result_report(result));
                }
            }
            Section::Error => {
                eprintln!("✖ {}", self.error_text);
            }
        }
    }
}

fn result_report(result: &RenderedResult) -> String {
    let mut report = format!(
        "\n物体数:     {}\n合計面積:   {} {}\n平均面積:   {} {}\n結果画像:   {}\n",
        result.object_count,
        result.total_area,
        AREA_UNIT,
        result.average_area,
        AREA_UNIT,
        result.result_image
    );

    if !result.objects.is_empty() {
        report.push_str(&format!("\n{}\n", OBJECT_LIST_HEADING));
        for entry in &result.objects {
            report.push_str(&format!("  {:<12} {:>14}\n", entry.label, entry.area_with_unit()));
        }
    }
    report
}

impl View for TerminalView {
    fn set_section_visible(&mut self, section: Section, visible: bool) {
        if visible {
            self.active = Some(section);
            self.announce(section);
        } else if self.active == Some(section) {
            self.active = None;
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

    fn clear_file_input(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_active_section() {
        let mut view = TerminalView::new(true);
        for (section, visible) in Section::visibility(Section::Loading) {
            view.set_section_visible(section, visible);
        }
        assert_eq!(view.active, Some(Section::Loading));

        for (section, visible) in Section::visibility(Section::Error) {
            view.set_section_visible(section, visible);
        }
        assert_eq!(view.active, Some(Section::Error));
    }

    #[test]
    fn test_result_report_uses_area_unit() {
        let result = object_measure_common::AnalysisResult {
            object_count: 2,
            total_area: 2456.7,
            object_sizes: vec![1200.4, 1256.3],
            result_image: "/results/r.png".to_string(),
        };
        let report = result_report(&RenderedResult::from_result(&result));

        assert!(report.contains(&format!("合計面積:   2,457 {}", AREA_UNIT)));
        assert!(report.contains(&format!("平均面積:   1,228 {}", AREA_UNIT)));
        assert!(report.contains(OBJECT_LIST_HEADING));
        assert!(report.contains("Object 2"));
        assert!(report.contains(&format!("1,256 {}", AREA_UNIT)));
    }
}
