//! メインアプリケーションコンポーネント

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use object_measure_common::{
    Decoder, RenderedResult, Section, Transport, View, ViewController,
};
use web_sys::File;

use crate::api::{BrowserFile, FetchTransport, FileReaderDecoder};
use crate::components::{
    error_panel::ErrorPanel, header::Header, loading_panel::LoadingPanel,
    preview_panel::PreviewPanel, result_panel::ResultPanel, upload_area::UploadArea,
};

/// シグナルで画面に反映するビュー
#[derive(Clone, Copy)]
pub struct SignalView {
    visible: RwSignal<Vec<Section>>,
    pub preview: RwSignal<String>,
    pub error_text: RwSignal<String>,
    pub result: RwSignal<Option<RenderedResult>>,
    pub file_input: NodeRef<html::Input>,
}

impl SignalView {
    pub fn new() -> Self {
        Self {
            visible: RwSignal::new(Vec::new()),
            preview: RwSignal::new(String::new()),
            error_text: RwSignal::new(String::new()),
            result: RwSignal::new(None),
            file_input: NodeRef::new(),
        }
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.visible.with(|v| v.contains(&section))
    }
}

impl View for SignalView {
    fn set_section_visible(&mut self, section: Section, visible: bool) {
        self.visible.update(|v| {
            v.retain(|s| *s != section);
            if visible {
                v.push(section);
            }
        });
    }

    fn set_preview(&mut self, data_url: &str) {
        self.preview.set(data_url.to_string());
    }

    fn render_result(&mut self, rendered: &RenderedResult) {
        self.result.set(Some(rendered.clone()));
    }

    fn clear_result(&mut self) {
        self.result.set(None);
    }

    fn set_error_text(&mut self, message: &str) {
        self.error_text.set(message.to_string());
    }

    fn clear_file_input(&mut self) {
        if let Some(input) = self.file_input.get_untracked() {
            input.set_value("");
        }
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let view = SignalView::new();
    let controller =
        StoredValue::new_local(ViewController::<SignalView, BrowserFile>::new(view));

    // ファイル選択ハンドラ（クリック・ドロップ共通）
    let on_file = move |file: Option<File>| {
        let job = controller
            .try_update_value(|c| c.select_file(file.map(BrowserFile)))
            .flatten();
        if let Some(job) = job {
            spawn_local(async move {
                let outcome = FileReaderDecoder.decode(&job.file).await;
                controller.try_update_value(|c| c.complete_decode(job.ticket, outcome));
            });
        }
    };

    // 解析開始ハンドラ
    let on_submit = move || {
        let job = controller.try_update_value(|c| c.submit()).flatten();
        if let Some(job) = job {
            spawn_local(async move {
                let outcome = FetchTransport::same_origin().upload(&job.file).await;
                controller.try_update_value(|c| c.complete_upload(job.ticket, outcome));
            });
        }
    };

    let on_reset = move || {
        controller.update_value(|c| c.reset());
    };

    view! {
        <div class="container">
            <Header />

            <Show when=move || view.is_visible(Section::Upload)>
                <UploadArea input_ref=view.file_input on_file=on_file />
            </Show>

            <Show when=move || view.is_visible(Section::Preview)>
                <PreviewPanel preview=view.preview on_submit=on_submit on_cancel=on_reset />
            </Show>

            <Show when=move || view.is_visible(Section::Loading)>
                <LoadingPanel />
            </Show>

            <Show when=move || view.is_visible(Section::Result)>
                <ResultPanel result=view.result on_reset=on_reset />
            </Show>

            <Show when=move || view.is_visible(Section::Error)>
                <ErrorPanel message=view.error_text on_reset=on_reset />
            </Show>
        </div>
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use leptos::mount::mount_to;
    use object_measure_common::INVALID_FILE_MESSAGE;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::{FilePropertyBag, HtmlElement};

    wasm_bindgen_test_configure!(run_in_browser);

    fn file(name: &str, mime: &str, bytes: &[u8]) -> BrowserFile {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let opts = FilePropertyBag::new();
        opts.set_type(mime);
        BrowserFile(File::new_with_u8_array_sequence_and_options(&parts, name, &opts).unwrap())
    }

    fn visible(signals: &SignalView) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| signals.is_visible(*s))
            .collect()
    }

    #[wasm_bindgen_test]
    fn invalid_file_shows_only_error_until_reset() {
        let signals = SignalView::new();
        let mut controller = ViewController::<SignalView, BrowserFile>::new(signals);
        assert_eq!(visible(&signals), vec![Section::Upload]);

        let job = controller.select_file(Some(file("notes.txt", "text/plain", b"hi")));
        assert!(job.is_none());
        assert_eq!(visible(&signals), vec![Section::Error]);
        assert_eq!(signals.error_text.get_untracked(), INVALID_FILE_MESSAGE);

        controller.reset();
        assert_eq!(visible(&signals), vec![Section::Upload]);
        assert!(signals.error_text.get_untracked().is_empty());
        assert!(signals.result.get_untracked().is_none());
    }

    #[wasm_bindgen_test]
    async fn selected_image_reaches_preview() {
        let signals = SignalView::new();
        let mut controller = ViewController::<SignalView, BrowserFile>::new(signals);

        let section = controller
            .select_and_decode(Some(file("coins.png", "image/png", &[1, 2, 3])), &FileReaderDecoder)
            .await;

        assert_eq!(section, Section::Preview);
        assert_eq!(visible(&signals), vec![Section::Preview]);
        assert_eq!(signals.preview.get_untracked(), "data:image/png;base64,AQID");
    }

    #[wasm_bindgen_test]
    fn reset_clears_bound_input() {
        let signals = SignalView::new();
        let input_ref = signals.file_input;

        let document = web_sys::window().unwrap().document().unwrap();
        let parent: HtmlElement = document.create_element("div").unwrap().unchecked_into();
        document.body().unwrap().append_child(&parent).unwrap();
        let _handle = mount_to(parent, move || view! { <input type="text" node_ref=input_ref /> });

        let input = input_ref.get_untracked().expect("input mounted");
        input.set_value("coins.png");

        let mut controller = ViewController::<SignalView, BrowserFile>::new(signals);
        controller.reset();
        assert_eq!(input.value(), "");
    }
}
