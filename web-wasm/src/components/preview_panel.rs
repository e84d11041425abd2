//! プレビューコンポーネント

use leptos::prelude::*;

#[component]
pub fn PreviewPanel<S, C>(preview: RwSignal<String>, on_submit: S, on_cancel: C) -> impl IntoView
where
    S: Fn() + Copy + 'static,
    C: Fn() + Copy + 'static,
{
    view! {
        <div class="preview-section">
            <img class="preview-image" src=move || preview.get() alt="Preview" />
            <div class="button-row">
                <button class="btn btn-primary" on:click=move |_| on_submit()>
                    "Measure Objects"
                </button>
                <button class="btn btn-secondary" on:click=move |_| on_cancel()>
                    "Cancel"
                </button>
            </div>
        </div>
    }
}
