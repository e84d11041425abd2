//! アップロードエリアコンポーネント

use leptos::html;
use leptos::prelude::*;
use web_sys::{DragEvent, File};

#[component]
pub fn UploadArea<F>(input_ref: NodeRef<html::Input>, on_file: F) -> impl IntoView
where
    F: Fn(Option<File>) + Copy + 'static,
{
    let (is_dragover, set_is_dragover) = signal(false);

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        // 複数ドロップ時は先頭のみ
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        on_file(file);
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = move |_| {
        let file = input_ref
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        on_file(file);
    };

    view! {
        <div
            class=move || area_class(is_dragover.get())
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <div class="upload-icon">"📷"</div>
            <p>"Drag & drop an image here, or click to choose"</p>
            <p class="text-muted">"Supported: JPEG, PNG, GIF, BMP, WebP"</p>
        </div>
        <input
            node_ref=input_ref
            type="file"
            accept="image/*"
            style="display: none"
            on:change=on_change
        />
    }
}

fn area_class(is_dragover: bool) -> &'static str {
    if is_dragover {
        "upload-area dragover"
    } else {
        "upload-area"
    }
}
