//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Object Size Measurement"</h1>
            <p class="text-muted">"Upload a photo to count objects and measure their areas"</p>
        </header>
    }
}
