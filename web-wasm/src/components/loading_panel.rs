//! 解析中表示

use leptos::prelude::*;

#[component]
pub fn LoadingPanel() -> impl IntoView {
    view! {
        <div class="loading-section">
            <div class="spinner"></div>
            <p class="progress-text">"Analyzing image..."</p>
        </div>
    }
}
