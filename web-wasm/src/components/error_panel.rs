//! エラー表示

use leptos::prelude::*;

#[component]
pub fn ErrorPanel<R>(message: RwSignal<String>, on_reset: R) -> impl IntoView
where
    R: Fn() + Copy + 'static,
{
    view! {
        <div class="error-section">
            <p class="error-text">{move || message.get()}</p>
            <button class="btn btn-primary" on:click=move |_| on_reset()>"Try Again"</button>
        </div>
    }
}
