//! 解析結果コンポーネント

use leptos::prelude::*;
use object_measure_common::{RenderedResult, AREA_UNIT, OBJECT_LIST_HEADING};

#[component]
pub fn ResultPanel<R>(result: RwSignal<Option<RenderedResult>>, on_reset: R) -> impl IntoView
where
    R: Fn() + Copy + 'static,
{
    let field = move |f: fn(&RenderedResult) -> String| {
        move || result.with(|r| r.as_ref().map(f).unwrap_or_default())
    };

    view! {
        <div class="result-section">
            <div class="stats">
                <div class="stat-card">
                    <span class="stat-label">"Objects"</span>
                    <span class="stat-value">{field(|r| r.object_count.clone())}</span>
                </div>
                <div class="stat-card">
                    <span class="stat-label">"Total Area"</span>
                    <span class="stat-value">{field(|r| r.total_area.clone())}</span>
                    <span class="stat-unit">{AREA_UNIT}</span>
                </div>
                <div class="stat-card">
                    <span class="stat-label">"Average Area"</span>
                    <span class="stat-value">{field(|r| r.average_area.clone())}</span>
                    <span class="stat-unit">{AREA_UNIT}</span>
                </div>
            </div>

            <img class="result-image" src=field(|r| r.result_image.clone()) alt="Result" />

            <div class="object-list">
                <h3>{OBJECT_LIST_HEADING}</h3>
                <For
                    each=move || {
                        result.with(|r| r.as_ref().map(|r| r.objects.clone()).unwrap_or_default())
                    }
                    key=|entry| (entry.label.clone(), entry.area.clone())
                    children=|entry| {
                        view! {
                            <div class="object-item">
                                <span class="object-number">{entry.label.clone()}</span>
                                <span class="object-area">{entry.area_with_unit()}</span>
                            </div>
                        }
                    }
                />
            </div>

            <button class="btn btn-primary" on:click=move |_| on_reset()>
                "Upload Another Image"
            </button>
        </div>
    }
}
