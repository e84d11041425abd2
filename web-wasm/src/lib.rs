//! Object Size Measurement Web App (Leptos + WASM)

mod api;
mod app;
mod components;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    init_logging();
    log::info!("object-measure web starting");
    leptos::mount::mount_to_body(app::App);
}

/// コンソールへのロガーを設定（2回目以降は何もしない）
fn init_logging() {
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn init_logging_enables_info_and_is_repeatable() {
        init_logging();
        init_logging();
        assert_eq!(log::max_level(), log::LevelFilter::Info);
        assert!(log::log_enabled!(log::Level::Error));
        assert!(!log::log_enabled!(log::Level::Debug));
    }
}
