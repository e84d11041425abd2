mod app;
mod io;
mod model;

use app::{configure_fonts, DesktopApp};
use object_measure::config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "config unreadable, using defaults");
        Config::default()
    });

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Object Size Measurement",
        options,
        Box::new(|cc| {
            configure_fonts(&cc.egui_ctx);
            Box::new(DesktopApp::new(config))
        }),
    )
}
