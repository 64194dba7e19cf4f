use std::path::PathBuf;

use auto_lims::app::AutoLimsApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional: a series to open right away.
    let initial = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "auto-lims – Outlier-aware plot limits",
        options,
        Box::new(move |_cc| {
            let mut app = AutoLimsApp::new();
            if let Some(path) = initial {
                if let Err(e) = app.state.load_series(&path) {
                    log::error!("Failed to load {}: {e:#}", path.display());
                    app.state.status_message = Some(format!("Error: {e:#}"));
                }
            }
            Ok(Box::new(app))
        }),
    )
}
