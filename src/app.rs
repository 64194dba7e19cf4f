use eframe::egui;

use crate::doc_template::{render, TemplateArgs};
use crate::state::AppState;
use crate::ui::{panels, plot};

/// Shown in the central panel until a series is loaded.
const HELP_TEMPLATE: &str = "auto-lims {version}\n\n\
Open a series ({formats})  (File → Open data…)\n\
Optional figure config: {config}  (File → Open config…)";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AutoLimsApp {
    pub state: AppState,
}

impl AutoLimsApp {
    pub fn new() -> Self {
        let mut state = AppState::default();
        state.help_text = help_text();
        Self { state }
    }
}

impl Default for AutoLimsApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the startup help text.
pub fn help_text() -> String {
    let args = TemplateArgs::new()
        .named("version", env!("CARGO_PKG_VERSION"))
        .named("formats", ".parquet, .json, .csv")
        .named("config", "JSON with pad, keep_fraction, default_color, arrow, masks");
    match render(HELP_TEMPLATE, &args) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("help text template: {e}");
            HELP_TEMPLATE.to_string()
        }
    }
}

impl eframe::App for AutoLimsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: limits, masks, outliers ----
        egui::SidePanel::left("settings_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::series_plot(ui, &mut self.state);
        });
    }
}
