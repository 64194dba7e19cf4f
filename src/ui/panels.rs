use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{to_hex, FALLBACK_ARROW_COLOR};
use crate::limits::Padding;
use crate::outliers::Side;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – limiter settings, masks, outlier table
// ---------------------------------------------------------------------------

/// Render the left settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Limits");
    ui.separator();

    padding_controls(ui, state);

    let mut keep = state.config.keep_fraction;
    if ui
        .add(
            egui::Slider::new(&mut keep, 0.9..=1.0)
                .text("keep fraction")
                .max_decimals(4),
        )
        .changed()
    {
        state.set_keep_fraction(keep);
    }

    if let Some(range) = state.y_range {
        ui.label(format!("y-range: [{:.4}, {:.4}]", range.low, range.high));
    }

    ui.add_space(8.0);
    ui.heading("Mask groups");
    ui.separator();
    mask_list(ui, state);

    ui.add_space(8.0);
    ui.heading("Off-axis samples");
    ui.separator();
    outlier_table(ui, state);
}

fn padding_controls(ui: &mut Ui, state: &mut AppState) {
    let (mut bottom, mut top) = state.config.pad.fractions();
    let mut asymmetric = matches!(state.config.pad, Padding::Asymmetric { .. });
    let mut changed = ui.checkbox(&mut asymmetric, "Separate bottom / top pad").changed();

    if asymmetric {
        changed |= ui
            .add(egui::Slider::new(&mut bottom, 0.0..=1.0).text("bottom pad"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut top, 0.0..=1.0).text("top pad"))
            .changed();
    } else {
        changed |= ui
            .add(egui::Slider::new(&mut bottom, 0.0..=1.0).text("pad"))
            .changed();
    }

    if changed {
        let pad = if asymmetric {
            Padding::Asymmetric { bottom, top }
        } else {
            Padding::Symmetric(bottom)
        };
        state.set_padding(pad);
    }
}

fn mask_list(ui: &mut Ui, state: &mut AppState) {
    if state.masks.is_empty() {
        ui.label("No mask groups (File → Open config…)");
        return;
    }

    let default = state.default_color.unwrap_or(FALLBACK_ARROW_COLOR);
    let mut toggled: Option<(usize, bool)> = None;

    for (i, group) in state.masks.iter().enumerate() {
        let color = group.color.unwrap_or(default);
        ui.horizontal(|ui: &mut Ui| {
            let mut plot = group.plot;
            let label = format!("{}  ({} samples)", group.name, group.mask.len());
            if ui.checkbox(&mut plot, RichText::new(label).color(color)).changed() {
                toggled = Some((i, plot));
            }
            ui.weak(to_hex(color));
        });
    }

    if let Some((i, plot)) = toggled {
        state.set_mask_plot(i, plot);
    }
}

fn outlier_table(ui: &mut Ui, state: &AppState) {
    if state.flagged.is_empty() {
        ui.label("None");
        return;
    }

    let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
    let default = state.default_color.unwrap_or(FALLBACK_ARROW_COLOR);

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(40.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto())
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .header(20.0, |mut header| {
            for title in ["#", "x", "y", "side", "mask"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(text_height, state.flagged.len(), |mut row| {
                let p = &state.flagged[row.index()];
                let mask_name = p
                    .resolution
                    .group
                    .and_then(|g| state.masks.get(g))
                    .map(|m| m.name.as_str())
                    .unwrap_or("-");
                let color = if p.resolution.plot {
                    p.resolution.color.unwrap_or(default)
                } else {
                    Color32::GRAY
                };

                row.col(|ui| {
                    ui.label(p.index.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.4}", p.x));
                });
                row.col(|ui| {
                    ui.label(format!("{:.4}", p.y));
                });
                row.col(|ui| {
                    let arrow = match p.side {
                        Side::Below => "↓",
                        Side::Above => "↑",
                    };
                    ui.label(RichText::new(arrow).color(color));
                });
                row.col(|ui| {
                    ui.label(mask_name);
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data…").clicked() {
                open_data_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open config…").clicked() {
                open_config_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save config…").clicked() {
                save_config_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(series) = &state.series {
            let drawn = state.flagged.iter().filter(|p| p.resolution.plot).count();
            ui.label(format!(
                "{} samples, {} off-axis ({} drawn)",
                series.len(),
                state.flagged.len(),
                drawn
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_data_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sample series")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load_series(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn open_config_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open figure config")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match state.load_config(&path) {
            Ok(()) => log::info!(
                "Loaded config {} with {} mask groups",
                path.display(),
                state.masks.len()
            ),
            Err(e) => {
                log::error!("Failed to load config: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn save_config_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save figure config")
        .add_filter("JSON", &["json"])
        .set_file_name("figure.json")
        .save_file();

    if let Some(path) = file {
        let result = state
            .config
            .to_json()
            .and_then(|text| std::fs::write(&path, text).map_err(anyhow::Error::from));
        if let Err(e) = result {
            log::error!("Failed to save config: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
