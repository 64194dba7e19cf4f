use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Color32;

use crate::config::FigureConfig;
use crate::data::model::SampleSeries;
use crate::limits::{auto_y_lims_with_fraction, Padding};
use crate::outliers::{find_y_outliers, FlaggedPoint, MaskGroup};
use crate::surface::{AxisRange, RecordingSurface};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded series (None until user loads a file).
    pub series: Option<SampleSeries>,

    /// Limiter / indicator settings.
    pub config: FigureConfig,

    /// Mask groups parsed from `config`, in scan order.
    pub masks: Vec<MaskGroup>,

    /// Parsed default arrow colour.
    pub default_color: Option<Color32>,

    /// Range the limiter picked for the current series and settings.
    pub y_range: Option<AxisRange>,

    /// Samples outside `y_range` (cached for the outlier table).
    pub flagged: Vec<FlaggedPoint>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Help text rendered at startup.
    pub help_text: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            series: None,
            config: FigureConfig::default(),
            masks: Vec::new(),
            default_color: None,
            y_range: None,
            flagged: Vec::new(),
            status_message: None,
            help_text: String::new(),
        }
    }
}

impl AppState {
    /// Ingest a newly loaded series and recompute limits.
    pub fn set_series(&mut self, series: SampleSeries) {
        self.series = Some(series);
        self.status_message = None;
        self.recompute();
    }

    /// Install a figure config, parsing its masks and colours first so a bad
    /// config leaves the current one untouched.
    pub fn set_config(&mut self, config: FigureConfig) -> Result<()> {
        let masks = config.mask_groups().context("invalid mask groups")?;
        let default_color = config.default_color().context("invalid default colour")?;
        self.config = config;
        self.masks = masks;
        self.default_color = default_color;
        self.status_message = None;
        self.recompute();
        Ok(())
    }

    pub fn load_series(&mut self, path: &Path) -> Result<()> {
        let series = crate::data::loader::load_file(path)?;
        self.set_series(series);
        Ok(())
    }

    pub fn load_config(&mut self, path: &Path) -> Result<()> {
        let config = FigureConfig::load(path)?;
        self.set_config(config)
    }

    /// Change the padding and recompute.
    pub fn set_padding(&mut self, pad: Padding) {
        self.config.pad = pad;
        self.recompute();
    }

    pub fn set_keep_fraction(&mut self, keep_fraction: f64) {
        self.config.keep_fraction = keep_fraction;
        self.recompute();
    }

    /// Toggle arrow drawing for the mask group at `idx`.
    pub fn set_mask_plot(&mut self, idx: usize, plot: bool) {
        if let Some(group) = self.masks.get_mut(idx) {
            group.plot = plot;
        }
        if let Some(spec) = self.config.masks.get_mut(idx) {
            spec.plot = Some(plot);
        }
        self.recompute();
    }

    /// Recompute the y-range and the flagged samples for the outlier table.
    pub fn recompute(&mut self) {
        self.y_range = None;
        self.flagged.clear();

        let Some(series) = &self.series else {
            return;
        };
        if series.is_empty() {
            return;
        }

        let mut surface = RecordingSurface::new();
        let result = auto_y_lims_with_fraction(
            series.y(),
            &mut surface,
            self.config.pad,
            self.config.keep_fraction,
        )
        .and_then(|range| {
            let flagged =
                find_y_outliers(series.x(), series.y(), range, self.default_color, &self.masks)?;
            Ok((range, flagged))
        });

        match result {
            Ok((range, flagged)) => {
                self.y_range = Some(range);
                self.flagged = flagged;
            }
            Err(e) => {
                log::error!("Failed to compute limits: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
