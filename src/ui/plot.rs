use eframe::egui::Ui;
use egui_plot::{Arrows, Line, Plot, PlotBounds, PlotPoints, PlotUi, Points};

use crate::color::{FALLBACK_ARROW_COLOR, SERIES_COLOR};
use crate::limits::auto_y_lims_with_fraction;
use crate::outliers::indicate_y_outliers;
use crate::state::AppState;
use crate::surface::{Annotation, AxisRange, Coords, PlotSurface};

// ---------------------------------------------------------------------------
// PlotSurface on top of egui_plot
// ---------------------------------------------------------------------------

/// Adapts an egui [`PlotUi`] to [`PlotSurface`].
///
/// Bound changes only take effect after the plot closure returns, so the
/// range set during this frame is cached and reported by `y_range`.
/// Only `head_length` of the arrow style is honoured; egui arrows have no
/// shaft width or head width.
pub struct EguiPlotSurface<'a, 'p> {
    plot_ui: &'a mut PlotUi<'p>,
    x_bounds: (f64, f64),
    y_range: Option<AxisRange>,
}

impl<'a, 'p> EguiPlotSurface<'a, 'p> {
    pub fn new(plot_ui: &'a mut PlotUi<'p>, x_bounds: (f64, f64)) -> Self {
        EguiPlotSurface {
            plot_ui,
            x_bounds,
            y_range: None,
        }
    }

    /// Convert an annotation's tail position to data coordinates.
    fn tail_position(&self, a: &Annotation) -> [f64; 2] {
        match a.text_coords {
            Coords::Data => [a.xytext[0] as f64, a.xytext[1] as f64],
            Coords::OffsetPoints => {
                offset_to_data(a.xy, a.xytext, self.plot_ui.transform().dvalue_dpos())
            }
        }
    }
}

/// Move `xy` by `offset` UI points (positive y is up), given the data units
/// per screen point from `PlotTransform::dvalue_dpos`.
///
/// `dvalue_dpos[1]` is negative since screen y grows downwards.
pub fn offset_to_data(xy: [f64; 2], offset: [f32; 2], dvalue_dpos: [f64; 2]) -> [f64; 2] {
    let [dx, dy] = dvalue_dpos;
    [
        xy[0] + offset[0] as f64 * dx,
        xy[1] - offset[1] as f64 * dy,
    ]
}

impl PlotSurface for EguiPlotSurface<'_, '_> {
    fn y_range(&self) -> AxisRange {
        self.y_range.unwrap_or_else(|| {
            let b = self.plot_ui.plot_bounds();
            AxisRange::new(b.min()[1], b.max()[1])
        })
    }

    fn set_y_range(&mut self, range: AxisRange) {
        let (x0, x1) = self.x_bounds;
        self.plot_ui
            .set_plot_bounds(PlotBounds::from_min_max([x0, range.low], [x1, range.high]));
        self.y_range = Some(range);
    }

    fn annotate(&mut self, annotation: Annotation) {
        let tail = self.tail_position(&annotation);
        let color = annotation.arrow.color.unwrap_or(FALLBACK_ARROW_COLOR);
        let mut arrows = Arrows::new(vec![tail], vec![annotation.xy])
            .color(color)
            .name("off-axis");
        if let Some(len) = annotation.arrow.extra.head_length {
            arrows = arrows.tip_length(len);
        }
        self.plot_ui.arrows(arrows);
    }
}

/// Pad an x extent by 2% on each side (or ±0.5 if it is a single point).
pub fn x_bounds_for(extent: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = extent;
    let span = hi - lo;
    let pad = if span.abs() < 1e-12 { 0.5 } else { span * 0.02 };
    (lo - pad, hi + pad)
}

// ---------------------------------------------------------------------------
// Series plot (central panel)
// ---------------------------------------------------------------------------

/// Render the series in the central panel, with outliers clipped off and
/// pointed at.
///
/// The limiter and indicator run against the live plot every frame rather
/// than replaying `state.y_range` / `state.flagged`, so what is drawn always
/// goes through `EguiPlotSurface`. Arrow tails are sized with the transform
/// of the previous frame: `set_plot_bounds` is only applied once the closure
/// returns. On the first frame and right after a resize the arrows are off
/// in length for one frame; their anchors are always exact.
pub fn series_plot(ui: &mut Ui, state: &mut AppState) {
    let series = match &state.series {
        Some(s) if !s.is_empty() => s,
        _ => {
            let hint = state.help_text.clone();
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(hint);
            });
            return;
        }
    };

    let x_bounds = x_bounds_for(series.x_extent().unwrap_or((0.0, 1.0)));
    let xy: Vec<[f64; 2]> = series
        .x()
        .iter()
        .zip(series.y().iter())
        .map(|(&xi, &yi)| [xi, yi])
        .collect();

    let config = &state.config;
    let masks = &state.masks;
    let default_color = state.default_color;

    let result = Plot::new("series_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("x")
        .y_axis_label("y")
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::new(xy.clone()))
                    .name("series")
                    .color(SERIES_COLOR.gamma_multiply(0.5))
                    .width(1.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::new(xy))
                    .name("samples")
                    .color(SERIES_COLOR)
                    .radius(2.0),
            );

            let mut surface = EguiPlotSurface::new(plot_ui, x_bounds);
            auto_y_lims_with_fraction(series.y(), &mut surface, config.pad, config.keep_fraction)
                .and_then(|_| {
                    indicate_y_outliers(
                        series.x(),
                        series.y(),
                        &mut surface,
                        default_color,
                        masks,
                        config.arrow,
                    )
                })
        })
        .inner;

    if let Err(e) = result {
        let msg = format!("Error: {e}");
        if state.status_message.as_deref() != Some(msg.as_str()) {
            log::error!("Plotting failed: {e}");
            state.status_message = Some(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0.01 data units per point in x, 0.02 in y (negative: screen y is down).
    const DVALUE_DPOS: [f64; 2] = [0.01, -0.02];

    #[test]
    fn upward_offset_puts_tail_above_anchor() {
        // Below-range point: tail 10 points above, arrow points down.
        let tail = offset_to_data([5.0, -1.0], [0.0, 10.0], DVALUE_DPOS);
        assert_eq!(tail[0], 5.0);
        assert!(tail[1] > -1.0);
        assert!((tail[1] - (-0.8)).abs() < 1e-12);
    }

    #[test]
    fn downward_offset_puts_tail_below_anchor() {
        // Above-range point: tail 10 points below, arrow points up.
        let tail = offset_to_data([5.0, 3.0], [0.0, -10.0], DVALUE_DPOS);
        assert!(tail[1] < 3.0);
        assert!((tail[1] - 2.8).abs() < 1e-12);
    }

    #[test]
    fn horizontal_offset_follows_x_scale() {
        let tail = offset_to_data([5.0, 0.0], [20.0, 0.0], DVALUE_DPOS);
        assert!((tail[0] - 5.2).abs() < 1e-12);
        assert_eq!(tail[1], 0.0);
    }

    #[test]
    fn x_bounds_padding() {
        assert_eq!(x_bounds_for((0.0, 100.0)), (-2.0, 102.0));
        assert_eq!(x_bounds_for((3.0, 3.0)), (2.5, 3.5));
    }
}
