use std::collections::BTreeSet;

use eframe::egui::Color32;
use log::debug;

use crate::error::PlotError;
use crate::surface::{
    Annotation, ArrowProps, ArrowStyle, AxisRange, Coords, PlotSurface, ARROW_STYLE_FILLED,
};

/// Distance between arrow tail and tip, in UI points.
pub const ARROW_OFFSET_POINTS: f32 = 10.0;

// ---------------------------------------------------------------------------
// Mask groups
// ---------------------------------------------------------------------------

/// A named subset of sample indices whose off-axis arrows get their own
/// styling.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskGroup {
    pub name: String,
    pub mask: BTreeSet<usize>,
    /// Arrow colour; `None` falls back to the indicator's default colour.
    pub color: Option<Color32>,
    /// Whether arrows are drawn for off-axis samples of this group.
    pub plot: bool,
}

impl MaskGroup {
    pub fn new(name: impl Into<String>, mask: impl IntoIterator<Item = usize>) -> Self {
        MaskGroup {
            name: name.into(),
            mask: mask.into_iter().collect(),
            color: None,
            plot: true,
        }
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_plot(mut self, plot: bool) -> Self {
        self.plot = plot;
        self
    }

    pub fn contains(&self, index: usize) -> bool {
        self.mask.contains(&index)
    }
}

/// How an off-axis sample is to be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Position of the first matching group in the mask list.
    pub group: Option<usize>,
    pub plot: bool,
    pub color: Option<Color32>,
}

/// Resolve styling for `index`: the first group containing it wins, later
/// groups are not consulted.
pub fn resolve_mask(index: usize, masks: &[MaskGroup], default_color: Option<Color32>) -> Resolution {
    match masks.iter().position(|m| m.contains(index)) {
        Some(pos) => {
            let group = &masks[pos];
            Resolution {
                group: Some(pos),
                plot: group.plot,
                color: group.color.or(default_color),
            }
        }
        None => Resolution {
            group: None,
            plot: true,
            color: default_color,
        },
    }
}

// ---------------------------------------------------------------------------
// Finding outliers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Below,
    Above,
}

impl Side {
    /// Offset of the arrow tail from its anchor. Below-range arrows point
    /// down, so their tail sits above the anchor.
    pub fn tail_offset(self) -> [f32; 2] {
        match self {
            Side::Below => [0.0, ARROW_OFFSET_POINTS],
            Side::Above => [0.0, -ARROW_OFFSET_POINTS],
        }
    }
}

/// A sample lying strictly outside the visible range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlaggedPoint {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub side: Side,
    pub resolution: Resolution,
}

impl FlaggedPoint {
    /// Where the arrow tip goes: the sample's x on the violated bound.
    pub fn anchor(&self, range: AxisRange) -> [f64; 2] {
        match self.side {
            Side::Below => [self.x, range.low],
            Side::Above => [self.x, range.high],
        }
    }
}

/// List every sample outside `range`: all below-range samples first, then
/// all above-range ones, each in index order.
pub fn find_y_outliers(
    x: &[f64],
    y: &[f64],
    range: AxisRange,
    default_color: Option<Color32>,
    masks: &[MaskGroup],
) -> Result<Vec<FlaggedPoint>, PlotError> {
    if x.len() != y.len() {
        return Err(PlotError::invalid(format!(
            "x has {} values but y has {}",
            x.len(),
            y.len()
        )));
    }

    for m in masks {
        if let Some(&last) = m.mask.last() {
            if last >= y.len() {
                debug!(
                    "mask group '{}' references index {last} beyond {} samples",
                    m.name,
                    y.len()
                );
            }
        }
    }

    let mut flagged = Vec::new();
    for side in [Side::Below, Side::Above] {
        for (i, (&xi, &yi)) in x.iter().zip(y).enumerate() {
            let outside = match side {
                Side::Below => yi < range.low,
                Side::Above => yi > range.high,
            };
            if outside {
                flagged.push(FlaggedPoint {
                    index: i,
                    x: xi,
                    y: yi,
                    side,
                    resolution: resolve_mask(i, masks, default_color),
                });
            }
        }
    }

    Ok(flagged)
}

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------

/// What [`indicate_y_outliers`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutlierSummary {
    pub below_drawn: usize,
    pub below_suppressed: usize,
    pub above_drawn: usize,
    pub above_suppressed: usize,
}

impl OutlierSummary {
    pub fn drawn(&self) -> usize {
        self.below_drawn + self.above_drawn
    }

    pub fn suppressed(&self) -> usize {
        self.below_suppressed + self.above_suppressed
    }
}

/// Build the arrow annotation for a flagged sample.
pub fn outlier_annotation(point: &FlaggedPoint, range: AxisRange, style: ArrowStyle) -> Annotation {
    Annotation {
        text: String::new(),
        xy: point.anchor(range),
        xy_coords: Coords::Data,
        xytext: point.side.tail_offset(),
        text_coords: Coords::OffsetPoints,
        arrow: ArrowProps {
            style: ARROW_STYLE_FILLED,
            color: point.resolution.color,
            extra: style,
        },
    }
}

/// Draw an arrow at the plot edge for every sample of `y` outside the
/// surface's current y-range.
///
/// The range is read from `surface`, so call [`crate::limits::auto_y_lims`]
/// first. Samples matched by a mask group with `plot == false` are skipped.
pub fn indicate_y_outliers<S: PlotSurface + ?Sized>(
    x: &[f64],
    y: &[f64],
    surface: &mut S,
    color: Option<Color32>,
    masks: &[MaskGroup],
    style: ArrowStyle,
) -> Result<OutlierSummary, PlotError> {
    let range = surface.y_range();
    let flagged = find_y_outliers(x, y, range, color, masks)?;

    let mut summary = OutlierSummary::default();
    for point in &flagged {
        let (drawn, suppressed) = match point.side {
            Side::Below => (&mut summary.below_drawn, &mut summary.below_suppressed),
            Side::Above => (&mut summary.above_drawn, &mut summary.above_suppressed),
        };
        if !point.resolution.plot {
            *suppressed += 1;
            continue;
        }
        surface.annotate(outlier_annotation(point, range, style));
        *drawn += 1;
    }

    debug!(
        "{} off-axis arrows drawn, {} suppressed by masks",
        summary.drawn(),
        summary.suppressed()
    );
    Ok(summary)
}
