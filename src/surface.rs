use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// AxisRange – visible y-interval of a plotting surface
// ---------------------------------------------------------------------------

/// The visible `(low, high)` interval of an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub low: f64,
    pub high: f64,
}

impl AxisRange {
    pub fn new(low: f64, high: f64) -> Self {
        AxisRange { low, high }
    }

    /// Height of the range (`high - low`).
    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    /// True when the range collapses to a point (or is inverted / NaN).
    pub fn is_degenerate(&self) -> bool {
        !(self.low < self.high)
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        AxisRange { low: 0.0, high: 1.0 }
    }
}

// ---------------------------------------------------------------------------
// Annotation – an arrow marker placed on the surface
// ---------------------------------------------------------------------------

/// Coordinate system an annotation point is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coords {
    /// Plot data coordinates.
    Data,
    /// Offset from the anchor, in UI points (positive y is up).
    OffsetPoints,
}

/// Arrow head style code. Only the filled "-|>" head is drawn by this crate.
pub const ARROW_STYLE_FILLED: &str = "-|>";

/// Extra arrow styling passed through verbatim to every annotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArrowStyle {
    /// Shaft width in points.
    pub width: Option<f32>,
    /// Head length in points.
    pub head_length: Option<f32>,
    /// Head width in points.
    pub head_width: Option<f32>,
}

/// Arrow properties of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowProps {
    pub style: &'static str,
    /// `None` leaves the colour to the surface's default.
    pub color: Option<Color32>,
    pub extra: ArrowStyle,
}

/// A directional marker anchored at `xy`, with its tail at `xytext`.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub xy: [f64; 2],
    pub xy_coords: Coords,
    pub xytext: [f32; 2],
    pub text_coords: Coords,
    pub arrow: ArrowProps,
}

// ---------------------------------------------------------------------------
// PlotSurface – what the limiter and indicator need from a chart
// ---------------------------------------------------------------------------

/// A plotting surface whose y-range can be read and set and that accepts
/// annotations.
pub trait PlotSurface {
    fn y_range(&self) -> AxisRange;
    fn set_y_range(&mut self, range: AxisRange);
    fn annotate(&mut self, annotation: Annotation);
}

/// In-memory surface that just records what was done to it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub y_range: AxisRange,
    pub annotations: Vec<Annotation>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_y_range(range: AxisRange) -> Self {
        RecordingSurface {
            y_range: range,
            annotations: Vec::new(),
        }
    }

    /// Drop all recorded annotations, keeping the range.
    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
    }
}

impl PlotSurface for RecordingSurface {
    fn y_range(&self) -> AxisRange {
        self.y_range
    }

    fn set_y_range(&mut self, range: AxisRange) {
        self.y_range = range;
    }

    fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_ranges() {
        assert!(!AxisRange::new(0.0, 1.0).is_degenerate());
        assert!(AxisRange::new(2.0, 2.0).is_degenerate());
        assert!(AxisRange::new(3.0, 1.0).is_degenerate());
        assert!(AxisRange::new(f64::NAN, 1.0).is_degenerate());
    }

    #[test]
    fn recording_surface_keeps_range_and_annotations() {
        let mut s = RecordingSurface::new();
        s.set_y_range(AxisRange::new(-1.0, 4.0));
        assert_eq!(s.y_range(), AxisRange::new(-1.0, 4.0));

        s.annotate(Annotation {
            text: String::new(),
            xy: [1.0, -1.0],
            xy_coords: Coords::Data,
            xytext: [0.0, 10.0],
            text_coords: Coords::OffsetPoints,
            arrow: ArrowProps {
                style: ARROW_STYLE_FILLED,
                color: None,
                extra: ArrowStyle::default(),
            },
        });
        assert_eq!(s.annotations.len(), 1);

        s.clear_annotations();
        assert!(s.annotations.is_empty());
        assert_eq!(s.y_range().span(), 5.0);
    }
}
