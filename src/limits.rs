use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::PlotError;
use crate::surface::{AxisRange, PlotSurface};

/// Fraction of the sorted samples used to derive the trim rank.
pub const DEFAULT_KEEP_FRACTION: f64 = 0.995;

/// Default padding, as a fraction of the trimmed range.
pub const DEFAULT_PAD: f64 = 0.1;

// ---------------------------------------------------------------------------
// Padding
// ---------------------------------------------------------------------------

/// Margin added below and above the trimmed range, as a fraction of its
/// height.
///
/// In JSON a single number is symmetric and a two-element array is
/// `[bottom, top]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPadding", into = "RawPadding")]
pub enum Padding {
    Symmetric(f64),
    Asymmetric { bottom: f64, top: f64 },
}

impl Padding {
    /// Build padding from a `[bottom, top]` sequence. Anything but exactly
    /// two elements is rejected.
    pub fn from_slice(values: &[f64]) -> Result<Self, PlotError> {
        match values {
            [bottom, top] => Ok(Padding::Asymmetric {
                bottom: *bottom,
                top: *top,
            }),
            other => Err(PlotError::invalid(format!(
                "pad should be a float or a sequence of 2 floats, got {} values",
                other.len()
            ))),
        }
    }

    /// `(bottom, top)` fractions.
    pub fn fractions(&self) -> (f64, f64) {
        match *self {
            Padding::Symmetric(p) => (p, p),
            Padding::Asymmetric { bottom, top } => (bottom, top),
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Padding::Symmetric(DEFAULT_PAD)
    }
}

impl From<f64> for Padding {
    fn from(p: f64) -> Self {
        Padding::Symmetric(p)
    }
}

impl From<(f64, f64)> for Padding {
    fn from((bottom, top): (f64, f64)) -> Self {
        Padding::Asymmetric { bottom, top }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawPadding {
    Scalar(f64),
    Seq(Vec<f64>),
}

impl TryFrom<RawPadding> for Padding {
    type Error = PlotError;

    fn try_from(raw: RawPadding) -> Result<Self, Self::Error> {
        match raw {
            RawPadding::Scalar(p) => Ok(Padding::Symmetric(p)),
            RawPadding::Seq(v) => Padding::from_slice(&v),
        }
    }
}

impl From<Padding> for RawPadding {
    fn from(p: Padding) -> Self {
        match p {
            Padding::Symmetric(p) => RawPadding::Scalar(p),
            Padding::Asymmetric { bottom, top } => RawPadding::Seq(vec![bottom, top]),
        }
    }
}

// ---------------------------------------------------------------------------
// Trim bounds
// ---------------------------------------------------------------------------

/// Compute `(lo, hi)` trim bounds from a single rank.
///
/// With `N = floor(keep_fraction * len)` over the ascending sort, `hi` is the
/// sample at rank `N` from the bottom and `lo` the sample at rank `N` from the
/// top. Both bounds come from the same `N`, so roughly `1 - keep_fraction` of
/// the samples is clipped from each tail.
///
/// Only finite samples take part; NaN and infinite values (missing cells in
/// a loaded file) are skipped and `N` is taken over what remains.
pub fn trim_bounds(y: &[f64], keep_fraction: f64) -> Result<(f64, f64), PlotError> {
    if y.is_empty() {
        return Err(PlotError::invalid("y must contain at least one value"));
    }
    if !(keep_fraction > 0.0 && keep_fraction <= 1.0) {
        return Err(PlotError::invalid(format!(
            "keep fraction must lie in (0, 1], got {keep_fraction}"
        )));
    }

    let mut sorted: Vec<f64> = y.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Err(PlotError::invalid(format!(
            "y has no finite values ({} samples)",
            y.len()
        )));
    }
    sorted.sort_by(f64::total_cmp);

    let len = sorted.len();
    let n = (keep_fraction * len as f64).floor() as usize;

    // keep_fraction == 1.0 gives N == len; pin it to the last sample.
    let hi = sorted[n.min(len - 1)];
    // Rank N from the top; N == 0 wraps to the first sample.
    let lo = if n == 0 { sorted[0] } else { sorted[len - n] };

    Ok((lo, hi))
}

// ---------------------------------------------------------------------------
// Limiter
// ---------------------------------------------------------------------------

/// Set the y-range of `surface` to show the bulk of `y` while ignoring the
/// obvious outliers, padded by `pad`.
///
/// Returns the range that was applied.
pub fn auto_y_lims<S: PlotSurface + ?Sized>(
    y: &[f64],
    surface: &mut S,
    pad: Padding,
) -> Result<AxisRange, PlotError> {
    auto_y_lims_with_fraction(y, surface, pad, DEFAULT_KEEP_FRACTION)
}

/// [`auto_y_lims`] with an explicit keep fraction.
pub fn auto_y_lims_with_fraction<S: PlotSurface + ?Sized>(
    y: &[f64],
    surface: &mut S,
    pad: Padding,
    keep_fraction: f64,
) -> Result<AxisRange, PlotError> {
    let (lo, hi) = trim_bounds(y, keep_fraction)?;
    let (pad_bottom, pad_top) = pad.fractions();
    let span = hi - lo;

    let range = AxisRange::new(lo - span * pad_bottom, hi + span * pad_top);
    if range.is_degenerate() {
        warn!(
            "degenerate y-range [{}, {}] from {} samples",
            range.low,
            range.high,
            y.len()
        );
    } else {
        debug!(
            "y-range [{:.4}, {:.4}] (trim [{lo:.4}, {hi:.4}], {} samples)",
            range.low,
            range.high,
            y.len()
        );
    }

    surface.set_y_range(range);
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn trim_uses_single_rank_for_both_bounds() {
        // N = floor(0.995 * 100) = 99: hi = sorted[99], lo = sorted[1]
        let (lo, hi) = trim_bounds(&ramp(100), DEFAULT_KEEP_FRACTION).unwrap();
        assert_eq!(lo, 1.0);
        assert_eq!(hi, 99.0);

        // N = floor(0.995 * 1000) = 995: hi = sorted[995], lo = sorted[5]
        let (lo, hi) = trim_bounds(&ramp(1000), DEFAULT_KEEP_FRACTION).unwrap();
        assert_eq!(lo, 5.0);
        assert_eq!(hi, 995.0);
    }

    #[test]
    fn trim_ignores_input_order() {
        let mut y = ramp(1000);
        y.reverse();
        y.swap(10, 500);
        assert_eq!(
            trim_bounds(&y, DEFAULT_KEEP_FRACTION).unwrap(),
            (5.0, 995.0)
        );
    }

    #[test]
    fn single_sample_collapses() {
        assert_eq!(trim_bounds(&[4.2], DEFAULT_KEEP_FRACTION).unwrap(), (4.2, 4.2));
    }

    #[test]
    fn full_keep_fraction_spans_everything() {
        assert_eq!(trim_bounds(&ramp(10), 1.0).unwrap(), (0.0, 9.0));
    }

    #[test]
    fn rejects_empty_and_bad_fraction() {
        assert!(matches!(
            trim_bounds(&[], DEFAULT_KEEP_FRACTION),
            Err(PlotError::InvalidArgument(_))
        ));
        assert!(matches!(
            trim_bounds(&[1.0, 2.0], 0.0),
            Err(PlotError::InvalidArgument(_))
        ));
        assert!(matches!(
            trim_bounds(&[1.0, 2.0], 1.5),
            Err(PlotError::InvalidArgument(_))
        ));
    }

    #[test]
    fn zero_padding_reproduces_trim_bounds() {
        let mut surface = RecordingSurface::new();
        let range = auto_y_lims(&ramp(1000), &mut surface, Padding::Symmetric(0.0)).unwrap();
        assert_eq!(range, AxisRange::new(5.0, 995.0));
        assert_eq!(surface.y_range(), range);
    }

    #[test]
    fn symmetric_padding_expands_both_sides() {
        let mut surface = RecordingSurface::new();
        // trim [1, 99], span 98
        let range = auto_y_lims(&ramp(100), &mut surface, Padding::Symmetric(0.5)).unwrap();
        assert_eq!(range, AxisRange::new(1.0 - 49.0, 99.0 + 49.0));
    }

    #[test]
    fn asymmetric_padding_is_bottom_then_top() {
        let mut surface = RecordingSurface::new();
        let pad = Padding::from_slice(&[0.5, 0.0]).unwrap();
        let range = auto_y_lims(&ramp(100), &mut surface, pad).unwrap();
        assert_eq!(range, AxisRange::new(-48.0, 99.0));

        let pad = Padding::from_slice(&[0.0, 0.5]).unwrap();
        let range = auto_y_lims(&ramp(100), &mut surface, pad).unwrap();
        assert_eq!(range, AxisRange::new(1.0, 148.0));
    }

    #[test]
    fn padding_sequence_must_have_two_values() {
        for bad in [&[][..], &[0.1][..], &[0.1, 0.2, 0.3][..]] {
            assert!(matches!(
                Padding::from_slice(bad),
                Err(PlotError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn padding_from_json() {
        let p: Padding = serde_json::from_str("0.25").unwrap();
        assert_eq!(p, Padding::Symmetric(0.25));

        let p: Padding = serde_json::from_str("[0.1, 0.3]").unwrap();
        assert_eq!(p.fractions(), (0.1, 0.3));

        assert!(serde_json::from_str::<Padding>("[0.1]").is_err());
        assert!(serde_json::from_str::<Padding>("[0.1, 0.2, 0.3]").is_err());

        let back = serde_json::to_string(&Padding::Asymmetric { bottom: 0.5, top: 1.0 }).unwrap();
        assert_eq!(back, "[0.5,1.0]");
    }

    #[test]
    fn non_constant_series_gives_proper_range() {
        let y = [3.0, 3.0, 3.0, 7.0, 3.0, -2.0, 5.0];
        let mut surface = RecordingSurface::new();
        let range = auto_y_lims(&y, &mut surface, Padding::default()).unwrap();
        assert!(range.low < range.high);
    }

    #[test]
    fn non_finite_samples_are_skipped() {
        // 100 samples with one NaN: the 99 finite ones give N = 98.
        let mut y = ramp(100);
        y[7] = f64::NAN;
        let (lo, hi) = trim_bounds(&y, DEFAULT_KEEP_FRACTION).unwrap();
        assert!(lo.is_finite() && hi.is_finite());

        let mut y = ramp(10);
        y[0] = f64::INFINITY;
        y[1] = f64::NEG_INFINITY;
        let (lo, hi) = trim_bounds(&y, 1.0).unwrap();
        assert_eq!((lo, hi), (2.0, 9.0));
    }

    #[test]
    fn all_nan_is_rejected() {
        let mut surface = RecordingSurface::new();
        assert!(matches!(
            auto_y_lims(&[f64::NAN; 5], &mut surface, Padding::default()),
            Err(PlotError::InvalidArgument(_))
        ));
        assert_eq!(surface.y_range(), AxisRange::default());
    }

    #[test]
    fn nan_sample_does_not_hide_spike() {
        use crate::outliers::indicate_y_outliers;
        use crate::surface::ArrowStyle;

        // Below 200 samples rank N is the maximum itself, so use enough
        // samples for the spike to fall outside the trim.
        let x = ramp(1000);
        let mut y: Vec<f64> = x.iter().map(|v| (v * 0.1).sin()).collect();
        y[7] = f64::NAN;
        y[42] = 1e6;

        let mut surface = RecordingSurface::new();
        let range = auto_y_lims(&y, &mut surface, Padding::Symmetric(0.1)).unwrap();
        assert!(range.low.is_finite() && range.high.is_finite());
        assert!(!range.is_degenerate());

        let summary =
            indicate_y_outliers(&x, &y, &mut surface, None, &[], ArrowStyle::default()).unwrap();
        assert_eq!(summary.above_drawn, 1);
        assert_eq!(surface.annotations[0].xy, [42.0, range.high]);
    }

    #[test]
    fn constant_series_is_degenerate_but_ok() {
        let mut surface = RecordingSurface::new();
        let range = auto_y_lims(&[2.0; 50], &mut surface, Padding::default()).unwrap();
        assert!(range.is_degenerate());
        assert_eq!(range.low, 2.0);
    }
}
