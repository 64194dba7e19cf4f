use crate::error::PlotError;

// ---------------------------------------------------------------------------
// SampleSeries – paired x / y values
// ---------------------------------------------------------------------------

/// An ordered series of `(x, y)` samples paired by index.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl SampleSeries {
    /// Pair `x` and `y`; both must have the same length.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, PlotError> {
        if x.len() != y.len() {
            return Err(PlotError::invalid(format!(
                "x has {} values but y has {}",
                x.len(),
                y.len()
            )));
        }
        Ok(SampleSeries { x, y })
    }

    /// Series with `x = 0, 1, 2, ...`.
    pub fn from_y(y: Vec<f64>) -> Self {
        let x = (0..y.len()).map(|i| i as f64).collect();
        SampleSeries { x, y }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// `(min, max)` of the finite x values, or `None` if there are none.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        self.x
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
