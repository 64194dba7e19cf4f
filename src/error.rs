use thiserror::Error;

/// Errors raised by the axis limiter, the outlier indicator and the
/// template helper.
///
/// Loaders and the viewer use `anyhow` on top of this; the library API
/// keeps a closed set so callers can match on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// An argument has the wrong shape or value (padding length, empty
    /// series, mismatched x/y lengths, unparsable colour, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A mask group was declared without one of its mandatory keys.
    #[error("mask group '{group}' is missing mandatory key '{key}'")]
    MissingKey { group: String, key: String },

    /// A template referenced a substitution that was not supplied, or its
    /// braces are malformed.
    #[error("format error: {0}")]
    Format(String),
}

impl PlotError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        PlotError::InvalidArgument(msg.into())
    }
}
