//! Outlier-aware y-axis limits for scatter / line plots.
//!
//! [`limits::auto_y_lims`] picks a y-range that shows the bulk of a series
//! while ignoring a handful of extreme samples, and
//! [`outliers::indicate_y_outliers`] then draws an arrow at the plot edge for
//! every sample left outside that range. Both work on any
//! [`surface::PlotSurface`]; [`surface::RecordingSurface`] keeps everything
//! in memory and [`ui::plot::EguiPlotSurface`] draws into an `egui_plot`.
//!
//! ```
//! use auto_lims::limits::{auto_y_lims, Padding};
//! use auto_lims::outliers::indicate_y_outliers;
//! use auto_lims::surface::{ArrowStyle, RecordingSurface};
//!
//! let mut y: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.01).sin()).collect();
//! y[500] = 40.0;
//! let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
//!
//! let mut surface = RecordingSurface::new();
//! auto_y_lims(&y, &mut surface, Padding::Symmetric(0.1)).unwrap();
//! indicate_y_outliers(&x, &y, &mut surface, None, &[], ArrowStyle::default()).unwrap();
//! assert!(surface.annotations.iter().any(|a| a.xy[0] == 500.0));
//! ```

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod doc_template;
pub mod error;
pub mod limits;
pub mod outliers;
pub mod state;
pub mod surface;
pub mod ui;

pub use error::PlotError;
