/// Data layer: the sample series and file loading.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SampleSeries
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SampleSeries  │  paired x / y
///   └──────────────┘
/// ```

pub mod loader;
pub mod model;
