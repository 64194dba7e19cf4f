use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::SampleSeries;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sample series from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – numeric `x` and `y` columns (`x` optional)
/// * `.json`    – `{ "x": [...], "y": [...] }` or `[{ "x": .., "y": .. }, ...]`
/// * `.csv`     – header row with `x` and `y` columns (`x` optional)
///
/// When `x` is absent the sample index is used.
pub fn load_file(path: &Path) -> Result<SampleSeries> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let series = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;
    log::info!("Loaded {} samples from {}", series.len(), path.display());
    Ok(series)
}

fn pair(x: Option<Vec<f64>>, y: Vec<f64>) -> Result<SampleSeries> {
    match x {
        Some(x) => Ok(SampleSeries::new(x, y)?),
        None => Ok(SampleSeries::from_y(y)),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Two layouts are accepted:
///
/// ```json
/// { "x": [0.0, 0.5, 1.0], "y": [1.2, 1.4, 97.0] }
/// ```
///
/// ```json
/// [ { "x": 0.0, "y": 1.2 }, { "x": 0.5, "y": 1.4 } ]
/// ```
fn load_json(path: &Path) -> Result<SampleSeries> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<SampleSeries> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    match &root {
        JsonValue::Object(obj) => {
            let y = json_array_to_f64(obj.get("y"), "y")?
                .context("JSON object missing 'y' array")?;
            let x = json_array_to_f64(obj.get("x"), "x")?;
            pair(x, y)
        }
        JsonValue::Array(records) => {
            let mut x = Vec::with_capacity(records.len());
            let mut y = Vec::with_capacity(records.len());
            let mut has_x = true;
            for (i, rec) in records.iter().enumerate() {
                let obj = rec
                    .as_object()
                    .with_context(|| format!("Row {i} is not a JSON object"))?;
                y.push(json_number(obj.get("y")).with_context(|| format!("Row {i}: missing or invalid 'y'"))?);
                match obj.get("x") {
                    Some(v) if has_x => {
                        x.push(json_number(Some(v)).with_context(|| format!("Row {i}: invalid 'x'"))?)
                    }
                    _ => has_x = false,
                }
            }
            pair(has_x.then_some(x), y)
        }
        _ => bail!("Expected a JSON object or array at the top level"),
    }
}

fn json_number(val: Option<&JsonValue>) -> Option<f64> {
    match val? {
        JsonValue::Null => Some(f64::NAN),
        v => v.as_f64(),
    }
}

fn json_array_to_f64(val: Option<&JsonValue>, col: &str) -> Result<Option<Vec<f64>>> {
    let Some(val) = val else {
        return Ok(None);
    };
    let arr = val
        .as_array()
        .with_context(|| format!("'{col}' is not an array"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| json_number(Some(v)).with_context(|| format!("{col}[{j}]: not a number")))
        .collect::<Result<Vec<f64>>>()
        .map(Some)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one sample per row.
/// Empty cells in `y` are read as NaN. Other columns are ignored.
fn load_csv(path: &Path) -> Result<SampleSeries> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<SampleSeries> {
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let y_idx = headers
        .iter()
        .position(|h| h.trim() == "y")
        .context("CSV missing 'y' column")?;
    let x_idx = headers.iter().position(|h| h.trim() == "x");

    let mut x = Vec::new();
    let mut y = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        y.push(parse_cell(record.get(y_idx).unwrap_or(""), row_no, "y")?);
        if let Some(xi) = x_idx {
            x.push(parse_cell(record.get(xi).unwrap_or(""), row_no, "x")?);
        }
    }

    pair(x_idx.map(|_| x), y)
}

fn parse_cell(s: &str, row: usize, col: &str) -> Result<f64> {
    let tok = s.trim();
    if tok.is_empty() {
        return Ok(f64::NAN);
    }
    tok.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{tok}' is not a number"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with numeric `y` (and optionally `x`) columns.
///
/// Float64, Float32, Int64 and Int32 columns are accepted; nulls become NaN.
/// Works with files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<SampleSeries> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut x: Option<Vec<f64>> = None;
    let mut y = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let y_idx = schema
            .index_of("y")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'y' column"))?;
        y.extend(extract_f64_column(batch.column(y_idx)).context("reading 'y'")?);

        if let Ok(x_idx) = schema.index_of("x") {
            x.get_or_insert_with(Vec::new)
                .extend(extract_f64_column(batch.column(x_idx)).context("reading 'x'")?);
        }
    }

    pair(x, y)
}

/// Read a primitive numeric column as `f64`.
fn extract_f64_column(col: &Arc<dyn Array>) -> Result<Vec<f64>> {
    let any = col.as_any();
    let values: Vec<f64> = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect(),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .iter()
            .map(|v| v.map(f64::from).unwrap_or(f64::NAN))
            .collect(),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .iter()
            .map(|v| v.map(|i| i as f64).unwrap_or(f64::NAN))
            .collect(),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .iter()
            .map(|v| v.map(f64::from).unwrap_or(f64::NAN))
            .collect(),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("auto-lims-{}-{name}", std::process::id()))
    }

    #[test]
    fn json_object_layout() {
        let s = parse_json(r#"{ "x": [0, 0.5, 1], "y": [1.0, null, 3] }"#).unwrap();
        assert_eq!(s.x(), &[0.0, 0.5, 1.0]);
        assert_eq!(s.y()[0], 1.0);
        assert!(s.y()[1].is_nan());
    }

    #[test]
    fn json_records_without_x() {
        let s = parse_json(r#"[ { "y": 4 }, { "y": 5 } ]"#).unwrap();
        assert_eq!(s.x(), &[0.0, 1.0]);
        assert_eq!(s.y(), &[4.0, 5.0]);
    }

    #[test]
    fn json_length_mismatch() {
        assert!(parse_json(r#"{ "x": [0, 1], "y": [1] }"#).is_err());
        assert!(parse_json(r#"{ "x": [0, 1] }"#).is_err());
    }

    #[test]
    fn csv_with_and_without_x() {
        let data = "x,y,label\n0.0,1.5,a\n1.0,,b\n2.0,-3,c\n";
        let s = read_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(s.x(), &[0.0, 1.0, 2.0]);
        assert!(s.y()[1].is_nan());
        assert_eq!(s.y()[2], -3.0);

        let s = read_csv(csv::Reader::from_reader("y\n7\n8\n".as_bytes())).unwrap();
        assert_eq!(s.x(), &[0.0, 1.0]);

        assert!(read_csv(csv::Reader::from_reader("a,b\n1,2\n".as_bytes())).is_err());
        assert!(read_csv(csv::Reader::from_reader("y\nnope\n".as_bytes())).is_err());
    }

    #[test]
    fn csv_file_round_trip() {
        let path = temp_path("series.csv");
        std::fs::write(&path, "x,y\n1,10\n2,20\n").unwrap();
        let s = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(s.y(), &[10.0, 20.0]);
    }

    #[test]
    fn parquet_file() {
        let path = temp_path("series.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("x", DataType::Int32, false),
            Field::new("y", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(vec![0, 1, 2])),
                Arc::new(Float64Array::from(vec![Some(0.5), None, Some(2.5)])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let s = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(s.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(s.y()[0], 0.5);
        assert!(s.y()[1].is_nan());
    }

    #[test]
    fn unsupported_extension() {
        assert!(load_file(Path::new("series.xlsx")).is_err());
    }
}
