//! Writes `sample_series.parquet` (a noisy signal with a few spikes) and a
//! matching `sample_figure.json` that masks some of the spikes.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use auto_lims::config::{FigureConfig, MaskSpec};
use auto_lims::limits::Padding;

// Seeded in-file generator: the sample files come out identical on every run
// and the crate needs no `rand` dependency for a single binary.
/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const N_SAMPLES: usize = 2000;

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let x: Vec<f64> = (0..N_SAMPLES).map(|i| i as f64 * 0.05).collect();
    let mut y: Vec<f64> = x
        .iter()
        .map(|&t| (t * 0.3).sin() + 0.2 * (t * 2.1).cos() + rng.gauss(0.0, 0.05))
        .collect();

    // Spikes: cosmic-ray hits upwards, dropouts downwards.
    let spikes_up = [137usize, 640, 641, 1502];
    let dropouts = [400usize, 1210, 1777];
    for &i in &spikes_up {
        y[i] += 15.0 + 10.0 * rng.next_f64();
    }
    for &i in &dropouts {
        y[i] -= 12.0 + 6.0 * rng.next_f64();
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Float64, false),
        Field::new("y", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(x)),
            Arc::new(Float64Array::from(y)),
        ],
    )
    .context("building record batch")?;

    let series_path = "sample_series.parquet";
    let file = std::fs::File::create(series_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    let config = FigureConfig {
        pad: Padding::Asymmetric { bottom: 0.1, top: 0.2 },
        default_color: Some("black".to_string()),
        masks: vec![
            MaskSpec {
                name: "cosmic rays".to_string(),
                mask: Some(spikes_up.to_vec()),
                color: Some("#d62728".to_string()),
                plot: None,
            },
            MaskSpec {
                name: "known dropouts".to_string(),
                mask: Some(vec![dropouts[0]]),
                color: None,
                plot: Some(false),
            },
        ],
        ..FigureConfig::default()
    };
    let config_path = "sample_figure.json";
    std::fs::write(config_path, config.to_json()?).context("writing figure config")?;

    println!(
        "Wrote {N_SAMPLES} samples to {series_path} ({} spikes, {} dropouts) and config to {config_path}",
        spikes_up.len(),
        dropouts.len()
    );
    Ok(())
}
