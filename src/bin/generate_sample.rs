use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    /// A cycle count: rounded, never below 1, with rare interrupt spikes.
    fn cycles(&mut self, mean: f64, std_dev: f64) -> f64 {
        if self.next_f64() < 0.01 {
            return (mean * 10.0 + self.gauss(0.0, mean)).round().max(1.0);
        }
        self.gauss(mean, std_dev).round().max(1.0)
    }
}

fn write_csv(path: &Path, headers: &[&str], rows: &[Vec<f64>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Prefetch time per kernel offset; the mapped offset is fast.
fn kaslr(rng: &mut SimpleRng) -> Vec<Vec<f64>> {
    const MAPPED: usize = 137;
    (0..512)
        .map(|offset| {
            let mean = if offset == MAPPED { 110.0 } else { 230.0 };
            vec![rng.cycles(mean, 8.0)]
        })
        .collect()
}

/// `Cycle` plus four trial runs whose hit rate differs.
fn spectre(rng: &mut SimpleRng, n: usize) -> Vec<Vec<f64>> {
    let hit_rates = [0.9, 0.6, 0.3, 0.05];
    (0..n)
        .map(|cycle| {
            let mut row = vec![cycle as f64];
            for &rate in &hit_rates {
                let mean = if rng.next_f64() < rate { 90.0 } else { 250.0 };
                row.push(rng.cycles(mean, 12.0));
            }
            row
        })
        .collect()
}

/// Access time per address for each instruction variant.
fn prefetch(rng: &mut SimpleRng) -> Vec<Vec<f64>> {
    (0..256)
        .map(|i| {
            let cached = i % 64 < 8;
            let load = if cached { 95.0 } else { 240.0 };
            vec![
                (i * 64) as f64,
                rng.cycles(load, 10.0),
                rng.cycles(120.0, 6.0),
                rng.cycles(80.0, 4.0),
                rng.cycles(125.0, 6.0),
            ]
        })
        .collect()
}

/// Mean and standard error of TLB timing per page-table level.
fn tlb(rng: &mut SimpleRng) -> Vec<Vec<f64>> {
    const REPEATS: usize = 1000;
    [160.0, 172.0, 185.0, 199.0, 214.0]
        .iter()
        .map(|&level_mean| {
            let samples: Vec<f64> = (0..REPEATS).map(|_| rng.gauss(level_mean, 15.0)).collect();
            let n = samples.len() as f64;
            let avg = samples.iter().sum::<f64>() / n;
            let var = samples.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / n;
            vec![avg.round(), var.sqrt() / n.sqrt()]
        })
        .collect()
}

fn write_prefetch_parquet(path: &Path, rows: &[Vec<f64>]) -> Result<()> {
    let names = ["Load", "Prefetch", "NOP", "PrefetchNTA"];

    let mut fields = vec![Field::new("Index", DataType::Int64, false)];
    fields.extend(names.iter().map(|n| Field::new(*n, DataType::Float64, false)));
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(
        rows.iter().map(|r| r[0] as i64).collect::<Vec<_>>(),
    ))];
    for col in 1..=names.len() {
        arrays.push(Arc::new(Float64Array::from(
            rows.iter().map(|r| r[col]).collect::<Vec<_>>(),
        )));
    }

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir).context("creating output directory")?;

    let mut rng = SimpleRng::new(42);

    write_csv(&out_dir.join("kaslr.csv"), &["Time"], &kaslr(&mut rng))?;

    let runs = ["Cycle", "run0", "run1", "run2", "run3"];
    write_csv(&out_dir.join("spectre.csv"), &runs, &spectre(&mut rng, 200))?;
    write_csv(&out_dir.join("spectre_raw.csv"), &runs, &spectre(&mut rng, 2000))?;

    let prefetch_rows = prefetch(&mut rng);
    write_csv(
        &out_dir.join("prefetch.csv"),
        &["Index", "Load", "Prefetch", "NOP", "PrefetchNTA"],
        &prefetch_rows,
    )?;
    write_prefetch_parquet(&out_dir.join("prefetch.parquet"), &prefetch_rows)?;

    write_csv(&out_dir.join("timing.csv"), &["tlb", "errtlb"], &tlb(&mut rng))?;

    Ok(())
}
