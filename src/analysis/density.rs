use std::f64::consts::PI;

use crate::config::{AnalysisConfig, BandwidthRule};
use crate::data::model::Series;
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// DensityCurve
// ---------------------------------------------------------------------------

/// Sampled kernel density estimate of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub name: String,
    pub bandwidth: f64,
    /// `(x, density)` pairs on an evenly spaced grid.
    pub points: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// Gaussian KDE
// ---------------------------------------------------------------------------

/// Estimate the density of the finite samples of `series` with a Gaussian
/// kernel.
///
/// The bandwidth is `σ · factor` where σ is the sample standard deviation and
/// the factor comes from `config.bandwidth`. The curve is evaluated on
/// `config.grid_points` points spanning the data range widened by
/// `config.cut` bandwidths on each side.
///
/// Fewer than two distinct values is a [`AnalysisError::DegenerateInput`].
pub fn estimate(series: &Series, config: &AnalysisConfig) -> Result<DensityCurve, AnalysisError> {
    let samples: Vec<f64> = series.finite_values().collect();

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if samples.len() < 2 || min == max {
        return Err(AnalysisError::DegenerateInput {
            series: series.name.clone(),
            reason: "fewer than 2 distinct values".to_string(),
        });
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let sigma = (samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
    let bandwidth = sigma * bandwidth_factor(config.bandwidth, n);

    log::debug!(
        "{}: {} samples, bandwidth {:.3} ({:?})",
        series.name,
        samples.len(),
        bandwidth,
        config.bandwidth
    );

    let lo = min - config.cut * bandwidth;
    let hi = max + config.cut * bandwidth;
    let step = (hi - lo) / (config.grid_points - 1) as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());

    let points = (0..config.grid_points)
        .map(|i| {
            let x = lo + step * i as f64;
            let sum: f64 = samples
                .iter()
                .map(|&xi| {
                    let u = (x - xi) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum();
            [x, norm * sum]
        })
        .collect();

    Ok(DensityCurve {
        name: series.name.clone(),
        bandwidth,
        points,
    })
}

/// Multiplier applied to σ for a one-dimensional sample of size `n`.
fn bandwidth_factor(rule: BandwidthRule, n: f64) -> f64 {
    match rule {
        BandwidthRule::Scott => n.powf(-0.2),
        BandwidthRule::Silverman => (n * 3.0 / 4.0).powf(-0.2),
    }
}
