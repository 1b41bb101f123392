use clap::{Args, ValueEnum};

use crate::error::AnalysisError;

pub const DEFAULT_Z_THRESHOLD: f64 = 2.0;
pub const DEFAULT_BASELINE_FACTOR: f64 = 0.8;
pub const DEFAULT_GRID_POINTS: usize = 200;
pub const DEFAULT_CUT: f64 = 3.0;

// ---------------------------------------------------------------------------
// Bandwidth selection
// ---------------------------------------------------------------------------

/// Rule used to pick the Gaussian kernel bandwidth from the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BandwidthRule {
    /// `σ · n^(-1/5)`
    #[default]
    Scott,
    /// `σ · (3n/4)^(-1/5)`
    Silverman,
}

// ---------------------------------------------------------------------------
// AnalysisConfig – knobs shared by every tool
// ---------------------------------------------------------------------------

/// Tunables for outlier rejection, density estimation and baseline correction.
///
/// Flattened into every subcommand so callers (and tests) can vary them.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct AnalysisConfig {
    /// Samples further than this many standard deviations from the mean are masked.
    #[arg(long, default_value_t = DEFAULT_Z_THRESHOLD)]
    pub z_threshold: f64,

    /// Bar baseline as a fraction of the smallest value.
    #[arg(long, default_value_t = DEFAULT_BASELINE_FACTOR)]
    pub baseline_factor: f64,

    /// Kernel bandwidth rule for density curves.
    #[arg(long, value_enum, default_value_t = BandwidthRule::Scott)]
    pub bandwidth: BandwidthRule,

    /// Number of evaluation points per density curve.
    #[arg(long, default_value_t = DEFAULT_GRID_POINTS)]
    pub grid_points: usize,

    /// How many bandwidths the density curve extends past the data range.
    #[arg(long, default_value_t = DEFAULT_CUT)]
    pub cut: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            z_threshold: DEFAULT_Z_THRESHOLD,
            baseline_factor: DEFAULT_BASELINE_FACTOR,
            bandwidth: BandwidthRule::default(),
            grid_points: DEFAULT_GRID_POINTS,
            cut: DEFAULT_CUT,
        }
    }
}

impl AnalysisConfig {
    /// Reject values that would make the downstream math meaningless.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.z_threshold.is_finite() || self.z_threshold < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "z-threshold must be a finite value >= 0, got {}",
                self.z_threshold
            )));
        }
        if !self.baseline_factor.is_finite() {
            return Err(AnalysisError::InvalidInput(format!(
                "baseline factor must be finite, got {}",
                self.baseline_factor
            )));
        }
        if self.grid_points < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "grid needs at least 2 points, got {}",
                self.grid_points
            )));
        }
        if !self.cut.is_finite() || self.cut < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "cut must be a finite value >= 0, got {}",
                self.cut
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert_eq!(config.z_threshold, 2.0);
        assert_eq!(config.baseline_factor, 0.8);
        assert_eq!(config.bandwidth, BandwidthRule::Scott);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_negative_threshold() {
        let config = AnalysisConfig {
            z_threshold: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_tiny_grid() {
        let config = AnalysisConfig {
            grid_points: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
