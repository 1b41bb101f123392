use std::path::PathBuf;

use crate::analysis::baseline::BaselineAdjustedSeries;
use crate::analysis::density::DensityCurve;
use crate::analysis::stats::Summary;

// ---------------------------------------------------------------------------
// Chart – everything the renderer needs, independent of egui
// ---------------------------------------------------------------------------

/// One drawable item. Each layer gets one legend entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// `(x, y)` points joined by a line.
    Line { name: String, points: Vec<[f64; 2]> },
    /// Kernel density curve.
    Density(DensityCurve),
    /// Bars at positions `0..n` with error bars.
    Bars(BaselineAdjustedSeries),
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::Line { name, .. } => name,
            Layer::Density(curve) => &curve.name,
            Layer::Bars(bars) => &bars.name,
        }
    }
}

/// Per-series numbers shown next to the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesInfo {
    pub name: String,
    pub summary: Option<Summary>,
    /// Samples removed by outlier rejection (density mode only).
    pub masked: usize,
    /// Kernel bandwidth (density mode only).
    pub bandwidth: Option<f64>,
}

/// A fully computed chart, ready to hand to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub source: PathBuf,
    pub rows: usize,
    pub layers: Vec<Layer>,
    pub series: Vec<SeriesInfo>,
    /// Series that were skipped and why.
    pub notes: Vec<String>,
}

impl Chart {
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(Layer::name).collect()
    }
}
