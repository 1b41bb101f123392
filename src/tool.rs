use std::path::{Path, PathBuf};

use crate::analysis::stats::Summary;
use crate::analysis::{baseline, density, outlier};
use crate::chart::{Chart, Layer, SeriesInfo};
use crate::config::AnalysisConfig;
use crate::data::model::{Series, Table};
use crate::data::select::{select, select_raw};
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Tool instances
// ---------------------------------------------------------------------------

/// The measurement programs whose output we know how to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Prefetch time per kernel offset (`Time`).
    Kaslr,
    /// Prefetch time per trial run, indexed by `Cycle`.
    Spectre,
    /// Load vs. prefetch access time per address (`Index`).
    Prefetch,
    /// TLB timing with standard error per mapping level (`tlb`, `errtlb`).
    Tlb,
}

/// How the selected series are turned into layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Line,
    /// Outlier-filtered kernel density per column.
    Density,
    Bar,
}

const PREFETCH_CANDIDATES: [&str; 4] = ["Load", "Prefetch", "NOP", "PrefetchNTA"];

impl Tool {
    pub fn title(self) -> &'static str {
        match self {
            Tool::Kaslr => "KASLR break",
            Tool::Spectre => "Kernel Spectre",
            Tool::Prefetch => "Load vs. prefetch",
            Tool::Tlb => "TLB mapping level",
        }
    }

    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            Tool::Kaslr => ("Offset", "Prefetch Time"),
            Tool::Spectre => ("Prefetch Time", "# Cases"),
            Tool::Prefetch => ("Addresses", "Time"),
            Tool::Tlb => ("Index", "Time"),
        }
    }

    /// Column used as x in line mode; positional index when absent.
    fn x_column(self) -> Option<&'static str> {
        match self {
            Tool::Spectre => Some("Cycle"),
            Tool::Prefetch => Some("Index"),
            Tool::Kaslr | Tool::Tlb => None,
        }
    }

    /// Spectre runs dumped as `*_raw.*` (or `force_raw`) hold raw per-trial
    /// samples and are plotted as densities.
    pub fn mode(self, path: &Path, force_raw: bool) -> Mode {
        match self {
            Tool::Tlb => Mode::Bar,
            Tool::Spectre => {
                let raw_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.contains("_raw."));
                if force_raw || raw_name {
                    Mode::Density
                } else {
                    Mode::Line
                }
            }
            Tool::Kaslr | Tool::Prefetch => Mode::Line,
        }
    }

    fn series(self, table: &Table) -> Vec<(String, Series)> {
        match self {
            Tool::Kaslr => select(table, &["Time"]),
            Tool::Spectre => select_raw(table, "Cycle"),
            Tool::Prefetch => select(table, &PREFETCH_CANDIDATES),
            Tool::Tlb => select(table, &["tlb", "errtlb"]),
        }
    }
}

// ---------------------------------------------------------------------------
// Chart construction
// ---------------------------------------------------------------------------

/// Run the selected series through the analysis for `mode` and collect the
/// resulting layers. The table is only read.
pub fn build_chart(
    tool: Tool,
    mode: Mode,
    table: &Table,
    source: &Path,
    config: &AnalysisConfig,
) -> Result<Chart, AnalysisError> {
    config.validate()?;

    let (x_label, y_label) = tool.axis_labels();
    let mut chart = Chart {
        title: tool.title().to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        source: PathBuf::from(source),
        rows: table.len(),
        layers: Vec::new(),
        series: Vec::new(),
        notes: Vec::new(),
    };

    match mode {
        Mode::Line => line_layers(tool, table, &mut chart),
        Mode::Density => density_layers(tool, table, config, &mut chart),
        Mode::Bar => bar_layers(tool, table, config, &mut chart)?,
    }

    if chart.layers.is_empty() {
        log::warn!("Nothing to plot in {}", source.display());
    }
    Ok(chart)
}

fn line_layers(tool: Tool, table: &Table, chart: &mut Chart) {
    let x = tool.x_column().and_then(|name| table.column(name));

    for (name, series) in tool.series(table) {
        let points = match x {
            Some(x) => x
                .values
                .iter()
                .zip(&series.values)
                .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
                .map(|(&xi, &yi)| [xi, yi])
                .collect(),
            None => series.indexed_points(),
        };
        chart.series.push(SeriesInfo {
            name: name.clone(),
            summary: Summary::compute(&series.values),
            masked: 0,
            bandwidth: None,
        });
        chart.layers.push(Layer::Line { name, points });
    }
}

fn density_layers(tool: Tool, table: &Table, config: &AnalysisConfig, chart: &mut Chart) {
    for (name, series) in tool.series(table) {
        let (filtered, mask) = outlier::filter(&series, config.z_threshold);
        let masked = mask
            .iter()
            .zip(&series.values)
            .filter(|(keep, v)| !**keep && v.is_finite())
            .count();

        match density::estimate(&filtered, config) {
            Ok(curve) => {
                chart.series.push(SeriesInfo {
                    name,
                    summary: Summary::compute(&filtered.values),
                    masked,
                    bandwidth: Some(curve.bandwidth),
                });
                chart.layers.push(Layer::Density(curve));
            }
            Err(e) => {
                log::warn!("Skipping {name}: {e}");
                chart.notes.push(e.to_string());
            }
        }
    }
}

fn bar_layers(
    tool: Tool,
    table: &Table,
    config: &AnalysisConfig,
    chart: &mut Chart,
) -> Result<(), AnalysisError> {
    let selected = tool.series(table);
    let column = |col: &str| {
        selected
            .iter()
            .find(|(name, _)| name == col)
            .map(|(_, series)| series)
            .ok_or_else(|| AnalysisError::InvalidInput(format!("missing column '{col}'")))
    };
    let values = column("tlb")?;
    let errors = column("errtlb")?;

    let mut bars = baseline::normalize(values, errors, config.baseline_factor)?;
    bars.name = "TLB".to_string();

    chart.series.push(SeriesInfo {
        name: bars.name.clone(),
        summary: Summary::compute(&values.values),
        masked: 0,
        bandwidth: None,
    });
    chart.layers.push(Layer::Bars(bars));
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn table(columns: Vec<(&str, Vec<f64>)>) -> Table {
        Table::from_columns(columns.into_iter().map(|(n, v)| (n.to_string(), v)).collect()).unwrap()
    }

    fn build(tool: Tool, mode: Mode, t: &Table) -> Chart {
        build_chart(tool, mode, t, Path::new("run.csv"), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn raw_mode_from_file_name() {
        assert_eq!(Tool::Spectre.mode(Path::new("out/spectre_raw.csv"), false), Mode::Density);
        assert_eq!(Tool::Spectre.mode(Path::new("out/spectre.csv"), false), Mode::Line);
        assert_eq!(Tool::Spectre.mode(Path::new("out/spectre.csv"), true), Mode::Density);
        assert_eq!(Tool::Prefetch.mode(Path::new("a_raw.csv"), false), Mode::Line);
        assert_eq!(Tool::Tlb.mode(Path::new("timing.csv"), false), Mode::Bar);
    }

    #[test]
    fn prefetch_lines_use_index_and_candidate_order() {
        let t = table(vec![
            ("Index", vec![0.0, 64.0, 128.0]),
            ("Prefetch", vec![110.0, 112.0, 109.0]),
            ("Load", vec![230.0, 228.0, 231.0]),
        ]);
        let chart = build(Tool::Prefetch, Mode::Line, &t);

        assert_eq!(chart.layer_names(), ["Load", "Prefetch"]);
        assert_eq!(chart.x_label, "Addresses");
        match &chart.layers[0] {
            Layer::Line { points, .. } => {
                assert_eq!(points, &vec![[0.0, 230.0], [64.0, 228.0], [128.0, 231.0]])
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn kaslr_line_is_positional() {
        let t = table(vec![("Time", vec![300.0, 290.0, f64::NAN, 120.0])]);
        let chart = build(Tool::Kaslr, Mode::Line, &t);

        assert_eq!(
            chart.layers,
            vec![Layer::Line {
                name: "Time".into(),
                points: vec![[0.0, 300.0], [1.0, 290.0], [3.0, 120.0]],
            }]
        );
    }

    #[test]
    fn kaslr_without_time_is_empty_not_an_error() {
        let t = table(vec![("Offset", vec![1.0, 2.0])]);
        let chart = build(Tool::Kaslr, Mode::Line, &t);
        assert!(chart.layers.is_empty());
    }

    #[test]
    fn spectre_density_skips_flat_runs() {
        let t = table(vec![
            ("Cycle", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            ("run0", vec![120.0, 118.0, 122.0, 119.0, 121.0, 120.0, 900.0]),
            ("run1", vec![80.0, 80.0, 80.0, 80.0, 80.0, 80.0, 80.0]),
            ("run2", vec![60.0, 64.0, 61.0, 63.0, 62.0, 60.0, 61.0]),
        ]);
        let chart = build(Tool::Spectre, Mode::Density, &t);

        assert_eq!(chart.layer_names(), ["run0", "run2"]);
        assert_eq!(chart.notes.len(), 1);
        assert!(chart.notes[0].contains("run1"));

        // The 900 spike is masked before estimation.
        let run0 = &chart.series[0];
        assert_eq!(run0.masked, 1);
        assert_eq!(run0.summary.unwrap().max, 122.0);
    }

    #[test]
    fn spectre_line_mode_plots_against_cycle() {
        let t = table(vec![("Cycle", vec![10.0, 20.0]), ("run0", vec![1.0, 2.0])]);
        let chart = build(Tool::Spectre, Mode::Line, &t);
        assert_eq!(
            chart.layers,
            vec![Layer::Line {
                name: "run0".into(),
                points: vec![[10.0, 1.0], [20.0, 2.0]],
            }]
        );
    }

    #[test]
    fn tlb_bars_are_baseline_corrected() {
        let t = table(vec![("tlb", vec![10.0, 12.0, 8.0]), ("errtlb", vec![1.0, 1.0, 1.0])]);
        let chart = build(Tool::Tlb, Mode::Bar, &t);

        let Layer::Bars(bars) = &chart.layers[0] else {
            panic!("expected bars");
        };
        assert_eq!(bars.name, "TLB");
        assert_approx_eq!(bars.baseline, 6.4);
        assert_approx_eq!(bars.adjusted[2], 1.6);
        assert_eq!(bars.errors, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn tlb_needs_both_columns() {
        let t = table(vec![("tlb", vec![10.0])]);
        let err = build_chart(Tool::Tlb, Mode::Bar, &t, Path::new("timing.csv"), &AnalysisConfig::default())
            .unwrap_err();
        assert_eq!(err, AnalysisError::InvalidInput("missing column 'errtlb'".into()));
    }

    #[test]
    fn tlb_bars_ignore_column_order_and_extras() {
        let t = table(vec![
            ("level", vec![0.0, 1.0]),
            ("errtlb", vec![0.5, 0.25]),
            ("tlb", vec![20.0, 30.0]),
        ]);
        let chart = build(Tool::Tlb, Mode::Bar, &t);

        let Layer::Bars(bars) = &chart.layers[0] else {
            panic!("expected bars");
        };
        assert_eq!(bars.baseline, 0.8 * 20.0);
        assert_eq!(bars.errors, [0.5, 0.25]);
    }

    #[test]
    fn config_is_validated_first() {
        let t = table(vec![("Time", vec![1.0])]);
        let config = AnalysisConfig {
            z_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(build_chart(Tool::Kaslr, Mode::Line, &t, Path::new("k.csv"), &config).is_err());
    }
}
