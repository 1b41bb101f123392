use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, MarkerShape, Plot, PlotPoints, PlotUi, Points};

use crate::analysis::baseline::BaselineAdjustedSeries;
use crate::chart::{Chart, Layer};
use crate::color::SeriesColors;

const BAR_WIDTH: f64 = 0.25;

// ---------------------------------------------------------------------------
// Timing plot (central panel)
// ---------------------------------------------------------------------------

/// Render every layer of the chart in the central panel.
pub fn timing_plot(ui: &mut Ui, chart: &Chart, colors: &SeriesColors) {
    if chart.layers.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No recognised columns to plot in this file");
        });
        return;
    }

    Plot::new("timing_plot")
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for layer in &chart.layers {
                let color = colors.color_for(layer.name());
                match layer {
                    Layer::Line { name, points } => {
                        let points: PlotPoints = points.iter().copied().collect();
                        plot_ui.line(Line::new(points).name(name).color(color).width(1.5));
                    }
                    Layer::Density(curve) => {
                        let points: PlotPoints = curve.points.iter().copied().collect();
                        plot_ui.line(Line::new(points).name(&curve.name).color(color).width(1.5));
                    }
                    Layer::Bars(bars) => bar_layer(plot_ui, bars, color),
                }
            }
        });
}

/// Bars plus a vertical error segment and an `x` marker per bar.
fn bar_layer(plot_ui: &mut PlotUi, bars: &BaselineAdjustedSeries, color: Color32) {
    let chart_bars: Vec<Bar> = bars
        .adjusted
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| Bar::new(i as f64, v).width(BAR_WIDTH))
        .collect();
    plot_ui.bar_chart(BarChart::new(chart_bars).name(&bars.name).color(color));

    for (i, (&v, &err)) in bars.adjusted.iter().zip(&bars.errors).enumerate() {
        if !v.is_finite() || !err.is_finite() {
            continue;
        }
        let x = i as f64;
        let segment: PlotPoints = [[x, v - err], [x, v + err]].into_iter().collect();
        plot_ui.line(Line::new(segment).color(Color32::BLACK).width(1.0));
    }

    let markers: PlotPoints = bars
        .adjusted
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| [i as f64, v])
        .collect();
    plot_ui.points(
        Points::new(markers)
            .shape(MarkerShape::Cross)
            .radius(4.0)
            .color(Color32::BLACK),
    );
}
