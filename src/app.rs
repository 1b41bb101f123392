use eframe::egui;

use crate::chart::Chart;
use crate::color::SeriesColors;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// Shows one precomputed chart. Nothing is recomputed per frame.
pub struct TimingLensApp {
    pub chart: Chart,
    pub colors: SeriesColors,
}

impl TimingLensApp {
    pub fn new(chart: Chart) -> Self {
        let colors = SeriesColors::new(chart.layer_names());
        Self { chart, colors }
    }
}

impl eframe::App for TimingLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: source and notes ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.chart);
        });

        // ---- Left side panel: series statistics ----
        egui::SidePanel::left("series_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.chart, &self.colors);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::timing_plot(ui, &self.chart, &self.colors);
        });
    }
}

/// Open a native window for `chart` and block until it is closed.
pub fn show(chart: Chart) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = format!("{} – {}", chart.title, chart.source.display());
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(TimingLensApp::new(chart)))),
    )
    .map_err(|e| anyhow::anyhow!("rendering failed: {e}"))
}
