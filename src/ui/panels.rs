use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::Chart;
use crate::color::SeriesColors;

// ---------------------------------------------------------------------------
// Left side panel – per-series statistics
// ---------------------------------------------------------------------------

/// Render one collapsible block per plotted series with its summary.
pub fn side_panel(ui: &mut Ui, chart: &Chart, colors: &SeriesColors) {
    ui.heading("Series");
    ui.separator();

    if chart.series.is_empty() {
        ui.label("Nothing plotted.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for info in &chart.series {
                let header = RichText::new(&info.name)
                    .strong()
                    .color(colors.color_for(&info.name));

                egui::CollapsingHeader::new(header)
                    .id_salt(&info.name)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        let Some(s) = &info.summary else {
                            ui.label("no finite samples");
                            return;
                        };
                        egui::Grid::new(("stats", &info.name))
                            .num_columns(2)
                            .striped(true)
                            .show(ui, |ui: &mut Ui| {
                                let rows = [
                                    ("samples", s.count.to_string()),
                                    ("mean", format!("{:.2}", s.average)),
                                    ("variance", format!("{:.2}", s.variance)),
                                    ("std", format!("{:.2}", s.std_deviation)),
                                    ("std err", format!("{:.3}", s.std_error)),
                                    ("min", format!("{:.2}", s.min)),
                                    ("max", format!("{:.2}", s.max)),
                                ];
                                for (label, value) in rows {
                                    ui.label(label);
                                    ui.label(value);
                                    ui.end_row();
                                }
                                if info.masked > 0 {
                                    ui.label("outliers");
                                    ui.label(info.masked.to_string());
                                    ui.end_row();
                                }
                                if let Some(bw) = info.bandwidth {
                                    ui.label("bandwidth");
                                    ui.label(format!("{bw:.3}"));
                                    ui.end_row();
                                }
                            });
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the header: tool, source file, row count and skipped series.
pub fn top_bar(ui: &mut Ui, chart: &Chart) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.strong(&chart.title);
        ui.separator();
        ui.label(chart.source.display().to_string());
        ui.separator();
        ui.label(format!(
            "{} rows, {} series plotted",
            chart.rows,
            chart.layers.len()
        ));

        for note in &chart.notes {
            ui.separator();
            ui.label(RichText::new(format!("skipped: {note}")).color(Color32::RED));
        }
    });
}
