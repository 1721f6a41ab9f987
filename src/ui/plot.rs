use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::data::model::SeriesStyle;
use crate::data::transform;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Benchmark chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart in the central panel.
pub fn bench_chart(ui: &mut Ui, state: &AppState) {
    if state.sheet.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a benchmark log to plot it  (File → Open…)");
        });
        return;
    }

    if let Some(title) = &state.figure.title {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(title);
        });
    }

    let shaped = state.shaped_visible();
    let color_map = &state.color_map;

    Plot::new("bench_chart")
        .legend(Legend::default())
        .x_axis_label(state.figure.x_desc.as_str())
        .y_axis_label(state.figure.y_desc.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &shaped {
                let color = color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&series.name))
                    .unwrap_or(Color32::LIGHT_BLUE);

                // Gaps from outer merges must break the line, not bridge it.
                for segment in transform::gap_segments(&series.x, &series.y) {
                    match series.style {
                        SeriesStyle::Line => {
                            let points: PlotPoints = segment.into();
                            plot_ui.line(
                                Line::new(points)
                                    .name(&series.name)
                                    .color(color)
                                    .width(1.5),
                            );
                        }
                        SeriesStyle::Step => {
                            let points: PlotPoints = transform::step_expand(&segment).into();
                            plot_ui.line(
                                Line::new(points)
                                    .name(&series.name)
                                    .color(color)
                                    .width(1.5),
                            );
                        }
                        SeriesStyle::Points => {
                            let points: PlotPoints = segment.into();
                            plot_ui.points(
                                Points::new(points)
                                    .name(&series.name)
                                    .color(color)
                                    .radius(2.0),
                            );
                        }
                    }
                }
            }
        });
}
