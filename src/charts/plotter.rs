//! Chart Plotter Module
//! Interactive bar and line charts using egui_plot.

use crate::pipeline::ChartPanel;
use crate::stats::{format_thousands, Aggregate};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const LINE_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red
pub const INFO_COLOR: Color32 = Color32::from_rgb(23, 162, 184);

const CHART_HEIGHT: f32 = 280.0;

/// Draws dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Bar chart for a filtered aggregate, or the info placeholder.
    pub fn draw_panel(ui: &mut egui::Ui, id: &str, panel: &ChartPanel) {
        match panel {
            ChartPanel::Bars(aggregate) => Self::draw_bar_chart(ui, id, aggregate),
            ChartPanel::Placeholder(message) => Self::draw_info(ui, message),
        }
    }

    /// One bar per key, in aggregate order. Keys label the x axis.
    pub fn draw_bar_chart(ui: &mut egui::Ui, id: &str, aggregate: &Aggregate<String>) {
        let labels = aggregate.keys();

        let bars: Vec<Bar> = aggregate
            .entries()
            .iter()
            .enumerate()
            .map(|(i, (key, total))| {
                Bar::new(i as f64, *total)
                    .width(0.6)
                    .name(format!("{key}: {}", format_thousands(*total)))
                    .fill(BAR_COLOR)
            })
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .y_axis_label("registros")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
            });
    }

    /// Yearly totals as a line with point markers.
    pub fn draw_line_chart(ui: &mut egui::Ui, id: &str, evolution: &Aggregate<i32>) {
        if evolution.is_empty() {
            Self::draw_info(ui, "Sem dados para a evolução temporal.");
            return;
        }

        let points: Vec<[f64; 2]> = evolution
            .entries()
            .iter()
            .map(|(year, total)| [f64::from(*year), *total])
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("ano")
            .y_axis_label("registros")
            .x_axis_formatter(|mark, _range| {
                if mark.value.fract() == 0.0 {
                    format!("{}", mark.value as i64)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(LINE_COLOR)
                        .width(2.0)
                        .name("Total por ano"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(LINE_COLOR),
                );
            });
    }

    /// Informational box used instead of an empty chart.
    pub fn draw_info(ui: &mut egui::Ui, message: &str) {
        egui::Frame::none()
            .fill(INFO_COLOR.gamma_multiply(0.15))
            .stroke(egui::Stroke::new(1.0, INFO_COLOR))
            .rounding(5.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(format!("ℹ {message}")).color(INFO_COLOR));
            });
    }
}
