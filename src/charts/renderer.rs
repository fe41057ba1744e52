//! Static Chart Renderer
//! Writes the dashboard charts to a single PNG with plotters.
//!
//! Layout:
//! 1. Top left: crime type bar chart (filtered view)
//! 2. Top right: state bar chart (filtered view)
//! 3. Bottom: yearly evolution line chart (full table)

use crate::pipeline::{ChartPanel, ViewModel};
use crate::stats::Aggregate;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

pub const EXPORT_WIDTH: u32 = 1600;
pub const EXPORT_HEIGHT: u32 = 1100;

const BAR_FILL: RGBColor = RGBColor(52, 152, 219);
const LINE_STROKE: RGBColor = RGBColor(231, 76, 60);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the three dashboard charts to `path`.
    pub fn render_dashboard_png(view: &ViewModel, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (EXPORT_WIDTH, EXPORT_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let (upper, lower) = root.split_vertically(EXPORT_HEIGHT / 2);
        let (left, right) = upper.split_horizontally(EXPORT_WIDTH / 2);

        Self::draw_panel(&left, "Quantidade de crimes por tipo", &view.by_type)?;
        Self::draw_panel(&right, "Quantidade de crimes por estado", &view.by_state)?;
        Self::draw_evolution(
            &lower,
            "Evolução temporal (total de crimes por ano)",
            &view.evolution,
        )?;

        root.present()?;
        log::info!("Charts exported to {}", path.display());
        Ok(())
    }

    fn draw_panel(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        title: &str,
        panel: &ChartPanel,
    ) -> Result<()> {
        match panel {
            ChartPanel::Bars(aggregate) => Self::draw_bars(area, title, aggregate),
            ChartPanel::Placeholder(message) => Self::draw_placeholder(area, title, message),
        }
    }

    fn draw_bars(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        title: &str,
        aggregate: &Aggregate<String>,
    ) -> Result<()> {
        let labels = aggregate.keys();
        let y_max = Self::y_max(aggregate.entries().iter().map(|(_, v)| *v));

        let mut chart = ChartBuilder::on(area)
            .caption(title, ("sans-serif", 26))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((0usize..labels.len()).into_segmented(), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("registros")
            .x_labels(labels.len())
            .x_label_formatter(&|value| match value {
                SegmentValue::CenterOf(idx) => labels.get(*idx).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BAR_FILL.filled())
                .margin(12)
                .data(
                    aggregate
                        .entries()
                        .iter()
                        .enumerate()
                        .map(|(i, (_, total))| (i, *total)),
                ),
        )?;

        Ok(())
    }

    fn draw_evolution(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        title: &str,
        evolution: &Aggregate<i32>,
    ) -> Result<()> {
        let (Some(&(first, _)), Some(&(last, _))) = (evolution.first(), evolution.last()) else {
            return Self::draw_placeholder(area, title, "Sem dados para a evolução temporal.");
        };

        let x_range = Self::year_range(first, last);
        let y_max = Self::y_max(evolution.entries().iter().map(|(_, v)| *v));
        let points: Vec<(i32, f64)> = evolution.entries().to_vec();

        let mut chart = ChartBuilder::on(area)
            .caption(title, ("sans-serif", 26))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_desc("ano")
            .y_desc("registros")
            .x_label_formatter(&|year| year.to_string())
            .draw()?;

        chart.draw_series(LineSeries::new(points.clone(), LINE_STROKE.stroke_width(3)))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 5, LINE_STROKE.filled())),
        )?;

        Ok(())
    }

    fn draw_placeholder(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        title: &str,
        message: &str,
    ) -> Result<()> {
        let inner = area.titled(title, ("sans-serif", 26))?;
        inner.draw(&Text::new(
            message.to_string(),
            (30, 40),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        Ok(())
    }

    /// Upper y bound with headroom; never zero.
    /// A single year still needs a non-empty x range.
    fn year_range(first: i32, last: i32) -> std::ops::Range<i32> {
        first..last.max(first.saturating_add(1))
    }

    fn y_max(values: impl Iterator<Item = f64>) -> f64 {
        let max = values.fold(0.0_f64, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }
}
