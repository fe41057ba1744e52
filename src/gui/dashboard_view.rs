//! Dashboard View Widget
//! Central panel: filtered table, bar charts, evolution chart and narrative.

use crate::charts::ChartPlotter;
use crate::data::CrimeRecord;
use crate::pipeline::ViewModel;
use crate::stats::format_thousands;
use egui::{Color32, RichText, ScrollArea};

const PAGE_TITLE: &str = "Análise de Crimes por Tipo e Estado";
const PAGE_DESCRIPTION: &str = "Aplicativo desenvolvido na disciplina de Programação (FGV Direito) \
    para análise de dados criminais. Os dados incluem tipo de crime, estado, ano e número de \
    registros, com base em informações extraídas de painel público do Power BI. A partir desses \
    dados, são gerados gráficos e um relatório sintético de tendências.";

const TABLE_HEIGHT: f32 = 260.0;
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const WARNING_COLOR: Color32 = Color32::from_rgb(255, 193, 7);

/// What the central panel currently shows.
#[derive(Default)]
enum ViewState {
    #[default]
    Empty,
    Ready(Box<ViewModel>),
    Failed(String),
}

/// Scrollable main dashboard area.
#[derive(Default)]
pub struct DashboardView {
    state: ViewState,
    warnings: Vec<String>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: ViewModel, warnings: Vec<String>) {
        self.state = ViewState::Ready(Box::new(view));
        self.warnings = warnings;
    }

    /// Replace everything with an error; no charts are drawn.
    pub fn set_error(&mut self, message: String) {
        self.state = ViewState::Failed(message);
        self.warnings.clear();
    }

    pub fn view(&self) -> Option<&ViewModel> {
        match &self.state {
            ViewState::Ready(view) => Some(view.as_ref()),
            _ => None,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(PAGE_TITLE).size(26.0).strong());
                ui.add_space(4.0);
                ui.label(RichText::new(PAGE_DESCRIPTION).size(13.0));
                ui.add_space(10.0);

                match &self.state {
                    ViewState::Empty => {
                        ui.label(RichText::new("Carregando dados...").color(Color32::GRAY));
                    }
                    ViewState::Failed(message) => Self::draw_banner(ui, "⛔", message, ERROR_COLOR),
                    ViewState::Ready(view) => {
                        for warning in &self.warnings {
                            Self::draw_banner(ui, "⚠", warning, WARNING_COLOR);
                            ui.add_space(6.0);
                        }
                        Self::draw_dashboard(ui, view);
                    }
                }
            });
    }

    fn draw_dashboard(ui: &mut egui::Ui, view: &ViewModel) {
        Self::section(ui, "Dados filtrados");
        Self::draw_records_table(ui, &view.rows);

        ui.add_space(15.0);
        ui.columns(2, |columns| {
            Self::section(&mut columns[0], "Quantidade de crimes por tipo");
            ChartPlotter::draw_panel(&mut columns[0], "by_type", &view.by_type);

            Self::section(&mut columns[1], "Quantidade de crimes por estado");
            ChartPlotter::draw_panel(&mut columns[1], "by_state", &view.by_state);
        });

        ui.add_space(15.0);
        Self::section(ui, "Evolução temporal (total de crimes por ano)");
        ChartPlotter::draw_line_chart(ui, "evolution", &view.evolution);

        ui.add_space(15.0);
        Self::section(ui, "Relatório de tendências (síntese automática)");
        for line in &view.narrative {
            ui.label(RichText::new(format!("• {line}")).size(14.0));
        }
        ui.add_space(20.0);
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(6.0);
    }

    fn draw_records_table(ui: &mut egui::Ui, rows: &[CrimeRecord]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ScrollArea::vertical()
                    .id_salt("records_table")
                    .max_height(TABLE_HEIGHT)
                    .show(ui, |ui| {
                        egui::Grid::new("records_grid")
                            .striped(true)
                            .min_col_width(90.0)
                            .spacing([16.0, 4.0])
                            .show(ui, |ui| {
                                for header in ["tipo_crime", "estado", "ano", "registros"] {
                                    ui.label(RichText::new(header).strong().size(12.0));
                                }
                                ui.end_row();

                                for record in rows {
                                    ui.label(RichText::new(&record.tipo_crime).size(12.0));
                                    ui.label(RichText::new(&record.estado).size(12.0));
                                    ui.label(RichText::new(record.ano.to_string()).size(12.0));
                                    ui.label(
                                        RichText::new(format_count(record.registros))
                                            .size(12.0),
                                    );
                                    ui.end_row();
                                }
                            });
                    });

                ui.label(
                    RichText::new(format!("{} linhas", rows.len()))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });
    }

    fn draw_banner(ui: &mut egui::Ui, icon: &str, message: &str, color: Color32) {
        egui::Frame::none()
            .fill(color.gamma_multiply(0.15))
            .stroke(egui::Stroke::new(1.0, color))
            .rounding(5.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(format!("{icon} {message}")).color(color));
            });
    }
}

/// Whole counts use `.` grouping; fractional ones keep two decimals.
fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format_thousands(value)
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_keep_fractions() {
        assert_eq!(format_count(12000.0), "12.000");
        assert_eq!(format_count(7.5), "7.50");
    }

    #[test]
    fn error_state_hides_view() {
        let mut view = DashboardView::new();
        view.set_error("falhou".to_string());
        assert!(view.view().is_none());
    }
}
