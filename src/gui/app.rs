//! Crime Dashboard Main Application
//! Sidebar filters plus the dashboard view, re-running the pipeline on change.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::DataLoader;
use crate::gui::{ControlPanel, ControlPanelAction, DashboardView};
use crate::pipeline;
use egui::SidePanel;
use polars::prelude::*;
use std::path::Path;

/// Main application window.
pub struct CrimeDashboardApp {
    config: DashboardConfig,
    loader: DataLoader,
    control_panel: ControlPanel,
    dashboard_view: DashboardView,
    /// Set whenever the selection changes; cleared by the next run.
    needs_run: bool,
}

impl CrimeDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self {
            config,
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            dashboard_view: DashboardView::new(),
            needs_run: true,
        }
    }

    /// One full pipeline pass with the current selection.
    fn run_pipeline(&mut self) {
        let previous = self
            .control_panel
            .selection
            .as_ref()
            .map(|selection| (selection, &self.control_panel.options));

        match pipeline::run(&mut self.loader, &self.config, previous) {
            Ok(run) => {
                let status = format!("{} linhas filtradas", run.view.rows.len());
                self.control_panel.update(run.options, run.selection);
                self.control_panel.set_status(&status);
                self.dashboard_view.set_view(run.view, run.warnings);
            }
            Err(err) => {
                log::error!("Dashboard run failed: {err:#}");
                self.control_panel.disable();
                self.control_panel.set_status("Erro ao carregar os dados");
                self.dashboard_view
                    .set_error(pipeline::user_message(&err, &self.config));
            }
        }
    }

    /// Drop the cached table so the next run re-reads the file.
    fn handle_reload(&mut self) {
        self.loader.invalidate(&self.config.data_path);
        self.needs_run = true;
    }

    /// Handle PNG export - render the current charts to a user chosen file
    fn handle_export_charts(&mut self) {
        let Some(view) = self.dashboard_view.view() else {
            self.control_panel.set_status("Nenhum gráfico para exportar");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("crimes_dashboard.png")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match StaticChartRenderer::render_dashboard_png(view, &output_path) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Gráficos exportados: {}", output_path.display()));
                if let Err(e) = open::that(&output_path) {
                    log::warn!("Could not open {}: {e}", output_path.display());
                }
            }
            Err(e) => {
                log::error!("Chart export failed: {e:#}");
                self.control_panel
                    .set_status(&format!("Erro ao exportar gráficos: {e}"));
            }
        }
    }

    /// Handle CSV export - write the filtered view to a user chosen file
    fn handle_export_csv(&mut self) {
        let Some(view) = self.dashboard_view.view() else {
            self.control_panel.set_status("Nenhum dado para exportar");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name("crimes_filtrados.csv")
            .save_file()
        {
            Some(path) => path,
            None => return,
        };

        let mut df = view.filtered.frame().clone();
        match write_csv(&mut df, &output_path) {
            Ok(()) => {
                log::info!("Filtered rows exported to {}", output_path.display());
                self.control_panel
                    .set_status(&format!("CSV exportado: {}", output_path.display()));
            }
            Err(e) => {
                log::error!("CSV export failed: {e:#}");
                self.control_panel
                    .set_status(&format!("Erro ao exportar CSV: {e}"));
            }
        }
    }
}

/// Write a frame as comma separated text with a header row.
fn write_csv(df: &mut DataFrame, path: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)?;
    Ok(())
}

impl eframe::App for CrimeDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.needs_run {
            self.needs_run = false;
            self.run_pipeline();
        }

        // Left panel - Filters
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SelectionChanged => self.needs_run = true,
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::ExportCsv => self.handle_export_csv(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard_view.show(ui);
        });

        if self.needs_run {
            ctx.request_repaint();
        }
    }
}
