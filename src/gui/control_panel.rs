//! Control Panel Widget
//! Left side panel with the year, state and crime type filters.

use crate::data::{FilterOptions, FilterSelection};
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::collections::BTreeSet;

/// Left side filter panel.
pub struct ControlPanel {
    pub options: FilterOptions,
    pub selection: Option<FilterSelection>,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            options: FilterOptions::default(),
            selection: None,
            status: "Pronto".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace options and selection after a pipeline run.
    pub fn update(&mut self, options: FilterOptions, selection: FilterSelection) {
        self.options = options;
        self.selection = Some(selection);
        self.export_enabled = true;
    }

    /// Block exports after a failed run. Options and selection are kept so the
    /// next successful run can carry the selection over.
    pub fn disable(&mut self) {
        self.export_enabled = false;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.add_space(5.0);
        ui.label(RichText::new("🔎 Filtros").size(20.0).strong());
        ui.add_space(5.0);
        ui.separator();

        if let Some(selection) = self.selection.as_mut() {
            let options = &self.options;

            // ===== Year =====
            ui.add_space(5.0);
            ui.label(RichText::new("Ano").size(14.0).strong());
            let selected_text = selection
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string());
            ComboBox::from_id_salt("year")
                .width(ui.available_width() - 10.0)
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for year in &options.years {
                        if ui
                            .selectable_value(&mut selection.year, Some(*year), year.to_string())
                            .clicked()
                        {
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });

            ui.add_space(10.0);
            if Self::multi_select(ui, "Estados", "states", &options.states, &mut selection.states) {
                action = ControlPanelAction::SelectionChanged;
            }

            ui.add_space(10.0);
            if Self::multi_select(
                ui,
                "Tipos de crime",
                "crime_types",
                &options.crime_types,
                &mut selection.crime_types,
            ) {
                action = ControlPanelAction::SelectionChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let reload = egui::Button::new(RichText::new("🔄 Recarregar dados").size(14.0))
                .min_size(egui::vec2(200.0, 30.0));
            if ui.add(reload).clicked() {
                action = ControlPanelAction::Reload;
            }

            ui.add_space(8.0);

            ui.add_enabled_ui(self.export_enabled, |ui| {
                let png = egui::Button::new(RichText::new("🖼 Exportar gráficos (PNG)").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(png).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }

                ui.add_space(8.0);

                let csv = egui::Button::new(RichText::new("📄 Baixar dados filtrados (CSV)").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(csv).clicked() {
                    action = ControlPanelAction::ExportCsv;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Erro") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Checkbox list with select all / clear shortcuts. Returns true on change.
    fn multi_select(
        ui: &mut egui::Ui,
        title: &str,
        id: &str,
        available: &[String],
        selected: &mut BTreeSet<String>,
    ) -> bool {
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label(RichText::new(title).size(14.0).strong());
            ui.label(
                RichText::new(format!("({}/{})", selected.len(), available.len()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(160.0)
                    .show(ui, |ui| {
                        for value in available {
                            let mut checked = selected.contains(value);
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                if checked {
                                    selected.insert(value.clone());
                                } else {
                                    selected.remove(value);
                                }
                                changed = true;
                            }
                        }
                    });
            });

        ui.horizontal(|ui| {
            if ui.small_button("Todos").clicked() {
                selected.extend(available.iter().cloned());
                changed = true;
            }
            if ui.small_button("Nenhum").clicked() {
                selected.clear();
                changed = true;
            }
        });

        changed
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    Reload,
    ExportCharts,
    ExportCsv,
}
