//! Control Panel Widget
//! Left side panel with the day and market type filters and export controls.

use crate::api::IndexView;
use crate::charts::{ExportFormat, Selection};
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

/// One checkbox entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption {
    pub value: String,
    pub selected: bool,
}

/// Left side control panel with data source, filters and export buttons.
pub struct ControlPanel {
    /// Table loaded at startup. Shown, never changed.
    pub data_path: PathBuf,
    pub days: Vec<FilterOption>,
    pub market_types: Vec<FilterOption>,
    pub layer_count: usize,
    pub point_count: usize,
    pub progress: f32,
    pub status: String,
    pub busy: bool,
    pub has_document: bool,
}

impl ControlPanel {
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            data_path,
            days: Vec::new(),
            market_types: Vec::new(),
            layer_count: 0,
            point_count: 0,
            progress: 0.0,
            status: "Ready".to_string(),
            busy: false,
            has_document: false,
        }
    }

    /// Replace the filter options. Everything starts selected.
    pub fn update_options(&mut self, index: &IndexView) {
        self.days = all_selected(&index.days);
        self.market_types = all_selected(&index.types);
    }

    /// Current selection from the checkboxes.
    pub fn selection(&self) -> Selection {
        Selection::new(picked(&self.days), picked(&self.market_types))
    }

    pub fn set_counts(&mut self, layers: usize, points: usize) {
        self.layer_count = layers;
        self.point_count = points;
    }

    /// Exports need a rendered document and no export already running.
    pub fn can_export(&self) -> bool {
        self.has_document && !self.busy
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🗺 Istanbul Pazar Map")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Street markets by day and type")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let name = self
                    .data_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| self.data_path.display().to_string());
                ui.label(RichText::new(name).size(12.0))
                    .on_hover_text(self.data_path.display().to_string());
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Sections =====
        if Self::filter_section(ui, "📅 Days", "days", &mut self.days) {
            action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(10.0);

        if Self::filter_section(ui, "🏷 Market Types", "types", &mut self.market_types) {
            action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(10.0);
        ui.label(
            RichText::new(format!(
                "{} layers, {} markets shown",
                self.layer_count, self.point_count
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.label(RichText::new("💾 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.add_enabled_ui(self.can_export(), |ui| {
            ui.horizontal(|ui| {
                for format in [ExportFormat::Html, ExportFormat::Png, ExportFormat::Json] {
                    let text = format.extension().to_uppercase();
                    if ui
                        .button(RichText::new(text).size(13.0))
                        .on_hover_text(format.label())
                        .clicked()
                    {
                        action = ControlPanelAction::Export(format);
                    }
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.busy),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") || self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Checkbox list with select/clear buttons. Returns true when anything changed.
    fn filter_section(
        ui: &mut egui::Ui,
        title: &str,
        id: &str,
        options: &mut [FilterOption],
    ) -> bool {
        let mut changed = false;

        ui.label(RichText::new(title).size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(150.0)
                    .show(ui, |ui| {
                        for option in options.iter_mut() {
                            if ui.checkbox(&mut option.selected, option.value.as_str()).changed() {
                                changed = true;
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                options.iter_mut().for_each(|o| o.selected = true);
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                options.iter_mut().for_each(|o| o.selected = false);
                changed = true;
            }
        });

        changed
    }
}

fn all_selected(values: &[String]) -> Vec<FilterOption> {
    values
        .iter()
        .map(|v| FilterOption {
            value: v.clone(),
            selected: true,
        })
        .collect()
}

fn picked(options: &[FilterOption]) -> Vec<String> {
    options
        .iter()
        .filter(|o| o.selected)
        .map(|o| o.value.clone())
        .collect()
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    Export(ExportFormat),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> IndexView {
        IndexView {
            days: vec!["Salı".into(), "Perşembe".into()],
            types: vec!["Semt".into(), "Organik".into()],
        }
    }

    fn panel() -> ControlPanel {
        ControlPanel::new(PathBuf::from("istanbul_market_data/pazar_verisi.csv"))
    }

    #[test]
    fn options_start_fully_selected() {
        let mut panel = panel();
        panel.update_options(&index());
        assert_eq!(panel.selection(), Selection::new(["Salı", "Perşembe"], ["Semt", "Organik"]));
    }

    #[test]
    fn selection_follows_checkboxes() {
        let mut panel = panel();
        panel.update_options(&index());
        panel.days[1].selected = false;
        panel.market_types[0].selected = false;
        assert_eq!(panel.selection(), Selection::new(["Salı"], ["Organik"]));
    }

    #[test]
    fn export_follows_document_not_options() {
        let mut panel = panel();
        panel.update_options(&index());
        assert!(!panel.can_export());

        panel.has_document = true;
        assert!(panel.can_export());

        // An empty selection still renders an (empty) document
        panel.days.iter_mut().for_each(|o| o.selected = false);
        assert!(panel.can_export());

        panel.busy = true;
        assert!(!panel.can_export());
    }

    #[test]
    fn data_source_stays_fixed() {
        let mut panel = panel();
        panel.update_options(&index());
        panel.update_options(&IndexView {
            days: vec!["Cuma".into()],
            types: vec!["Semt".into()],
        });
        assert_eq!(
            panel.data_path,
            PathBuf::from("istanbul_market_data/pazar_verisi.csv")
        );
    }
}
