//! Pazar Map Main Application
//! Main window with control panel and map viewer.

use crate::api::IndexView;
use crate::charts::{DocumentExporter, ExportFormat, MapDocument, MapPlotter};
use crate::data::MarketContext;
use crate::gui::{ControlPanel, ControlPanelAction, MapViewer};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::error;

/// Export result from background thread
enum ExportResult {
    Complete(PathBuf, ExportFormat),
    Error(String),
}

/// Main application window.
pub struct PazarMapApp {
    context: Arc<MarketContext>,
    plotter: MapPlotter,
    control_panel: ControlPanel,
    map_viewer: MapViewer,

    // Async export
    export_rx: Option<Receiver<ExportResult>>,
}

impl PazarMapApp {
    /// The viewer works on the context loaded at startup for its whole lifetime.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        context: Arc<MarketContext>,
        plotter: MapPlotter,
        data_path: &Path,
    ) -> Self {
        let mut control_panel = ControlPanel::new(data_path.to_path_buf());
        control_panel.update_options(&IndexView::from_context(&context));
        control_panel.set_progress(
            100.0,
            &format!(
                "Loaded {} markets, {} days, {} types",
                context.records().len(),
                context.days().len(),
                context.market_types().len()
            ),
        );

        let mut app = Self {
            context,
            plotter,
            control_panel,
            map_viewer: MapViewer::new(),
            export_rx: None,
        };
        let doc = app.render_current();
        app.map_viewer.set_document(doc);
        app
    }

    fn is_busy(&self) -> bool {
        self.export_rx.is_some()
    }

    fn render_current(&mut self) -> MapDocument {
        let doc = self
            .plotter
            .render(&self.context, &self.control_panel.selection());
        self.control_panel
            .set_counts(doc.layers.len(), doc.point_count());
        doc
    }

    fn handle_selection_changed(&mut self) {
        let doc = self.render_current();
        self.map_viewer.set_document(doc);
    }

    /// Handle export - writes the current document in a background thread
    fn handle_export(&mut self, format: ExportFormat) {
        if self.is_busy() {
            return;
        }
        let Some(doc) = self.map_viewer.document().cloned() else {
            self.control_panel.set_progress(0.0, "Nothing to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter(format.label(), &[format.extension()])
            .set_file_name(format!("pazar_map.{}", format.extension()))
            .save_file()
        else {
            return; // User cancelled
        };

        self.control_panel
            .set_progress(10.0, &format!("Writing {}...", format.label()));

        let (tx, rx) = channel();
        self.export_rx = Some(rx);

        thread::spawn(move || {
            let result = match DocumentExporter::write(&doc, format, &path) {
                Ok(()) => ExportResult::Complete(path, format),
                Err(e) => ExportResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for export results
    fn check_export_results(&mut self) {
        let Some(rx) = self.export_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(ExportResult::Complete(path, format)) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.control_panel
                    .set_progress(100.0, &format!("Complete! Exported {}", name));

                if format == ExportFormat::Html {
                    if let Err(e) = open::that(&path) {
                        error!(error = %e, "could not open exported map");
                    }
                }
            }
            Ok(ExportResult::Error(e)) => {
                error!(error = %e, "export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
            Err(_) => self.export_rx = Some(rx),
        }
    }
}

impl eframe::App for PazarMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_export_results();

        let busy = self.is_busy();
        self.control_panel.busy = busy;
        self.control_panel.has_document = self.map_viewer.document().is_some();
        if busy {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::SelectionChanged => self.handle_selection_changed(),
                        ControlPanelAction::Export(format) => self.handle_export(format),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Map Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.map_viewer.show(ui);
        });
    }
}
