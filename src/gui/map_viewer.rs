//! Map Viewer Widget
//! Central panel plotting the rendered marker layers with egui_plot.

use crate::charts::{MapDocument, MapLayout, MarkerLayer};
use crate::data::MarkerSymbol;
use egui::{Color32, RichText};
use egui_plot::{Corner, Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points};
use std::sync::Arc;

/// egui_plot shape for a day symbol.
pub fn marker_shape(symbol: MarkerSymbol) -> MarkerShape {
    match symbol {
        MarkerSymbol::Circle => MarkerShape::Circle,
        MarkerSymbol::Square => MarkerShape::Square,
        MarkerSymbol::Diamond => MarkerShape::Diamond,
        MarkerSymbol::Cross => MarkerShape::Plus,
        MarkerSymbol::X => MarkerShape::Cross,
        MarkerSymbol::TriangleUp => MarkerShape::Up,
        MarkerSymbol::TriangleDown => MarkerShape::Down,
        MarkerSymbol::TriangleLeft => MarkerShape::Left,
        MarkerSymbol::TriangleRight => MarkerShape::Right,
    }
}

/// Market name of the point in layer `name` closest to (`lon`, `lat`).
pub fn hover_text<'a>(doc: &'a MapDocument, name: &str, lon: f64, lat: f64) -> Option<&'a str> {
    let layer = doc.layers.iter().find(|l| l.name == name)?;
    layer
        .points()
        .zip(&layer.text)
        .min_by(|(a, _), (b, _)| {
            let da = (a.lon - lon).powi(2) + (a.lat - lat).powi(2);
            let db = (b.lon - lon).powi(2) + (b.lat - lat).powi(2);
            da.total_cmp(&db)
        })
        .map(|(_, text)| text.as_str())
}

/// Plot aspect (x units per y unit of screen length) so a degree of
/// longitude is drawn `cos(lat)` as wide as a degree of latitude.
pub fn plot_aspect(layout: &MapLayout) -> f32 {
    layout.lon_per_lat() as f32
}

/// Interactive map of the current document.
#[derive(Default)]
pub struct MapViewer {
    document: Option<Arc<MapDocument>>,
}

impl MapViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&MapDocument> {
        self.document.as_deref()
    }

    /// Show a new render; the user's pan and zoom are kept.
    pub fn set_document(&mut self, document: MapDocument) {
        self.document = Some(Arc::new(document));
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(doc) = self.document.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(&doc.layout.legend_title)
                    .size(16.0)
                    .strong(),
            );
            if doc.layers.is_empty() {
                ui.label(
                    RichText::new("No markets match the selection")
                        .size(12.0)
                        .color(Color32::GRAY),
                );
            }
        });
        ui.add_space(4.0);

        let center = doc.layout.center;
        let (half_lon, half_lat) = doc.layout.half_span();
        let hover_doc = Arc::clone(&doc);

        Plot::new("market_map")
            .legend(Legend::default().position(Corner::RightTop))
            .data_aspect(plot_aspect(&doc.layout))
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .include_x(center.lon - half_lon)
            .include_x(center.lon + half_lon)
            .include_y(center.lat - half_lat)
            .include_y(center.lat + half_lat)
            .label_formatter(move |name: &str, value: &PlotPoint| {
                match hover_text(&hover_doc, name, value.x, value.y) {
                    Some(text) => text.to_string(),
                    None => format!("{:.4}, {:.4}", value.y, value.x),
                }
            })
            .show(ui, |plot_ui| {
                for (i, layer) in doc.layers.iter().enumerate() {
                    plot_ui.points(Self::layer_points(i, layer));
                }
            });
    }

    fn layer_points(index: usize, layer: &MarkerLayer) -> Points {
        let [r, g, b] = MapDocument::layer_color(index);
        let points: PlotPoints = layer.points().map(|p| [p.lon, p.lat]).collect();

        Points::new(points)
            .name(&layer.name)
            .shape(marker_shape(layer.symbol))
            .radius((layer.size / 2.0) as f32 + 1.0)
            .color(Color32::from_rgb(r, g, b))
            .filled(true)
    }
}
