//! Static Map Renderer
//! Draws a map document to a PNG image with plotters.
//!
//! Layout:
//! 1. Caption: legend title
//! 2. Longitude/latitude axes spanning the view opened at the document zoom,
//!    widened so both axes share the map's ground scale
//! 3. One marker series per layer, shaped by the day symbol
//! 4. Series legend in the upper right corner

use super::document::MapDocument;
use super::export::ExportError;
use crate::data::MarkerSymbol;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;

const MARGIN: u32 = 12;
const CAPTION_SIZE: u32 = 22;
const X_LABEL_AREA: u32 = 35;
const Y_LABEL_AREA: u32 = 50;

/// Marker outline as offsets from the point, in pixels. `None` for circles.
pub fn marker_outline(symbol: MarkerSymbol, r: i32) -> Option<Vec<(i32, i32)>> {
    let t = (r / 3).max(1);
    let outline = match symbol {
        MarkerSymbol::Circle => return None,
        MarkerSymbol::Square => vec![(-r, -r), (r, -r), (r, r), (-r, r)],
        MarkerSymbol::Diamond => vec![(0, -r), (r, 0), (0, r), (-r, 0)],
        MarkerSymbol::Cross => vec![
            (-t, -r),
            (t, -r),
            (t, -t),
            (r, -t),
            (r, t),
            (t, t),
            (t, r),
            (-t, r),
            (-t, t),
            (-r, t),
            (-r, -t),
            (-t, -t),
        ],
        MarkerSymbol::X => vec![
            (-r, -r + t),
            (-r + t, -r),
            (0, -t),
            (r - t, -r),
            (r, -r + t),
            (t, 0),
            (r, r - t),
            (r - t, r),
            (0, t),
            (-r + t, r),
            (-r, r - t),
            (-t, 0),
        ],
        // Screen y grows downwards
        MarkerSymbol::TriangleUp => vec![(0, -r), (r, r), (-r, r)],
        MarkerSymbol::TriangleDown => vec![(-r, -r), (r, -r), (0, r)],
        MarkerSymbol::TriangleLeft => vec![(-r, 0), (r, -r), (r, r)],
        MarkerSymbol::TriangleRight => vec![(-r, -r), (r, 0), (-r, r)],
    };
    Some(outline)
}

pub struct StaticMapRenderer;

impl StaticMapRenderer {
    /// Render to PNG bytes held in memory.
    pub fn render_png_bytes(
        doc: &MapDocument,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ExportError> {
        let mut buffer = vec![255u8; (width * height * 3) as usize];
        Self::draw(doc, &mut buffer, width, height)?;

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| ExportError::Draw("pixel buffer size mismatch".to_string()))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ExportError::Draw(e.to_string()))?;
        Ok(bytes)
    }

    /// Pixel size of the plotting area inside a `width` x `height` image.
    pub fn plot_area(width: u32, height: u32) -> (f64, f64) {
        let w = width.saturating_sub(2 * MARGIN + Y_LABEL_AREA).max(1);
        let h = height
            .saturating_sub(2 * MARGIN + X_LABEL_AREA + CAPTION_SIZE)
            .max(1);
        (w as f64, h as f64)
    }

    /// Axis ranges (lon, lat) covering the view and every plotted point,
    /// widened on one axis so a degree of longitude spans `cos(lat)` as
    /// many pixels as a degree of latitude.
    pub fn view_ranges(doc: &MapDocument, plot_w: f64, plot_h: f64) -> ((f64, f64), (f64, f64)) {
        let center = doc.layout.center;
        let (half_lon, half_lat) = doc.layout.half_span();
        let mut lon = (center.lon - half_lon, center.lon + half_lon);
        let mut lat = (center.lat - half_lat, center.lat + half_lat);

        for p in doc.layers.iter().flat_map(|l| l.points()) {
            lon = (lon.0.min(p.lon), lon.1.max(p.lon));
            lat = (lat.0.min(p.lat), lat.1.max(p.lat));
        }

        let lon_per_lat = doc.layout.lon_per_lat();
        let lon_span = lon.1 - lon.0;
        let lat_span = lat.1 - lat.0;
        let fitted_lon = lat_span * lon_per_lat * plot_w / plot_h;
        if fitted_lon > lon_span {
            lon = widen(lon, fitted_lon);
        } else {
            lat = widen(lat, lon_span * plot_h / (plot_w * lon_per_lat));
        }
        (lon, lat)
    }

    fn draw(doc: &MapDocument, buffer: &mut [u8], width: u32, height: u32) -> Result<(), ExportError> {
        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let (plot_w, plot_h) = Self::plot_area(width, height);
        let (lon_range, lat_range) = Self::view_ranges(doc, plot_w, plot_h);

        let mut chart = ChartBuilder::on(&root)
            .caption(&doc.layout.legend_title, ("sans-serif", CAPTION_SIZE))
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(lon_range.0..lon_range.1, lat_range.0..lat_range.1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .light_line_style(RGBColor(235, 235, 235))
            .draw()
            .map_err(draw_err)?;

        let radius = (doc.layers.first().map(|l| l.size).unwrap_or(9.0) / 2.0).round() as i32 + 1;

        for (i, layer) in doc.layers.iter().enumerate() {
            let [r, g, b] = MapDocument::layer_color(i);
            let color = RGBColor(r, g, b);
            let points: Vec<(f64, f64)> = layer.points().map(|p| (p.lon, p.lat)).collect();

            match marker_outline(layer.symbol, radius) {
                None => {
                    chart
                        .draw_series(
                            points
                                .iter()
                                .map(|&c| Circle::new(c, radius, color.filled())),
                        )
                        .map_err(draw_err)?
                        .label(layer.name.as_str())
                        .legend(move |(x, y)| Circle::new((x, y), radius, color.filled()));
                }
                Some(outline) => {
                    let legend_outline = outline.clone();
                    chart
                        .draw_series(points.iter().map(|&c| {
                            EmptyElement::at(c) + Polygon::new(outline.clone(), color.filled())
                        }))
                        .map_err(draw_err)?
                        .label(layer.name.as_str())
                        .legend(move |(x, y)| {
                            let shifted: Vec<(i32, i32)> = legend_outline
                                .iter()
                                .map(|&(dx, dy)| (x + dx, y + dy))
                                .collect();
                            Polygon::new(shifted, color.filled())
                        });
                }
            }
        }

        if doc.layout.show_legend && !doc.layers.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

/// Range with the same midpoint and the given span.
fn widen(range: (f64, f64), span: f64) -> (f64, f64) {
    let mid = (range.0 + range.1) / 2.0;
    (mid - span / 2.0, mid + span / 2.0)
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> ExportError {
    ExportError::Draw(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::document::{MapLayout, MarkerLayer};
    use crate::data::{GeoPoint, SYMBOL_PALETTE};

    fn doc_with_point(lat: f64, lon: f64) -> MapDocument {
        MapDocument {
            layers: vec![MarkerLayer {
                name: "Semt (Salı)".into(),
                market_type: "Semt".into(),
                day: "Salı".into(),
                symbol: MarkerSymbol::Circle,
                size: 9.0,
                lat: vec![lat],
                lon: vec![lon],
                text: vec!["Kadıköy".into()],
            }],
            layout: MapLayout {
                center: GeoPoint { lat: 41.0, lon: 29.0 },
                zoom: 10.0,
                style: "carto-positron".into(),
                show_legend: true,
                legend_title: "Market Type and Day".into(),
            },
        }
    }

    #[test]
    fn every_symbol_but_circle_has_an_outline() {
        for symbol in SYMBOL_PALETTE {
            let outline = marker_outline(symbol, 6);
            match symbol {
                MarkerSymbol::Circle => assert!(outline.is_none()),
                _ => {
                    let outline = outline.unwrap();
                    assert!(outline.len() >= 3);
                    assert!(outline.iter().all(|&(x, y)| x.abs() <= 6 && y.abs() <= 6));
                }
            }
        }
    }

    #[test]
    fn triangles_point_the_right_way() {
        let up = marker_outline(MarkerSymbol::TriangleUp, 4).unwrap();
        assert_eq!(up[0], (0, -4));
        let right = marker_outline(MarkerSymbol::TriangleRight, 4).unwrap();
        assert_eq!(right[1], (4, 0));
    }

    #[test]
    fn ranges_center_on_document() {
        let doc = doc_with_point(41.0, 29.0);
        let ((lon0, lon1), (lat0, lat1)) = StaticMapRenderer::view_ranges(&doc, 800.0, 600.0);
        assert!(((lon0 + lon1) / 2.0 - 29.0).abs() < 1e-9);
        assert!(((lat0 + lat1) / 2.0 - 41.0).abs() < 1e-9);
    }

    #[test]
    fn ranges_grow_to_include_far_points() {
        let doc = doc_with_point(42.5, 27.0);
        let ((lon0, _), (_, lat1)) = StaticMapRenderer::view_ranges(&doc, 800.0, 600.0);
        assert!(lon0 <= 27.0);
        assert!(lat1 >= 42.5);
    }

    #[test]
    fn ranges_match_ground_scale_of_plot_area() {
        let (plot_w, plot_h) = StaticMapRenderer::plot_area(1400, 1000);
        assert_eq!(plot_w, 1400.0 - 24.0 - 50.0);
        assert_eq!(plot_h, 1000.0 - 24.0 - 35.0 - 22.0);

        let cos = 41f64.to_radians().cos();
        for (lat, lon) in [(41.0, 29.0), (42.5, 27.0), (41.01, 29.3)] {
            let doc = doc_with_point(lat, lon);
            let ((lon0, lon1), (lat0, lat1)) = StaticMapRenderer::view_ranges(&doc, plot_w, plot_h);
            let lon_px = plot_w / (lon1 - lon0);
            let lat_px = plot_h / (lat1 - lat0);
            assert!((lon_px / lat_px - cos).abs() < 1e-9);
        }
    }
}
