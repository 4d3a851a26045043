//! Map Document Module
//! Render output: marker layers plus layout, serializable as a Plotly figure.

use crate::data::{GeoPoint, MarkerSymbol};
use serde_json::{json, Value};

/// Plotly's default colorway. Layers take colors in order, so the desktop
/// view and the PNG export match the HTML figure.
pub const LAYER_COLORS: [[u8; 3]; 10] = [
    [99, 110, 250],
    [239, 85, 59],
    [0, 204, 150],
    [171, 99, 250],
    [255, 161, 90],
    [25, 211, 243],
    [255, 102, 146],
    [182, 232, 128],
    [255, 151, 255],
    [254, 203, 82],
];

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const DIV_ID: &str = "pazar-map";

/// Points of one (market type, day) group.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayer {
    /// Legend label, `"{type} ({day})"`.
    pub name: String,
    #[allow(dead_code)]
    pub market_type: String,
    #[allow(dead_code)]
    pub day: String,
    pub symbol: MarkerSymbol,
    pub size: f64,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    /// Hover text per point (market name).
    pub text: Vec<String>,
}

impl MarkerLayer {
    pub fn len(&self) -> usize {
        self.lat.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.lat
            .iter()
            .zip(&self.lon)
            .map(|(&lat, &lon)| GeoPoint { lat, lon })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout {
    pub center: GeoPoint,
    pub zoom: f64,
    pub style: String,
    pub show_legend: bool,
    pub legend_title: String,
}

impl MapLayout {
    /// Half-extent in degrees (lon, lat) of the view opened at `zoom`,
    /// taken as four 256px web-mercator tiles across.
    pub fn half_span(&self) -> (f64, f64) {
        let lon = 360.0 / 2f64.powf(self.zoom) * 2.0;
        let lat = lon * self.center.lat.to_radians().cos();
        (lon, lat)
    }

    /// Degrees of longitude per degree of latitude covering the same
    /// on-screen distance at the map center.
    pub fn lon_per_lat(&self) -> f64 {
        1.0 / self.center.lat.to_radians().cos()
    }
}

/// A rendered map view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    pub layers: Vec<MarkerLayer>,
    pub layout: MapLayout,
}

impl MapDocument {
    pub fn point_count(&self) -> usize {
        self.layers.iter().map(MarkerLayer::len).sum()
    }

    pub fn layer_color(index: usize) -> [u8; 3] {
        LAYER_COLORS[index % LAYER_COLORS.len()]
    }

    /// Plotly figure (`data` + `layout`) with one scattermapbox trace per layer.
    pub fn to_figure_json(&self) -> Value {
        let data: Vec<Value> = self
            .layers
            .iter()
            .map(|layer| {
                json!({
                    "type": "scattermapbox",
                    "lat": layer.lat,
                    "lon": layer.lon,
                    "mode": "markers",
                    "marker": { "size": layer.size, "symbol": layer.symbol.as_str() },
                    "name": layer.name,
                    "text": layer.text,
                    "hoverinfo": "text",
                })
            })
            .collect();

        json!({
            "data": data,
            "layout": {
                "mapbox": {
                    "style": self.layout.style,
                    "zoom": self.layout.zoom,
                    "center": { "lat": self.layout.center.lat, "lon": self.layout.center.lon },
                },
                "showlegend": self.layout.show_legend,
                "legend": { "title": { "text": self.layout.legend_title } },
                "margin": { "r": 0, "t": 0, "l": 0, "b": 0 },
            },
        })
    }

    /// Embeddable markup: a target `<div>` plus the script that draws into it.
    pub fn to_html(&self) -> String {
        // Any "<" could open "</script" or "<!--" inside the inline script
        let figure = self.to_figure_json().to_string().replace('<', "\\u003c");
        format!(
            concat!(
                "<div id=\"{id}\" style=\"height:100%;width:100%;\"></div>\n",
                "<script src=\"{cdn}\" charset=\"utf-8\"></script>\n",
                "<script type=\"text/javascript\">\n",
                "  (function () {{\n",
                "    var figure = {figure};\n",
                "    Plotly.newPlot(\"{id}\", figure.data, figure.layout, {{responsive: true}});\n",
                "  }})();\n",
                "</script>"
            ),
            id = DIV_ID,
            cdn = PLOTLY_CDN,
            figure = figure,
        )
    }

    /// Standalone page wrapping [`MapDocument::to_html`].
    pub fn to_html_page(&self, title: &str) -> String {
        format!(
            concat!(
                "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
                "<title>{title}</title>\n",
                "<style>html, body {{ margin: 0; height: 100%; }}</style>\n",
                "</head>\n<body>\n{body}\n</body>\n</html>\n"
            ),
            title = escape_html(title),
            body = self.to_html(),
        )
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> MapDocument {
        MapDocument {
            layers: vec![MarkerLayer {
                name: "Semt (Salı)".into(),
                market_type: "Semt".into(),
                day: "Salı".into(),
                symbol: MarkerSymbol::Square,
                size: 9.0,
                lat: vec![40.99, 40.98],
                lon: vec![29.03, 29.02],
                text: vec!["Kadıköy".into(), "Moda </script><!--<script>".into()],
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
    fn figure_has_one_trace_per_layer() {
        let figure = document().to_figure_json();
        let trace = &figure["data"][0];
        assert_eq!(figure["data"].as_array().unwrap().len(), 1);
        assert_eq!(trace["type"], "scattermapbox");
        assert_eq!(trace["name"], "Semt (Salı)");
        assert_eq!(trace["marker"]["symbol"], "square");
        assert_eq!(trace["marker"]["size"], 9.0);
        assert_eq!(trace["hoverinfo"], "text");
        // Each "{type} ({day})" entry toggles on its own
        assert!(trace.get("legendgroup").is_none());
        assert!(trace.get("meta").is_none());
        assert_eq!(trace["text"][0], "Kadıköy");
        assert_eq!(trace["lat"][1], 40.98);
    }

    #[test]
    fn figure_layout_matches_settings() {
        let layout = &document().to_figure_json()["layout"];
        assert_eq!(layout["mapbox"]["zoom"], 10.0);
        assert_eq!(layout["mapbox"]["style"], "carto-positron");
        assert_eq!(layout["mapbox"]["center"]["lat"], 41.0);
        assert_eq!(layout["showlegend"], true);
        assert_eq!(layout["legend"]["title"]["text"], "Market Type and Day");
        assert_eq!(layout["margin"]["t"], 0);
    }

    #[test]
    fn html_fragment_escapes_script_end() {
        let html = document().to_html();
        assert!(html.starts_with("<div id=\"pazar-map\""));
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("Moda \\u003c/script>\\u003c!--\\u003cscript>"));
        assert!(!html.contains("<!--"));
        assert_eq!(html.matches("</script>").count(), 2);
        assert_eq!(html.matches("<script").count(), 2);
    }

    #[test]
    fn escaped_fragment_still_carries_the_figure() {
        let doc = document();
        let html = doc.to_html();
        let start = html.find("var figure = ").unwrap() + "var figure = ".len();
        let end = html[start..].find(";\n").unwrap() + start;
        let figure: Value = serde_json::from_str(&html[start..end]).unwrap();
        assert_eq!(figure, doc.to_figure_json());
    }

    #[test]
    fn longitude_degrees_are_narrower_away_from_equator() {
        let mut layout = document().layout;
        assert!((layout.lon_per_lat() - 1.0 / 41f64.to_radians().cos()).abs() < 1e-12);
        layout.center.lat = 0.0;
        assert!((layout.lon_per_lat() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn page_wraps_fragment() {
        let page = document().to_html_page("Pazar <Map>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Pazar &lt;Map&gt;</title>"));
        assert!(page.contains("id=\"pazar-map\""));
    }

    #[test]
    fn half_span_shrinks_with_zoom() {
        let mut layout = document().layout;
        let (lon10, lat10) = layout.half_span();
        layout.zoom = 11.0;
        let (lon11, _) = layout.half_span();
        assert!((lon10 - 2.0 * lon11).abs() < 1e-12);
        assert!(lat10 < lon10);
    }

    #[test]
    fn counts_points_across_layers() {
        assert_eq!(document().point_count(), 2);
        assert_eq!(MapDocument::layer_color(10), LAYER_COLORS[0]);
    }
}
