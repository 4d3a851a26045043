//! Document export to HTML, figure JSON and PNG files.

use super::document::MapDocument;
use super::renderer::StaticMapRenderer;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const PAGE_TITLE: &str = "Istanbul Street Markets";
pub const PNG_SIZE: (u32, u32) = (1400, 1000);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Draw(String),
}

/// Output formats a document can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Html,
    Json,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
            ExportFormat::Png => "png",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Html => "HTML page",
            ExportFormat::Json => "Plotly figure",
            ExportFormat::Png => "PNG image",
        }
    }
}

pub struct DocumentExporter;

impl DocumentExporter {
    /// Encode the document in `format`.
    pub fn encode(doc: &MapDocument, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Html => Ok(doc.to_html_page(PAGE_TITLE).into_bytes()),
            ExportFormat::Json => Ok(serde_json::to_vec_pretty(&doc.to_figure_json())?),
            ExportFormat::Png => {
                let (width, height) = PNG_SIZE;
                StaticMapRenderer::render_png_bytes(doc, width, height)
            }
        }
    }

    /// Encode and write to `path`.
    pub fn write(doc: &MapDocument, format: ExportFormat, path: &Path) -> Result<(), ExportError> {
        let bytes = Self::encode(doc, format)?;
        fs::write(path, &bytes)?;
        info!(
            path = %path.display(),
            format = format.extension(),
            layers = doc.layers.len(),
            bytes = bytes.len(),
            "map exported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{MapPlotter, Selection};
    use crate::config::MapSettings;
    use crate::data::fixtures::kadikoy_besiktas;

    #[test]
    fn writes_html_page() {
        let ctx = kadikoy_besiktas();
        let doc = MapPlotter::new(MapSettings::default()).render(&ctx, &Selection::all(&ctx));
        let path = std::env::temp_dir().join("pazar_map_export_test.html");

        DocumentExporter::write(&doc, ExportFormat::Html, &path).unwrap();
        let page = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(page.contains(PAGE_TITLE));
        assert!(page.contains("Semt (Salı)"));
        assert!(page.contains("Organik (Perşembe)"));
    }

    #[test]
    fn json_is_the_figure() {
        let ctx = kadikoy_besiktas();
        let doc = MapPlotter::new(MapSettings::default()).render(&ctx, &Selection::all(&ctx));
        let bytes = DocumentExporter::encode(&doc, ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, doc.to_figure_json());
    }
}
