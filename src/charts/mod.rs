//! Charts module - map document building and export

mod document;
mod export;
mod plotter;
mod renderer;

pub use document::{MapDocument, MapLayout, MarkerLayer};
pub use export::{DocumentExporter, ExportFormat};
pub use plotter::{MapPlotter, Selection};
