//! GUI module - User interface components

mod app;
mod control_panel;
mod map_viewer;

pub use app::PazarMapApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use map_viewer::MapViewer;
