//! Request boundary: JSON payloads for the index view and render requests.

use crate::charts::{MapPlotter, Selection};
use crate::data::MarketContext;
use serde::{Deserialize, Serialize};

/// Full unfiltered option lists for the selection controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexView {
    pub days: Vec<String>,
    pub types: Vec<String>,
}

impl IndexView {
    pub fn from_context(ctx: &MarketContext) -> Self {
        Self {
            days: ctx.days().to_vec(),
            types: ctx.market_types().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SelectionRequest {
    pub days: Vec<String>,
    pub types: Vec<String>,
}

impl SelectionRequest {
    pub fn selection(&self) -> Selection {
        Selection::new(self.days.iter().cloned(), self.types.iter().cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderResponse {
    pub map_html: String,
}

/// Render the map for one request.
pub fn handle_render(
    ctx: &MarketContext,
    plotter: &MapPlotter,
    request: &SelectionRequest,
) -> RenderResponse {
    let doc = plotter.render(ctx, &request.selection());
    RenderResponse {
        map_html: doc.to_html(),
    }
}
