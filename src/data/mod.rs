//! Data module - market table loading and derived state

mod context;
mod loader;
mod symbols;

pub use context::{first_seen, GeoPoint, MarketContext, MarketRecord};
pub use loader::MarketLoader;
pub use symbols::MarkerSymbol;

#[cfg(test)]
pub(crate) use context::fixtures;
#[cfg(test)]
pub(crate) use symbols::SYMBOL_PALETTE;
