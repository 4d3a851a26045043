//! Map Plotter Module
//! Filters the market table by selection and builds the map document.

use super::document::{MapDocument, MapLayout, MarkerLayer};
use crate::config::MapSettings;
use crate::data::{first_seen, MarketContext, MarketRecord};
use std::collections::HashSet;
use tracing::debug;

/// Days and market types picked by the user. Matching is exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub days: HashSet<String>,
    pub market_types: HashSet<String>,
}

impl Selection {
    pub fn new<D, T>(days: D, market_types: T) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            days: days.into_iter().map(Into::into).collect(),
            market_types: market_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Everything in the table.
    pub fn all(ctx: &MarketContext) -> Self {
        Self::new(ctx.days().iter().cloned(), ctx.market_types().iter().cloned())
    }

    pub fn matches(&self, record: &MarketRecord) -> bool {
        self.days.contains(&record.day) && self.market_types.contains(&record.market_type)
    }
}

/// Builds map documents from a loaded context.
#[derive(Debug, Clone, Default)]
pub struct MapPlotter {
    settings: MapSettings,
}

impl MapPlotter {
    pub fn new(settings: MapSettings) -> Self {
        Self { settings }
    }

    /// Render one selection. Layers are ordered by market type, then day,
    /// each in first-seen order within the filtered rows.
    pub fn render(&self, ctx: &MarketContext, selection: &Selection) -> MapDocument {
        let filtered: Vec<&MarketRecord> = ctx
            .records()
            .iter()
            .filter(|r| selection.matches(r))
            .collect();

        let market_types = first_seen(filtered.iter().map(|r| r.market_type.as_str()));
        let days = first_seen(filtered.iter().map(|r| r.day.as_str()));

        let mut layers = Vec::new();
        for market_type in &market_types {
            for day in &days {
                let group: Vec<&MarketRecord> = filtered
                    .iter()
                    .copied()
                    .filter(|r| &r.market_type == market_type && &r.day == day)
                    .collect();
                if group.is_empty() {
                    continue;
                }
                layers.push(self.build_layer(ctx, market_type, day, &group));
            }
        }

        debug!(
            rows = filtered.len(),
            layers = layers.len(),
            "map rendered"
        );

        MapDocument {
            layers,
            layout: MapLayout {
                center: ctx.centroid(),
                zoom: self.settings.zoom,
                style: self.settings.style.clone(),
                show_legend: true,
                legend_title: self.settings.legend_title.clone(),
            },
        }
    }

    fn build_layer(
        &self,
        ctx: &MarketContext,
        market_type: &str,
        day: &str,
        group: &[&MarketRecord],
    ) -> MarkerLayer {
        MarkerLayer {
            name: format!("{} ({})", market_type, day),
            market_type: market_type.to_string(),
            day: day.to_string(),
            symbol: ctx.symbols().symbol_for(day),
            size: self.settings.marker_size,
            lat: group.iter().map(|r| r.lat).collect(),
            lon: group.iter().map(|r| r.lon).collect(),
            text: group.iter().map(|r| r.name.clone()).collect(),
        }
    }
}
