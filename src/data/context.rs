//! Market Context Module
//! Immutable state derived once from the loaded table and shared by every render.

use super::loader::LoaderError;
use super::symbols::SymbolMap;
use std::collections::HashSet;

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One market on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRecord {
    pub name: String,
    pub market_type: String,
    pub day: String,
    /// Raw `"lat,lon"` value as read.
    #[allow(dead_code)]
    pub coordinates: String,
    pub lat: f64,
    pub lon: f64,
}

/// Loaded table plus everything derived from it.
#[derive(Debug, Clone)]
pub struct MarketContext {
    records: Vec<MarketRecord>,
    days: Vec<String>,
    market_types: Vec<String>,
    symbols: SymbolMap,
    centroid: GeoPoint,
}

impl MarketContext {
    /// Derive day/type lists, symbols and centroid from parsed records.
    pub fn from_records(records: Vec<MarketRecord>) -> Result<Self, LoaderError> {
        if records.is_empty() {
            return Err(LoaderError::NoData);
        }

        let days = first_seen(records.iter().map(|r| r.day.as_str()));
        let market_types = first_seen(records.iter().map(|r| r.market_type.as_str()));
        let symbols = SymbolMap::from_days(&days);

        let n = records.len() as f64;
        let centroid = GeoPoint {
            lat: records.iter().map(|r| r.lat).sum::<f64>() / n,
            lon: records.iter().map(|r| r.lon).sum::<f64>() / n,
        };

        Ok(Self {
            records,
            days,
            market_types,
            symbols,
            centroid,
        })
    }

    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    /// Distinct days in first-occurrence order.
    pub fn days(&self) -> &[String] {
        &self.days
    }

    /// Distinct market types in first-occurrence order.
    pub fn market_types(&self) -> &[String] {
        &self.market_types
    }

    pub fn symbols(&self) -> &SymbolMap {
        &self.symbols
    }

    /// Mean position over the whole table.
    pub fn centroid(&self) -> GeoPoint {
        self.centroid
    }
}

/// Distinct values in the order they first appear.
pub fn first_seen<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(name: &str, day: &str, market_type: &str, coordinates: &str) -> MarketRecord {
        let (lat, lon) = coordinates
            .split_once(',')
            .map(|(a, b)| (a.trim().parse().unwrap(), b.trim().parse().unwrap()))
            .unwrap();
        MarketRecord {
            name: name.to_string(),
            market_type: market_type.to_string(),
            day: day.to_string(),
            coordinates: coordinates.to_string(),
            lat,
            lon,
        }
    }

    /// The Kadıköy/Beşiktaş table used across the render tests.
    pub fn kadikoy_besiktas() -> MarketContext {
        MarketContext::from_records(vec![
            record("Kadıköy", "Salı", "Semt", "40.99,29.03"),
            record("Kadıköy", "Salı", "Semt", "40.98,29.02"),
            record("Beşiktaş", "Perşembe", "Organik", "41.04,29.00"),
        ])
        .unwrap()
    }
}
