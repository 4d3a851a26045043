//! Day Symbol Module
//! Assigns one marker shape per market day.

use serde::Serialize;
use std::collections::HashMap;

/// Marker shapes understood by the map document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerSymbol {
    Circle,
    Square,
    Diamond,
    Cross,
    X,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
}

/// Fixed palette, assigned to days in first-seen order.
pub const SYMBOL_PALETTE: [MarkerSymbol; 9] = [
    MarkerSymbol::Circle,
    MarkerSymbol::Square,
    MarkerSymbol::Diamond,
    MarkerSymbol::Cross,
    MarkerSymbol::X,
    MarkerSymbol::TriangleUp,
    MarkerSymbol::TriangleDown,
    MarkerSymbol::TriangleLeft,
    MarkerSymbol::TriangleRight,
];

impl MarkerSymbol {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerSymbol::Circle => "circle",
            MarkerSymbol::Square => "square",
            MarkerSymbol::Diamond => "diamond",
            MarkerSymbol::Cross => "cross",
            MarkerSymbol::X => "x",
            MarkerSymbol::TriangleUp => "triangle-up",
            MarkerSymbol::TriangleDown => "triangle-down",
            MarkerSymbol::TriangleLeft => "triangle-left",
            MarkerSymbol::TriangleRight => "triangle-right",
        }
    }
}

/// Day to symbol mapping. Built once per loaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolMap {
    by_day: HashMap<String, MarkerSymbol>,
}

impl SymbolMap {
    /// Build from distinct days in first-occurrence order.
    pub fn from_days(days: &[String]) -> Self {
        let by_day = days
            .iter()
            .enumerate()
            .map(|(i, day)| (day.clone(), SYMBOL_PALETTE[i % SYMBOL_PALETTE.len()]))
            .collect();
        Self { by_day }
    }

    pub fn get(&self, day: &str) -> Option<MarkerSymbol> {
        self.by_day.get(day).copied()
    }

    /// Symbol for a day of the loaded table. Unknown days fall back to the
    /// first palette entry.
    pub fn symbol_for(&self, day: &str) -> MarkerSymbol {
        self.get(day).unwrap_or(SYMBOL_PALETTE[0])
    }

    pub fn len(&self) -> usize {
        self.by_day.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn assigns_palette_in_order() {
        let map = SymbolMap::from_days(&days(&["Pazartesi", "Salı", "Çarşamba"]));
        assert_eq!(map.get("Pazartesi"), Some(MarkerSymbol::Circle));
        assert_eq!(map.get("Salı"), Some(MarkerSymbol::Square));
        assert_eq!(map.get("Çarşamba"), Some(MarkerSymbol::Diamond));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn wraps_after_nine_days() {
        let names: Vec<String> = (0..11).map(|i| format!("day{i}")).collect();
        let map = SymbolMap::from_days(&names);
        assert_eq!(map.get("day8"), Some(MarkerSymbol::TriangleRight));
        assert_eq!(map.get("day9"), Some(MarkerSymbol::Circle));
        assert_eq!(map.get("day10"), Some(MarkerSymbol::Square));
    }

    #[test]
    fn same_days_give_same_mapping() {
        let names = days(&["Cuma", "Cumartesi", "Pazar"]);
        assert_eq!(SymbolMap::from_days(&names), SymbolMap::from_days(&names));
    }

    #[test]
    fn unknown_day_falls_back() {
        let map = SymbolMap::from_days(&days(&["Salı"]));
        assert_eq!(map.get("Pazar"), None);
        assert_eq!(map.symbol_for("Pazar"), MarkerSymbol::Circle);
    }

    #[test]
    fn serializes_as_plotly_names() {
        let json = serde_json::to_string(&SYMBOL_PALETTE).unwrap();
        assert_eq!(
            json,
            r#"["circle","square","diamond","cross","x","triangle-up","triangle-down","triangle-left","triangle-right"]"#
        );
        for symbol in SYMBOL_PALETTE {
            assert_eq!(
                serde_json::to_value(symbol).unwrap(),
                serde_json::Value::from(symbol.as_str())
            );
        }
    }
}
