//! Application configuration, read from an optional TOML file.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "pazar_map.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub data: DataConfig,
    pub map: MapSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data: DataConfig::default(),
            map: MapSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    pub columns: ColumnNames,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("istanbul_market_data/pazar_verisi.csv"),
            columns: ColumnNames::default(),
        }
    }
}

/// Header names of the four columns the loader reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub name: String,
    pub market_type: String,
    pub day: String,
    pub coordinates: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "Pazar Adı".to_string(),
            market_type: "Pazar Tipi".to_string(),
            day: "Gün".to_string(),
            coordinates: "Koordinat".to_string(),
        }
    }
}

/// Fixed presentation settings of the map document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub zoom: f64,
    pub marker_size: f64,
    pub style: String,
    pub legend_title: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: 10.0,
            marker_size: 9.0,
            style: "carto-positron".to_string(),
            legend_title: "Market Type and Day".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] when present, or
    /// fall back to defaults. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            log_level = "debug"

            [data]
            path = "markets.csv"

            [map]
            zoom = 11.5
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.data.path, PathBuf::from("markets.csv"));
        assert_eq!(config.data.columns, ColumnNames::default());
        assert_eq!(config.map.zoom, 11.5);
        assert_eq!(config.map.marker_size, 9.0);
        assert_eq!(config.map.style, "carto-positron");
    }

    #[test]
    fn column_names_can_be_overridden() {
        let config: AppConfig = toml::from_str(
            r#"
            [data.columns]
            name = "Name"
            coordinates = "LatLon"
            "#,
        )
        .unwrap();

        assert_eq!(config.data.columns.name, "Name");
        assert_eq!(config.data.columns.coordinates, "LatLon");
        assert_eq!(config.data.columns.day, "Gün");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("pazar_map_missing_config.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
