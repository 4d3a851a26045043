//! Market Data Loader Module
//! Reads the market table with Polars and turns it into typed records.

use super::context::{MarketContext, MarketRecord};
use crate::config::ColumnNames;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Missing column '{0}'")]
    MissingColumn(String),
    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },
    #[error("Malformed coordinate '{value}' at row {row}")]
    MalformedCoordinate { row: usize, value: String },
    #[error("No data loaded")]
    NoData,
}

/// Split `"lat,lon"` into two numbers. Anything other than exactly two
/// finite numeric parts is rejected.
pub fn parse_coordinate(raw: &str) -> Option<(f64, f64)> {
    let mut parts = raw.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lon = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() || !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    Some((lat, lon))
}

/// Loads the market table and derives the shared context.
#[derive(Debug, Clone)]
pub struct MarketLoader {
    columns: ColumnNames,
}

impl MarketLoader {
    pub fn new(columns: ColumnNames) -> Self {
        Self { columns }
    }

    /// Load a CSV file and build the context.
    pub fn load(&self, path: &Path) -> Result<MarketContext, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        // Every column is read as text; coordinates are parsed below
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        debug!(rows = df.height(), path = %path.display(), "csv read");

        let records = self.records_from_frame(&df)?;
        let context = MarketContext::from_records(records)?;

        info!(
            records = context.records().len(),
            days = context.days().len(),
            market_types = context.market_types().len(),
            symbols = context.symbols().len(),
            "market data loaded"
        );
        Ok(context)
    }

    /// Convert a DataFrame into typed records.
    pub fn records_from_frame(&self, df: &DataFrame) -> Result<Vec<MarketRecord>, LoaderError> {
        let names = Self::text_column(df, &self.columns.name)?;
        let types = Self::text_column(df, &self.columns.market_type)?;
        let days = Self::text_column(df, &self.columns.day)?;
        let coords = Self::text_column(df, &self.columns.coordinates)?;

        let names = names.str()?;
        let types = types.str()?;
        let days = days.str()?;
        let coords = coords.str()?;

        let mut records = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let name = self.required(names.get(row), &self.columns.name, row)?;
            let market_type = self.required(types.get(row), &self.columns.market_type, row)?;
            let day = self.required(days.get(row), &self.columns.day, row)?;
            let coordinates = self.required(coords.get(row), &self.columns.coordinates, row)?;

            let (lat, lon) =
                parse_coordinate(coordinates).ok_or_else(|| LoaderError::MalformedCoordinate {
                    row,
                    value: coordinates.to_string(),
                })?;

            records.push(MarketRecord {
                name: name.to_string(),
                market_type: market_type.to_string(),
                day: day.to_string(),
                coordinates: coordinates.to_string(),
                lat,
                lon,
            });
        }

        Ok(records)
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Column, LoaderError> {
        let present = df.get_column_names().iter().any(|c| c.as_str() == name);
        if !present {
            return Err(LoaderError::MissingColumn(name.to_string()));
        }
        Ok(df.column(name)?.cast(&DataType::String)?)
    }

    fn required<'a>(
        &self,
        value: Option<&'a str>,
        column: &str,
        row: usize,
    ) -> Result<&'a str, LoaderError> {
        value.ok_or_else(|| LoaderError::MissingValue {
            column: column.to_string(),
            row,
        })
    }
}
