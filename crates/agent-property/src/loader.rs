//! CSV dataset loading and querying

use crate::error::{PropertyError, Result};
use crate::record::{PropertyRecord, columns, parse_number};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Structured filter over the dataset
///
/// Unset fields do not constrain. Records whose acreage or price cannot be
/// parsed never pass a numeric bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub min_acres: Option<f64>,
    pub max_acres: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Exact match on `State`
    pub state: Option<String>,
    /// Any of these cities, exact match
    #[serde(default)]
    pub cities: Vec<String>,
    /// Any of these counties, exact match
    #[serde(default)]
    pub counties: Vec<String>,
}

impl PropertyFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &PropertyRecord) -> bool {
        let within = |value: Option<f64>, min: Option<f64>, max: Option<f64>| {
            if min.is_none() && max.is_none() {
                return true;
            }
            value.is_some_and(|v| min.is_none_or(|m| v >= m) && max.is_none_or(|m| v <= m))
        };

        within(record.land_area_acres(), self.min_acres, self.max_acres)
            && within(record.for_sale_price(), self.min_price, self.max_price)
            && self
                .state
                .as_deref()
                .is_none_or(|state| record.get(columns::STATE) == Some(state))
            && (self.cities.is_empty()
                || record
                    .get(columns::CITY)
                    .is_some_and(|city| self.cities.iter().any(|c| c == city)))
            && (self.counties.is_empty()
                || record
                    .county()
                    .is_some_and(|county| self.counties.iter().any(|c| c == county)))
    }
}

/// In-memory parcel dataset
#[derive(Debug, Clone, Default)]
pub struct PropertyDataLoader {
    records: Vec<PropertyRecord>,
}

impl PropertyDataLoader {
    /// Load a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PropertyError::DataLoad(format!(
                "Data file not found: {}. Place the property CSV at this path or pass --data <path>",
                path.display()
            )));
        }

        let file = std::fs::File::open(path)?;
        let loader = Self::from_reader(file)?;
        info!(count = loader.len(), path = %path.display(), "loaded properties");
        Ok(loader)
    }

    /// Parse CSV from any reader
    ///
    /// Headers and cells are trimmed, `StockNumber` loses a trailing `.0`,
    /// and blank address/city/state/zip cells become `"Unknown"`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv.headers()?.iter().map(|h| h.trim().to_string()).collect();
        if !headers.iter().any(|h| h == columns::STOCK_NUMBER) {
            return Err(PropertyError::DataLoad(format!(
                "missing required column '{}'",
                columns::STOCK_NUMBER
            )));
        }
        let critical: Vec<&str> = columns::CRITICAL
            .into_iter()
            .filter(|col| headers.iter().any(|h| h == col))
            .collect();

        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for (row, result) in csv.records().enumerate() {
            let row_values = result?;
            let mut record =
                PropertyRecord::from_pairs(headers.iter().map(String::as_str).zip(row_values.iter()));

            let id = record
                .get(columns::STOCK_NUMBER)
                .map(normalize_stock_number)
                .ok_or_else(|| {
                    PropertyError::DataLoad(format!("row {} has no StockNumber", row + 1))
                })?;
            if !seen.insert(id.clone()) {
                return Err(PropertyError::DataLoad(format!(
                    "duplicate StockNumber '{id}' at row {}",
                    row + 1
                )));
            }
            record.set(columns::STOCK_NUMBER, id);

            for col in &critical {
                if record.get(col).is_none() {
                    record.set(*col, "Unknown");
                }
            }

            records.push(record);
        }

        Ok(Self { records })
    }

    pub fn from_records(records: Vec<PropertyRecord>) -> Self {
        Self { records }
    }

    pub fn property_list(&self) -> &[PropertyRecord] {
        &self.records
    }

    /// Record with the given stock number
    pub fn property_data(&self, stock_number: &str) -> Option<&PropertyRecord> {
        let wanted = normalize_stock_number(stock_number);
        self.records.iter().find(|r| r.stock_number() == wanted)
    }

    /// Like [`Self::property_data`] but a missing id is an error
    pub fn require(&self, stock_number: &str) -> Result<&PropertyRecord> {
        self.property_data(stock_number)
            .ok_or_else(|| PropertyError::PropertyNotFound(stock_number.trim().to_string()))
    }

    /// Case-insensitive substring match over address, city, state, zip and county
    pub fn search_properties(&self, text: &str) -> Vec<&PropertyRecord> {
        let needle = text.trim().to_lowercase();
        self.records
            .iter()
            .filter(|record| {
                [
                    columns::ADDRESS,
                    columns::CITY,
                    columns::STATE,
                    columns::ZIP,
                    columns::COUNTY,
                    columns::COUNTY_NAME,
                ]
                .iter()
                .filter_map(|col| record.get(col))
                .any(|value| value.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn filter_properties(&self, filter: &PropertyFilter) -> Vec<&PropertyRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Trim and drop the `.0` a float export leaves on integer ids
fn normalize_stock_number(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_suffix(".0") {
        Some(head) if !head.is_empty() && parse_number(head).is_some() => head.to_string(),
        _ => trimmed.to_string(),
    }
}
