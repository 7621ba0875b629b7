//! One parcel from the dataset

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Column names used by the dataset
pub mod columns {
    pub const STOCK_NUMBER: &str = "StockNumber";
    pub const ADDRESS: &str = "Property Address";
    pub const CITY: &str = "City";
    pub const COUNTY_NAME: &str = "County Name";
    pub const COUNTY: &str = "County";
    pub const STATE: &str = "State";
    pub const ZIP: &str = "Zip";
    pub const LAND_AREA: &str = "Land Area (AC)";
    pub const PRICE: &str = "For Sale Price";
    pub const ZONING: &str = "Zoning";
    pub const PROPOSED_USE: &str = "Proposed Land Use";
    pub const COMPOSITE_SCORE: &str = "Composite_Score";

    pub const HOME_AFFORDABILITY: &str = "Home_Affordability";
    pub const RENT_AFFORDABILITY: &str = "Rent_Affordability";
    pub const MEDIAN_HOME_VALUE_2024: &str = "2024 Median Home Value(5m)";
    pub const MEDIAN_HOME_VALUE_2029: &str = "2029 Median HH Value(5m)";
    pub const MEDIAN_INCOME_2024: &str = "2024 Med HH Inc(5m)";
    pub const POP_GROWTH_2020_2024: &str = "% Pop Grwth 2020-2024(5m)";
    pub const POP_GROWTH_2024_2029: &str = "% Pop Grwth 2024-2029(5m)";
    pub const POPULATION_2024: &str = "2024 Population(5m)";
    pub const CONVENIENCE_INDEX: &str = "Convenience_Index";
    pub const POPULATION_ACCESS: &str = "Population_Access";

    /// Columns that get `"Unknown"` when blank
    pub const CRITICAL: [&str; 4] = [ADDRESS, CITY, STATE, ZIP];

    /// Demographic columns handed to prompts when present
    pub const DEMOGRAPHIC: [&str; 10] = [
        HOME_AFFORDABILITY,
        RENT_AFFORDABILITY,
        MEDIAN_HOME_VALUE_2024,
        MEDIAN_HOME_VALUE_2029,
        MEDIAN_INCOME_2024,
        POP_GROWTH_2020_2024,
        POP_GROWTH_2024_2029,
        POPULATION_2024,
        CONVENIENCE_INDEX,
        POPULATION_ACCESS,
    ];
}

/// Lots per acre assumed for attainable housing
pub const LOTS_PER_ACRE: f64 = 3.5;

/// Site development cost per lot in dollars
pub const DEVELOPMENT_COST_PER_LOT: f64 = 55_000.0;

const UNKNOWN: &str = "Unknown";

/// A dataset row keyed by column name
///
/// Only non-blank cells are stored. Typed accessors cover the columns the
/// agents rely on; everything else is reachable through [`PropertyRecord::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyRecord {
    fields: BTreeMap<String, String>,
}

impl PropertyRecord {
    /// Build from `(column, value)` pairs, trimming both and dropping blanks
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let fields = pairs
            .into_iter()
            .filter_map(|(k, v)| {
                let value = v.as_ref().trim();
                (!value.is_empty()).then(|| (k.as_ref().trim().to_string(), value.to_string()))
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn stock_number(&self) -> &str {
        self.get(columns::STOCK_NUMBER).unwrap_or(UNKNOWN)
    }

    pub fn address(&self) -> &str {
        self.get(columns::ADDRESS).unwrap_or(UNKNOWN)
    }

    pub fn city(&self) -> &str {
        self.get(columns::CITY).unwrap_or(UNKNOWN)
    }

    pub fn state(&self) -> &str {
        self.get(columns::STATE).unwrap_or(UNKNOWN)
    }

    pub fn zip(&self) -> &str {
        self.get(columns::ZIP).unwrap_or(UNKNOWN)
    }

    /// `County Name`, falling back to `County`
    pub fn county(&self) -> Option<&str> {
        self.get(columns::COUNTY_NAME)
            .or_else(|| self.get(columns::COUNTY))
    }

    pub fn zoning(&self) -> Option<&str> {
        self.get(columns::ZONING)
    }

    pub fn land_area_acres(&self) -> Option<f64> {
        self.number(columns::LAND_AREA)
    }

    pub fn for_sale_price(&self) -> Option<f64> {
        self.number(columns::PRICE)
    }

    /// Numeric value of a column, ignoring `$`, `,` and `%`
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(parse_number)
    }

    /// `"{address}, {city}, {state}"`
    pub fn display_location(&self) -> String {
        format!("{}, {}, {}", self.address(), self.city(), self.state())
    }

    pub fn lot_economics(&self) -> LotEconomics {
        LotEconomics::new(
            self.land_area_acres().unwrap_or(0.0),
            self.for_sale_price().unwrap_or(0.0),
        )
    }

    /// Variables for prompt templates
    ///
    /// Named fields use snake_case keys; demographic columns present on the
    /// row are listed under `demographics`, and every raw column under
    /// `fields`.
    pub fn template_vars(&self) -> Value {
        let demographics: Map<String, Value> = columns::DEMOGRAPHIC
            .iter()
            .filter_map(|col| self.get(col).map(|v| ((*col).to_string(), json!(v))))
            .collect();

        json!({
            "stock_number": self.stock_number(),
            "address": self.address(),
            "city": self.city(),
            "county": self.county(),
            "state": self.state(),
            "zip": self.zip(),
            "acres": self.land_area_acres(),
            "price": self.for_sale_price(),
            "zoning": self.zoning(),
            "proposed_use": self.get(columns::PROPOSED_USE),
            "composite_score": self.get(columns::COMPOSITE_SCORE),
            "demographics": demographics,
            "economics": self.lot_economics(),
            "fields": self.fields,
        })
    }
}

/// Strip `$`, `,` and `%` and parse as a float
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%'))
        .collect();
    cleaned.trim().parse().ok().filter(|v: &f64| v.is_finite())
}

/// Attainable-housing lot math for a parcel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LotEconomics {
    pub acres: f64,
    pub land_price: f64,
    pub potential_lots: f64,
    pub development_cost: f64,
    pub total_investment: f64,
}

impl LotEconomics {
    pub fn new(acres: f64, land_price: f64) -> Self {
        let potential_lots = acres * LOTS_PER_ACRE;
        let development_cost = potential_lots * DEVELOPMENT_COST_PER_LOT;
        Self {
            acres,
            land_price,
            potential_lots,
            development_cost,
            total_investment: land_price + development_cost,
        }
    }

    /// Land plus development cost per lot, `None` without lots
    pub fn cost_per_lot(&self) -> Option<f64> {
        (self.potential_lots > 0.0).then(|| self.total_investment / self.potential_lots)
    }
}
