//! Location context and query phrasing at different specificities

use crate::record::{PropertyRecord, columns};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a parcel sits, as far as search queries are concerned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationContext {
    pub city: String,
    pub county: String,
    pub state: String,
    pub zip_codes: Vec<String>,
    pub full_location: String,
}

impl LocationContext {
    /// Context from the `City`, `County Name`, `State` and `Zip` columns
    pub fn from_record(record: &PropertyRecord) -> Self {
        let field = |col| record.get(col).unwrap_or_default().to_string();
        Self::from_parts(
            field(columns::CITY),
            field(columns::COUNTY_NAME),
            field(columns::STATE),
            record.get(columns::ZIP).map(str::to_string),
        )
    }

    pub fn from_parts(
        city: impl Into<String>,
        county: impl Into<String>,
        state: impl Into<String>,
        zip: Option<String>,
    ) -> Self {
        let city = city.into();
        let county = county.into();
        let state = state.into();
        let full_location = format!("{city}, {county}, {state}")
            .replace(", ,", ",")
            .trim_matches(|c| c == ',' || c == ' ')
            .to_string();

        Self {
            city,
            county,
            state,
            zip_codes: zip.into_iter().filter(|z| !z.is_empty()).collect(),
            full_location,
        }
    }

    /// Context that only knows a free-text place, such as a bare address
    ///
    /// Every specificity falls back to `full_location`.
    pub fn from_free_text(text: &str) -> Self {
        Self {
            full_location: text.trim().to_string(),
            ..Self::default()
        }
    }
}

/// How narrowly a query names the location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specificity {
    High,
    Medium,
    Low,
}

impl Specificity {
    /// Tiers in the order the search strategy tries them
    pub const SEARCH_ORDER: [Specificity; 3] = [Self::Medium, Self::High, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location phrase for a query at the given specificity
///
/// Falls back to `full_location` when the tier's parts are missing; the
/// result may be empty.
pub fn build_location_query(location: &LocationContext, specificity: Specificity) -> String {
    let LocationContext {
        city, county, state, ..
    } = location;

    match specificity {
        Specificity::High if !city.is_empty() && !county.is_empty() && !state.is_empty() => {
            format!("{city} {county} County {state}")
        }
        Specificity::Medium if !city.is_empty() && !state.is_empty() => format!("{city} {state}"),
        Specificity::Low if (!city.is_empty() || !county.is_empty()) && !state.is_empty() => {
            let place = if city.is_empty() { county } else { city };
            format!("{place} area {state}")
        }
        _ => location.full_location.clone(),
    }
}
