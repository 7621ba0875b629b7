//! Demographic tables for a parcel's area
//!
//! Built from the five-mile demographic columns of the dataset and rendered
//! as text tables; a table is skipped when its columns are missing.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::record::{PropertyRecord, columns};

/// Years from the 2020 estimate to the 2029 projection
const POPULATION_SPAN_YEARS: f64 = 9.0;
const HOUSING_SPAN_YEARS: f64 = 5.0;

/// Population at three points, derived from the 2024 count and growth rates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationSeries {
    pub estimate_2020: f64,
    pub population_2024: f64,
    pub projection_2029: f64,
}

impl PopulationSeries {
    pub fn from_record(record: &PropertyRecord) -> Option<Self> {
        let population_2024 = record.number(columns::POPULATION_2024)?;
        let past = record.number(columns::POP_GROWTH_2020_2024)?;
        let future = record.number(columns::POP_GROWTH_2024_2029)?;
        if population_2024 <= 0.0 || past <= -100.0 {
            return None;
        }

        Some(Self {
            estimate_2020: population_2024 / (1.0 + past / 100.0),
            population_2024,
            projection_2029: population_2024 * (1.0 + future / 100.0),
        })
    }

    /// Compound annual growth rate over 2020-2029, in percent
    pub fn cagr(&self) -> f64 {
        compound_rate(self.estimate_2020, self.projection_2029, POPULATION_SPAN_YEARS)
    }
}

/// Median home value now and projected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HousingValueSeries {
    pub value_2024: f64,
    pub value_2029: f64,
}

impl HousingValueSeries {
    pub fn from_record(record: &PropertyRecord) -> Option<Self> {
        let value_2024 = record.number(columns::MEDIAN_HOME_VALUE_2024)?;
        let value_2029 = record.number(columns::MEDIAN_HOME_VALUE_2029)?;
        (value_2024 > 0.0).then_some(Self {
            value_2024,
            value_2029,
        })
    }

    /// Total appreciation 2024-2029, in percent
    pub fn appreciation(&self) -> f64 {
        (self.value_2029 / self.value_2024 - 1.0) * 100.0
    }

    pub fn annual_rate(&self) -> f64 {
        compound_rate(self.value_2024, self.value_2029, HOUSING_SPAN_YEARS)
    }
}

fn compound_rate(first: f64, last: f64, years: f64) -> f64 {
    ((last / first).powf(1.0 / years) - 1.0) * 100.0
}

/// The tables available for one parcel
#[derive(Debug, Default)]
pub struct DemographicCharts {
    pub population: Option<Table>,
    pub housing_value: Option<Table>,
    pub income: Option<Table>,
}

impl DemographicCharts {
    pub fn from_record(record: &PropertyRecord) -> Self {
        Self {
            population: PopulationSeries::from_record(record).map(|s| population_table(&s)),
            housing_value: HousingValueSeries::from_record(record).map(|s| housing_value_table(&s)),
            income: income_table(record),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_none() && self.housing_value.is_none() && self.income.is_none()
    }

    /// `(chart name, table)` for every available table
    pub fn tables(&self) -> Vec<(&'static str, &Table)> {
        [
            ("population_growth", self.population.as_ref()),
            ("housing_value", self.housing_value.as_ref()),
            ("income_distribution", self.income.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, table)| table.map(|t| (name, t)))
        .collect()
    }
}

fn new_table(header: [&str; 2]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn population_table(series: &PopulationSeries) -> Table {
    let mut table = new_table(["Year", "Population"]);
    table
        .add_row(vec!["2020 (est.)".to_string(), thousands(series.estimate_2020)])
        .add_row(vec!["2024".to_string(), thousands(series.population_2024)])
        .add_row(vec!["2029 (proj.)".to_string(), thousands(series.projection_2029)])
        .add_row(vec!["CAGR".to_string(), format!("{:.2}%", series.cagr())]);
    table
}

fn housing_value_table(series: &HousingValueSeries) -> Table {
    let mut table = new_table(["Year", "Median Home Value"]);
    table
        .add_row(vec!["2024".to_string(), format!("${}", thousands(series.value_2024))])
        .add_row(vec!["2029 (proj.)".to_string(), format!("${}", thousands(series.value_2029))])
        .add_row(vec!["Appreciation".to_string(), format!("{:.1}%", series.appreciation())])
        .add_row(vec!["Annual rate".to_string(), format!("{:.2}%", series.annual_rate())]);
    table
}

fn income_table(record: &PropertyRecord) -> Option<Table> {
    let income = record.number(columns::MEDIAN_INCOME_2024)?;
    let mut table = new_table(["Measure", "Value"]);
    table.add_row(vec!["Median household income (2024)".to_string(), format!("${}", thousands(income))]);

    if let Some(value) = record.number(columns::MEDIAN_HOME_VALUE_2024) {
        if income > 0.0 {
            table.add_row(vec!["Home value to income".to_string(), format!("{:.1}x", value / income)]);
        }
    }
    for (label, column) in [
        ("Home affordability", columns::HOME_AFFORDABILITY),
        ("Rent affordability", columns::RENT_AFFORDABILITY),
    ] {
        if let Some(raw) = record.get(column) {
            table.add_row(vec![label.to_string(), raw.to_string()]);
        }
    }
    Some(table)
}

/// Whole-number formatting with thousands separators
fn thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        out.insert(0, '-');
    }
    out
}

/// Write every available table to `<dir>/<chart>_<city>.txt`
pub fn save_charts(dir: &Path, record: &PropertyRecord) -> Result<Vec<PathBuf>> {
    let charts = DemographicCharts::from_record(record);
    if charts.is_empty() {
        debug!(stock_number = %record.stock_number(), "no demographic columns to chart");
        return Ok(Vec::new());
    }

    fs::create_dir_all(dir)?;
    let city = record.city().to_lowercase().replace(' ', "_");
    let mut paths = Vec::new();
    for (name, table) in charts.tables() {
        let path = dir.join(format!("{name}_{city}.txt"));
        fs::write(&path, format!("{table}\n"))?;
        paths.push(path);
    }

    info!(count = paths.len(), dir = %dir.display(), "charts saved");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PropertyRecord {
        PropertyRecord::from_pairs([
            ("StockNumber", "5001"),
            ("City", "Le Roy"),
            ("2024 Population(5m)", "11,000"),
            ("% Pop Grwth 2020-2024(5m)", "10%"),
            ("% Pop Grwth 2024-2029(5m)", "5"),
            ("2024 Median Home Value(5m)", "$200,000"),
            ("2029 Median HH Value(5m)", "$250,000"),
            ("2024 Med HH Inc(5m)", "$50,000"),
        ])
    }

    #[test]
    fn test_population_series() {
        let series = PopulationSeries::from_record(&record()).unwrap();
        assert!((series.estimate_2020 - 10_000.0).abs() < 1e-6);
        assert!((series.projection_2029 - 11_550.0).abs() < 1e-6);
        // 10,000 to 11,550 over nine years
        assert!((series.cagr() - 1.614).abs() < 1e-3);
    }

    #[test]
    fn test_housing_and_income() {
        let housing = HousingValueSeries::from_record(&record()).unwrap();
        assert!((housing.appreciation() - 25.0).abs() < 1e-9);

        let charts = DemographicCharts::from_record(&record());
        let income = charts.income.unwrap().to_string();
        assert!(income.contains("$50,000"));
        assert!(income.contains("4.0x"));
    }

    #[test]
    fn test_missing_columns_skip_tables() {
        let sparse = PropertyRecord::from_pairs([("StockNumber", "1"), ("2024 Med HH Inc(5m)", "40000")]);
        let charts = DemographicCharts::from_record(&sparse);
        assert!(charts.population.is_none());
        assert!(charts.housing_value.is_none());
        assert_eq!(charts.tables().len(), 1);
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(1_234_567.4), "1,234,567");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(-12_000.0), "-12,000");
    }

    #[test]
    fn test_save_charts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = save_charts(dir.path(), &record()).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[0].ends_with("population_growth_le_roy.txt"));
        assert!(fs::read_to_string(&paths[0]).unwrap().contains("11,550"));

        let none = save_charts(dir.path(), &PropertyRecord::default()).unwrap();
        assert!(none.is_empty());
    }
}
