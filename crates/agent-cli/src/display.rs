//! Terminal rendering of dataset rows

use agent_property::PropertyRecord;
use agent_property::record::columns;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

/// Rows shown by `--list` before the remainder is summarized
pub const LIST_LIMIT: usize = 20;

const NOT_AVAILABLE: &str = "N/A";

fn cell(record: &PropertyRecord, column: &str) -> String {
    record.get(column).unwrap_or(NOT_AVAILABLE).to_string()
}

/// One row per property: stock number, address, city, state, acres, price
pub fn property_table<'a>(records: impl IntoIterator<Item = &'a PropertyRecord>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Stock #", "Address", "City", "State", "Acres", "Price"]);

    for record in records {
        table.add_row(vec![
            record.stock_number().to_string(),
            record.address().to_string(),
            record.city().to_string(),
            record.state().to_string(),
            cell(record, columns::LAND_AREA),
            cell(record, columns::PRICE),
        ]);
    }
    table
}

/// `--list` output: the first [`LIST_LIMIT`] rows, then a count of the rest
pub fn property_list(records: &[PropertyRecord]) -> String {
    let mut out = property_table(records.iter().take(LIST_LIMIT)).to_string();
    if records.len() > LIST_LIMIT {
        out.push_str(&format!("\n...and {} more properties", records.len() - LIST_LIMIT));
    }
    out.push_str(&format!("\nTotal properties: {}", records.len()));
    out
}

/// `--stock` output
pub fn property_details(record: &PropertyRecord) -> String {
    format!(
        "Property: {}\nLocation: {}, {}, {} {}\nLand Area: {} acres\nFor Sale Price: {}",
        record.stock_number(),
        record.address(),
        record.city(),
        record.state(),
        record.zip(),
        cell(record, columns::LAND_AREA),
        cell(record, columns::PRICE),
    )
}
