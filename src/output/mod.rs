mod cli;
mod json;
mod sarif;

pub use cli::{format_cli_table, print_cli_table};
pub use json::print_json;
pub use sarif::{generate_sarif_string, print_sarif};

use crate::model::LintReport;
use anyhow::Result;

/// Output format for lint reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for programmatic use
    Json,
    /// SARIF format for GitHub Actions code scanning
    Sarif,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            _ => Err(format!(
                "Unknown format: {}. Use 'table', 'json', or 'sarif'",
                s
            )),
        }
    }
}

pub fn print_result(report: &LintReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_cli_table(report),
        OutputFormat::Json => print_json(report),
        OutputFormat::Sarif => print_sarif(report),
    }
}

/// Format a report to string for file output
pub fn format_result_to_string(report: &LintReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_cli_table(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Sarif => generate_sarif_string(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ValidationResult, Violation};
    use std::str::FromStr;

    fn report() -> LintReport {
        LintReport::new(
            "package-lock.json",
            "myorg",
            "github.com",
            2,
            ValidationResult::from_errors(vec![Violation::new(
                "Non-internal packages must use the 'https' protocol, but package: a@1.0.0 used http:\n",
                "a@1.0.0",
            )]),
        )
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::from_str("JSON"), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("sarif"), Ok(OutputFormat::Sarif));
        assert!(OutputFormat::from_str("html").is_err());
    }

    #[test]
    fn test_json_output_shape() {
        let json = format_result_to_string(&report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["lockfile"], "package-lock.json");
        assert_eq!(value["packages_checked"], 2);
        assert_eq!(value["result"]["type"], "error");
        assert_eq!(value["result"]["errors"][0]["package"], "a@1.0.0");
    }
}
