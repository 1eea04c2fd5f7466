//! SARIF (Static Analysis Results Interchange Format) output for GitHub Actions integration.
//!
//! When used with `--format sarif`, the output can be uploaded to GitHub Code Scanning
//! to annotate the lockfile with every transport policy violation.

use crate::model::LintReport;
use anyhow::Result;
use serde::Serialize;

const RULE_ID: &str = "internal-ssh-external-https";

/// SARIF v2.1.0 schema root
#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: &'static str,
    version: &'static str,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
struct SarifRule {
    id: &'static str,
    name: &'static str,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "fullDescription")]
    full_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    default_configuration: SarifRuleConfiguration,
}

#[derive(Serialize)]
struct SarifRuleConfiguration {
    level: &'static str,
}

#[derive(Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: &'static str,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

fn build_report(report: &LintReport) -> SarifReport {
    let rule = SarifRule {
        id: RULE_ID,
        name: "InternalSshExternalHttps",
        short_description: SarifMessage {
            text: "Package fetched over a disallowed protocol".to_string(),
        },
        full_description: SarifMessage {
            text: format!(
                "Packages of organization '{}' on {} must use git+ssh; all other packages must use https or file",
                report.org_name, report.internal_host
            ),
        },
        default_configuration: SarifRuleConfiguration { level: "error" },
    };

    let results = report
        .result
        .errors()
        .iter()
        .map(|violation| SarifResult {
            rule_id: RULE_ID,
            level: "error",
            message: SarifMessage {
                text: violation.message.trim_end().to_string(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifactLocation {
                        uri: report.lockfile.clone(),
                    },
                },
            }],
        })
        .collect();

    SarifReport {
        schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
        version: "2.1.0",
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "lockscan",
                    version: env!("CARGO_PKG_VERSION"),
                    rules: vec![rule],
                },
            },
            results,
        }],
    }
}

/// Generate and print SARIF output
pub fn print_sarif(report: &LintReport) -> Result<()> {
    println!("{}", generate_sarif_string(report)?);
    Ok(())
}

/// Generate SARIF as a string (for file output)
pub fn generate_sarif_string(report: &LintReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&build_report(report))?)
}
