use crate::model::LintReport;
use anyhow::Result;
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct ViolationRow {
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Problem")]
    message: String,
}

pub fn print_cli_table(report: &LintReport) -> Result<()> {
    print!("{}", format_cli_table(report));
    Ok(())
}

/// Renders the report as the human-readable text printed by `print_cli_table`.
pub fn format_cli_table(report: &LintReport) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Lint completed at: {}",
        report.scan_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "Lockfile: {}", report.lockfile);
    let _ = writeln!(
        out,
        "Policy: {}/{} via git+ssh, everything else via https or file",
        report.internal_host, report.org_name
    );
    let _ = writeln!(out);

    let errors = report.result.errors();
    if !errors.is_empty() {
        let _ = writeln!(out, "Found {}:", violations(errors.len()));
        let _ = writeln!(out);

        let rows: Vec<ViolationRow> = errors
            .iter()
            .map(|v| ViolationRow {
                package: truncate(&v.package, 50),
                message: v.message.trim_end().to_string(),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        let _ = writeln!(out, "{}", table);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", summary(report));
    out
}

fn summary(report: &LintReport) -> String {
    let errors = report.result.errors().len();
    if errors == 0 {
        format!(
            "Summary: {} packages checked, no violations",
            report.packages_checked
        )
    } else {
        format!(
            "Summary: {} packages checked, {}",
            report.packages_checked,
            violations(errors)
        )
    }
}

fn violations(count: usize) -> String {
    if count == 1 {
        "1 violation".to_string()
    } else {
        format!("{} violations", count)
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
