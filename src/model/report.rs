use super::ValidationResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A validation run over one lockfile, as handed to the output formats.
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    pub lockfile: String,
    pub org_name: String,
    pub internal_host: String,
    pub scan_time: DateTime<Utc>,
    pub packages_checked: usize,
    pub result: ValidationResult,
}

impl LintReport {
    pub fn new(
        lockfile: impl Into<String>,
        org_name: impl Into<String>,
        internal_host: impl Into<String>,
        packages_checked: usize,
        result: ValidationResult,
    ) -> Self {
        Self {
            lockfile: lockfile.into(),
            org_name: org_name.into(),
            internal_host: internal_host.into(),
            scan_time: Utc::now(),
            packages_checked,
            result,
        }
    }
}
