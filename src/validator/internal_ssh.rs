//! Transport policy for resolved package URLs.
//!
//! Packages hosted under the organization on the internal host must be
//! fetched over `git+ssh`. Everything else must come over `https` or be a
//! local `file` reference.

use super::ValidatorError;
use crate::model::{PackageEntry, Packages, ValidationResult, Violation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Internal host used when none is configured.
pub const DEFAULT_INTERNAL_HOST: &str = "github.com";

const GITSSH_PROTOCOL: &str = "git+ssh:";
const HTTPS_PROTOCOL: &str = "https:";
const FILE_PROTOCOL: &str = "file:";

/// Per-run options for [`InternalSshExternalHttpsValidator::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    #[serde(rename = "internal-repo-host", skip_serializing_if = "Option::is_none")]
    pub internal_repo_host: Option<String>,
}

impl ValidateOptions {
    pub fn with_internal_host(host: impl Into<String>) -> Self {
        Self {
            internal_repo_host: Some(host.into()),
        }
    }

    /// The configured internal host, falling back to `github.com` when unset
    /// or empty.
    pub fn internal_host(&self) -> &str {
        self.internal_repo_host
            .as_deref()
            .filter(|host| !host.is_empty())
            .unwrap_or(DEFAULT_INTERNAL_HOST)
    }
}

/// The parts of a resolved URL the policy looks at.
struct ResolvedUrl(Url);

impl ResolvedUrl {
    fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self)
    }

    /// Scheme with its trailing colon, e.g. `https:`.
    fn protocol(&self) -> String {
        format!("{}:", self.0.scheme())
    }

    /// Host name plus the port when it differs from the scheme default.
    fn host(&self) -> String {
        match (self.0.host_str(), self.0.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        }
    }

    /// Owner segment of the path (`myorg` in `/myorg/repo.git`).
    fn first_path_segment(&self) -> Option<&str> {
        self.0.path().split('/').nth(1)
    }
}

/// Checks every resolved URL in a lockfile against the internal-ssh /
/// external-https transport policy.
///
/// # Example
///
/// ```
/// use lockscan::model::{PackageEntry, Packages};
/// use lockscan::validator::{InternalSshExternalHttpsValidator, ValidateOptions};
///
/// let packages: Packages = [(
///     "pkgB",
///     PackageEntry::resolved("https://github.com/myorg/pkgB.git"),
/// )]
/// .into_iter()
/// .collect();
///
/// let validator = InternalSshExternalHttpsValidator::new(packages);
/// let result = validator.validate("myorg", &ValidateOptions::default());
///
/// assert!(!result.is_success());
/// assert_eq!(result.errors()[0].package, "pkgB");
/// ```
#[derive(Debug, Clone)]
pub struct InternalSshExternalHttpsValidator {
    packages: Packages,
}

impl InternalSshExternalHttpsValidator {
    pub fn new(packages: Packages) -> Self {
        Self { packages }
    }

    /// Builds a validator from an untyped JSON package map.
    ///
    /// Arrays are accepted too, with each index as the package name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::ExpectingObject`] for `null` and scalar
    /// values.
    pub fn from_value(value: &Value) -> Result<Self, ValidatorError> {
        let packages = match value {
            Value::Object(map) => map
                .iter()
                .map(|(name, metadata)| (name.clone(), PackageEntry::from_json(metadata)))
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, metadata)| (idx.to_string(), PackageEntry::from_json(metadata)))
                .collect(),
            _ => return Err(ValidatorError::ExpectingObject),
        };

        Ok(Self::new(packages))
    }

    pub fn packages(&self) -> &Packages {
        &self.packages
    }

    /// Validates every entry with a `resolved` URL, in lockfile order.
    ///
    /// Never fails: policy breaches are returned as violations, and URLs that
    /// do not parse are skipped.
    pub fn validate(&self, org_name: &str, options: &ValidateOptions) -> ValidationResult {
        let internal_host = options.internal_host();

        let errors = self
            .packages
            .iter()
            .filter_map(|(name, entry)| check_entry(name, entry, org_name, internal_host))
            .collect();

        ValidationResult::from_errors(errors)
    }
}

fn check_entry(
    name: &str,
    entry: &PackageEntry,
    org_name: &str,
    internal_host: &str,
) -> Option<Violation> {
    let resolved = entry.resolved.as_deref()?;

    // Unparseable URLs count as passing.
    let url = match ResolvedUrl::parse(resolved) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(package = name, resolved, error = %e, "skipping unparseable resolved URL");
            return None;
        }
    };

    let protocol = url.protocol();

    if url.host() == internal_host && url.first_path_segment() == Some(org_name) {
        if protocol == GITSSH_PROTOCOL {
            return None;
        }
        return Some(Violation::new(
            format!(
                "Internal packages must use the 'git+ssh' protocol, but package: {} used '{}'\n",
                name, protocol
            ),
            name,
        ));
    }

    if protocol == HTTPS_PROTOCOL || protocol == FILE_PROTOCOL {
        return None;
    }

    Some(Violation::new(
        format!(
            "Non-internal packages must use the 'https' protocol, but package: {} used {}\n",
            name, protocol
        ),
        name,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResultType;
    use serde_json::json;

    fn validator(entries: &[(&str, &str)]) -> InternalSshExternalHttpsValidator {
        InternalSshExternalHttpsValidator::new(
            entries
                .iter()
                .map(|(name, url)| (*name, PackageEntry::resolved(*url)))
                .collect(),
        )
    }

    #[test]
    fn test_internal_git_ssh_passes() {
        let result = validator(&[("pkgA", "git+ssh://git@github.com/myorg/pkgA.git")])
            .validate("myorg", &ValidateOptions::default());

        assert_eq!(result, ValidationResult::success());
    }

    #[test]
    fn test_internal_https_fails() {
        let result = validator(&[("pkgB", "https://github.com/myorg/pkgB.git")])
            .validate("myorg", &ValidateOptions::default());

        assert_eq!(result.kind(), ResultType::Error);
        assert_eq!(
            result.errors(),
            &[Violation::new(
                "Internal packages must use the 'git+ssh' protocol, but package: pkgB used 'https:'\n",
                "pkgB"
            )]
        );
    }

    #[test]
    fn test_external_http_fails() {
        let result = validator(&[("pkgC", "http://registry.example.com/pkgC-1.0.tgz")])
            .validate("myorg", &ValidateOptions::default());

        assert_eq!(
            result.errors(),
            &[Violation::new(
                "Non-internal packages must use the 'https' protocol, but package: pkgC used http:\n",
                "pkgC"
            )]
        );
    }

    #[test]
    fn test_external_git_ssh_fails() {
        let result = validator(&[("other", "git+ssh://git@github.com/someone-else/other.git")])
            .validate("myorg", &ValidateOptions::default());

        assert_eq!(result.errors().len(), 1);
        assert!(result.errors()[0]
            .message
            .starts_with("Non-internal packages must use the 'https' protocol"));
        assert!(result.errors()[0].message.ends_with("used git+ssh:\n"));
    }

    #[test]
    fn test_external_https_and_file_pass() {
        let result = validator(&[
            ("lodash", "https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz"),
            ("pkgD", "file:///local/path/pkgD"),
        ])
        .validate("myorg", &ValidateOptions::default());

        assert!(result.is_success());
    }

    #[test]
    fn test_missing_resolved_is_skipped() {
        let packages: Packages = [("pkgE", PackageEntry::new().with_version("1.0.0"))]
            .into_iter()
            .collect();
        let result = InternalSshExternalHttpsValidator::new(packages)
            .validate("myorg", &ValidateOptions::default());

        assert_eq!(result, ValidationResult::success());
    }

    #[test]
    fn test_unparseable_url_is_skipped() {
        let result = validator(&[("broken", "not a url"), ("relative", "../pkg.tgz")])
            .validate("myorg", &ValidateOptions::default());

        assert!(result.is_success());
    }

    #[test]
    fn test_custom_internal_host() {
        let options = ValidateOptions::with_internal_host("git.corp.example");
        let result = validator(&[
            ("corp-ok", "git+ssh://git@git.corp.example/myorg/ok.git"),
            ("corp-bad", "https://git.corp.example/myorg/bad.git"),
            ("gh", "https://github.com/myorg/gh.git"),
        ])
        .validate("myorg", &options);

        let packages: Vec<_> = result.errors().iter().map(|v| v.package.as_str()).collect();
        assert_eq!(packages, vec!["corp-bad"]);
    }

    #[test]
    fn test_empty_internal_host_uses_default() {
        let options = ValidateOptions::with_internal_host("");
        assert_eq!(options.internal_host(), DEFAULT_INTERNAL_HOST);
    }

    #[test]
    fn test_internal_host_includes_port() {
        let options = ValidateOptions::with_internal_host("git.corp.example:8443");
        let result = validator(&[
            ("with-port", "https://git.corp.example:8443/myorg/a.git"),
            ("without-port", "https://git.corp.example/myorg/b.git"),
        ])
        .validate("myorg", &options);

        let packages: Vec<_> = result.errors().iter().map(|v| v.package.as_str()).collect();
        assert_eq!(packages, vec!["with-port"]);
        assert!(result.errors()[0].message.contains("used 'https:'"));
    }

    #[test]
    fn test_errors_follow_input_order() {
        let result = validator(&[
            ("z", "http://example.com/z.tgz"),
            ("ok", "https://example.com/ok.tgz"),
            ("a", "https://github.com/myorg/a.git"),
            ("m", "ftp://example.com/m.tgz"),
        ])
        .validate("myorg", &ValidateOptions::default());

        let packages: Vec<_> = result.errors().iter().map(|v| v.package.as_str()).collect();
        assert_eq!(packages, vec!["z", "a", "m"]);
        assert_eq!(result.kind(), ResultType::Error);
    }

    #[test]
    fn test_from_value_requires_object() {
        for value in [json!(null), json!("pkg"), json!(3), json!(true)] {
            assert_eq!(
                InternalSshExternalHttpsValidator::from_value(&value).unwrap_err(),
                ValidatorError::ExpectingObject
            );
        }
        assert_eq!(
            ValidatorError::ExpectingObject.to_string(),
            "expecting an object passed to validator constructor"
        );
    }

    #[test]
    fn test_from_value_keeps_object_order() {
        let validator = InternalSshExternalHttpsValidator::from_value(&json!({
            "second": { "resolved": "http://example.com/second.tgz" },
            "first": { "resolved": "http://example.com/first.tgz" },
            "bare": {}
        }))
        .unwrap();

        let result = validator.validate("myorg", &ValidateOptions::default());
        let packages: Vec<_> = result.errors().iter().map(|v| v.package.as_str()).collect();
        assert_eq!(packages, vec!["second", "first"]);
        assert_eq!(validator.packages().len(), 3);
    }

    #[test]
    fn test_from_value_accepts_array_with_index_names() {
        let validator = InternalSshExternalHttpsValidator::from_value(&json!([
            { "resolved": "https://registry.npmjs.org/a/-/a-1.0.0.tgz" },
            { "resolved": "http://example.com/b.tgz" }
        ]))
        .unwrap();

        let result = validator.validate("myorg", &ValidateOptions::default());
        assert_eq!(
            result.errors(),
            &[Violation::new(
                "Non-internal packages must use the 'https' protocol, but package: 1 used http:\n",
                "1"
            )]
        );
    }

    #[test]
    fn test_options_deserialize_from_kebab_case() {
        let options: ValidateOptions =
            serde_json::from_value(json!({ "internal-repo-host": "gitlab.com" })).unwrap();
        assert_eq!(options.internal_host(), "gitlab.com");
    }
}
