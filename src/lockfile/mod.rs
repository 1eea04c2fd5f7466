//! Lockfile loading.
//!
//! Turns an npm `package-lock.json` / `npm-shrinkwrap.json` or a yarn v1
//! `yarn.lock` into [`Packages`], keeping the order entries appear in the file.
//!
//! # Example
//!
//! ```no_run
//! use lockscan::lockfile;
//!
//! let packages = lockfile::load("package-lock.json", None)?;
//! println!("{} packages", packages.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

mod npm;
mod yarn;

pub use npm::parse_npm;
pub use yarn::parse_yarn;

use crate::model::Packages;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockfileKind {
    Npm,
    Yarn,
}

impl LockfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockfileKind::Npm => "npm",
            LockfileKind::Yarn => "yarn",
        }
    }

    /// Guesses the lockfile type from its file name.
    pub fn detect(path: &Path) -> Option<Self> {
        match path.file_name()?.to_str()? {
            "package-lock.json" | "npm-shrinkwrap.json" => Some(LockfileKind::Npm),
            "yarn.lock" => Some(LockfileKind::Yarn),
            _ => None,
        }
    }
}

impl std::str::FromStr for LockfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(LockfileKind::Npm),
            "yarn" => Ok(LockfileKind::Yarn),
            _ => Err(format!("Unknown lockfile type: {}. Use 'npm' or 'yarn'", s)),
        }
    }
}

impl std::fmt::Display for LockfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LockfileError {
    #[error("cannot determine lockfile type of {0}; pass --type npm or --type yarn")]
    UnknownKind(String),
    #[error("npm lockfile must be a JSON object")]
    NotAnObject,
    #[error("malformed yarn.lock at line {line}: {reason}")]
    Yarn { line: usize, reason: String },
}

/// Reads and parses a lockfile.
///
/// `kind` overrides detection by file name.
///
/// # Errors
///
/// Returns an error if the type cannot be determined, the file cannot be read,
/// or its contents do not parse.
pub fn load(path: impl AsRef<Path>, kind: Option<LockfileKind>) -> Result<Packages> {
    let path = path.as_ref();

    let kind = match kind.or_else(|| LockfileKind::detect(path)) {
        Some(kind) => kind,
        None => return Err(LockfileError::UnknownKind(path.display().to_string()).into()),
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read lockfile {}", path.display()))?;

    let packages = match kind {
        LockfileKind::Npm => parse_npm(&content),
        LockfileKind::Yarn => parse_yarn(&content),
    }
    .with_context(|| format!("Failed to parse {} lockfile {}", kind, path.display()))?;

    tracing::debug!(
        path = %path.display(),
        kind = kind.as_str(),
        packages = packages.len(),
        "loaded lockfile"
    );

    Ok(packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_kind() {
        assert_eq!(
            LockfileKind::detect(&PathBuf::from("app/package-lock.json")),
            Some(LockfileKind::Npm)
        );
        assert_eq!(
            LockfileKind::detect(&PathBuf::from("npm-shrinkwrap.json")),
            Some(LockfileKind::Npm)
        );
        assert_eq!(
            LockfileKind::detect(&PathBuf::from("yarn.lock")),
            Some(LockfileKind::Yarn)
        );
        assert_eq!(LockfileKind::detect(&PathBuf::from("Cargo.lock")), None);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("NPM".parse::<LockfileKind>(), Ok(LockfileKind::Npm));
        assert_eq!("yarn".parse::<LockfileKind>(), Ok(LockfileKind::Yarn));
        assert!("pnpm".parse::<LockfileKind>().is_err());
    }

    #[test]
    fn test_load_npm_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package-lock.json");
        fs::write(
            &path,
            r#"{
                "lockfileVersion": 3,
                "packages": {
                    "": { "name": "app" },
                    "node_modules/lodash": {
                        "version": "4.17.21",
                        "resolved": "https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz"
                    }
                }
            }"#,
        )
        .unwrap();

        let packages = load(&path, None).unwrap();
        assert_eq!(packages.len(), 1);
        assert!(packages.contains("lodash@4.17.21"));
    }

    #[test]
    fn test_load_with_explicit_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.lock");
        fs::write(
            &path,
            "left-pad@^1.3.0:\n  version \"1.3.0\"\n  resolved \"https://registry.yarnpkg.com/left-pad/-/left-pad-1.3.0.tgz\"\n",
        )
        .unwrap();

        assert!(load(&path, None).is_err());

        let packages = load(&path, Some(LockfileKind::Yarn)).unwrap();
        assert!(packages.contains("left-pad@^1.3.0"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("package-lock.json"), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read lockfile"));
    }
}
