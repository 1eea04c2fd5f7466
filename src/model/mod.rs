//! Core data types for lockfile packages and validation results.
//!
//! - [`PackageEntry`] - A single lockfile entry
//! - [`Packages`] - Lockfile entries in file order
//! - [`ValidationResult`] - Outcome of a validator run
//! - [`Violation`] - A single policy failure
//! - [`LintReport`] - A validation run ready for output
//!
//! # Example
//!
//! ```
//! use lockscan::{PackageEntry, Packages};
//!
//! let mut packages = Packages::new();
//! packages.insert("lodash@4.17.21", PackageEntry::resolved("https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz"));
//!
//! assert_eq!(packages.len(), 1);
//! ```

mod package;
mod report;
mod result;

pub use package::*;
pub use report::*;
pub use result::*;
