pub mod config;
pub mod lockfile;
pub mod logging;
pub mod model;
pub mod output;
pub mod validator;

pub use config::Config;
pub use model::{LintReport, PackageEntry, Packages, ResultType, ValidationResult, Violation};
pub use validator::{InternalSshExternalHttpsValidator, ValidateOptions, ValidatorError};
