//! Lockfile URL policy validators.

mod internal_ssh;

pub use internal_ssh::{InternalSshExternalHttpsValidator, ValidateOptions, DEFAULT_INTERNAL_HOST};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidatorError {
    #[error("expecting an object passed to validator constructor")]
    ExpectingObject,
}
