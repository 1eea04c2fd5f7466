use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Success,
    Error,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Success => "success",
            ResultType::Error => "error",
        }
    }
}

impl std::fmt::Display for ResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single package that broke the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub message: String,
    pub package: String,
}

impl Violation {
    pub fn new(message: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            package: package.into(),
        }
    }
}

/// Outcome of a validator run.
///
/// `kind` is always derived from `errors`, so a result can only be built
/// through [`ValidationResult::from_errors`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    #[serde(rename = "type")]
    kind: ResultType,
    errors: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<Violation>) -> Self {
        let kind = if errors.is_empty() {
            ResultType::Success
        } else {
            ResultType::Error
        };
        Self { kind, errors }
    }

    pub fn success() -> Self {
        Self::from_errors(Vec::new())
    }

    pub fn kind(&self) -> ResultType {
        self.kind
    }

    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    pub fn is_success(&self) -> bool {
        self.kind == ResultType::Success
    }
}
