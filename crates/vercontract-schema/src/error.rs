use serde_json::Value;

/// A payload (or the schema itself) did not satisfy a strict schema.
///
/// Every violation found is carried; validation never stops at the first one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{description} failed validation: {}", .violations.join("; "))]
pub struct ValidationFailure {
    /// Human-readable messages, one per violation.
    pub violations: Vec<String>,
    /// The offending payload. `None` when the schema itself is malformed.
    pub payload: Option<Value>,
    /// `"<endpoint name> (v. <version>)"`.
    pub description: String,
}

impl ValidationFailure {
    /// Failure of the schema's own well-formedness check.
    pub fn schema(description: impl Into<String>, violations: Vec<String>) -> Self {
        Self {
            violations,
            payload: None,
            description: description.into(),
        }
    }

    /// Failure of a payload against a well-formed schema.
    pub fn payload(description: impl Into<String>, payload: Value, violations: Vec<String>) -> Self {
        Self {
            violations,
            payload: Some(payload),
            description: description.into(),
        }
    }

    /// True when the failure concerns the schema rather than a payload.
    pub fn is_schema_failure(&self) -> bool {
        self.payload.is_none()
    }
}

/// Errors that can occur while compiling or applying strict schemas.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The strict schema could not be compiled.
    #[error("failed to compile schema: {0}")]
    CompileFailed(String),

    /// A payload or the schema itself failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
