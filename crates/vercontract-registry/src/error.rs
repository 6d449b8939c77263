use vercontract_endpoint::{EndpointError, MessageKind, ValidationFailure};

/// Errors raised while building a registry or parsing parameters.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// An endpoint declaration could not be built.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// A bundled example does not satisfy its definition.
    #[error("{kind} example {index} is invalid: {failure}")]
    InvalidExample {
        kind: MessageKind,
        index: usize,
        failure: ValidationFailure,
    },

    /// No registered parser accepts the parameter type.
    #[error("parameter {name}: no parser accepts type `{kind}`")]
    UnknownParamType { name: String, kind: String },

    /// The raw parameter value cannot be parsed as its declared type.
    #[error("parameter {name}: cannot parse {value:?} as {kind}")]
    InvalidParam {
        name: String,
        kind: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
