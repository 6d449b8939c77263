use vercontract_schema::SchemaError;

use crate::kind::MessageKind;

/// Errors raised while building endpoints from declarations.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// A mandatory declaration field is absent or empty.
    #[error("endpoint {endpoint}: missing required field `{field}`")]
    MissingField {
        endpoint: String,
        field: &'static str,
    },

    /// The declaration could not be deserialized.
    #[error("invalid declaration: {0}")]
    Declaration(#[from] serde_json::Error),

    /// The strict form of a declared schema does not compile.
    #[error("{endpoint} (v. {version}): {source}")]
    Schema {
        endpoint: String,
        version: String,
        source: SchemaError,
    },

    /// The same version is declared twice for one message kind.
    #[error("{endpoint} declares {kind} version {version} more than once")]
    DuplicateVersion {
        endpoint: String,
        kind: MessageKind,
        version: String,
    },

    /// A message kind name other than `request` or `response`.
    #[error("unknown message kind: {0}")]
    UnknownMessageKind(String),
}

pub type Result<T> = std::result::Result<T, EndpointError>;
