//! Versioned, strictly validated API endpoint contracts.
//!
//! vercontract registers versioned endpoint contracts (route, method, request
//! and response schemas, examples), resolves which version applies to a
//! request, and validates payloads with strict-by-default semantics: no
//! undeclared properties, every field required unless marked `optional`.
//!
//! # Crate Structure
//!
//! - [`schema`]: author-form to strict-form schema rewriting and validation
//! - [`endpoint`]: endpoints, versioned definitions, route matching
//! - [`registry`]: endpoint lookup, version resolution, parameter parsing

/// Re-export schema types.
pub mod schema {
    pub use vercontract_schema::*;
}

/// Re-export endpoint types.
pub mod endpoint {
    pub use vercontract_endpoint::*;
}

/// Re-export registry types.
pub mod registry {
    pub use vercontract_registry::*;
}

pub use vercontract_endpoint::{EndpointDeclaration, MessageKind, ValidationFailure};
pub use vercontract_registry::{Lookup, Registry, RegistryConfig, StaticVersion, VersionResolver};
