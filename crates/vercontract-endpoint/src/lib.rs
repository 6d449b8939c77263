//! Versioned endpoint definitions and route matching for API contracts.
//!
//! An [`Endpoint`] is one `(method, route)` pair. It owns one
//! [`EndpointDefinition`] per declared version and message kind; each
//! definition compiles its schema into strict form once, at construction, and
//! validates payloads and bundled examples against it.
//!
//! Declarations arrive already deserialized as [`EndpointDeclaration`]
//! records; reading declaration files is left to the embedding application.

pub mod config;
pub mod declaration;
pub mod definition;
pub mod endpoint;
pub mod error;
pub mod example;
pub mod kind;
pub mod route;

pub use config::EndpointConfig;
pub use declaration::{DefinitionDeclaration, EndpointDeclaration};
pub use definition::EndpointDefinition;
pub use endpoint::{normalize_method, Endpoint};
pub use error::{EndpointError, Result};
pub use example::{Example, ExampleRef};
pub use kind::MessageKind;
pub use route::RoutePattern;
pub use vercontract_schema::{SchemaConfig, ValidationFailure};
