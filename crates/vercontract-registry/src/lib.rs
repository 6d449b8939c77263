//! Endpoint registry with pluggable version resolution for API contracts.
//!
//! The [`Registry`] resolves `(method, path, message kind, version, status)`
//! to a single [`EndpointDefinition`](vercontract_endpoint::EndpointDefinition).
//! It never picks a version itself: the caller supplies one, directly or
//! through a [`VersionResolver`]. A miss is `None`, never an error.

pub mod config;
pub mod error;
pub mod params;
pub mod registry;
pub mod resolver;

pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use params::{ParamParser, ParamParsers};
pub use registry::{ExampleReport, Lookup, Registry};
pub use resolver::{DeclaredStatuses, StaticVersion, StatusApplicability, VersionResolver};
