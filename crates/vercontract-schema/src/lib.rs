//! Strict JSON Schema rewriting and payload validation for API contracts.
//!
//! Contract authors mark fields `optional` instead of listing `required`
//! names. This crate rewrites those declarations into strict schemas (no
//! undeclared properties, everything required unless marked optional) and
//! validates payloads against them, reporting every violation at once.
//!
//! Schema evaluation itself is delegated to the `jsonschema` crate.

pub mod config;
pub mod error;
pub mod strict;
pub mod validator;

pub use config::SchemaConfig;
pub use error::{Result, SchemaError, ValidationFailure};
pub use strict::{lower, strictify};
pub use validator::StrictSchema;
