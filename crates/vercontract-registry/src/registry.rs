use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;
use vercontract_endpoint::{
    normalize_method, Endpoint, EndpointDeclaration, EndpointDefinition, MessageKind,
    ValidationFailure,
};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::params::ParamParsers;
use crate::resolver::{DeclaredStatuses, StatusApplicability, VersionResolver};

/// What to look up: a method and path, the body kind, and optionally the
/// response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub kind: MessageKind,
    pub status: Option<u16>,
}

impl<'a> Lookup<'a> {
    pub fn request(method: &'a str, path: &'a str) -> Self {
        Self {
            method,
            path,
            kind: MessageKind::Request,
            status: None,
        }
    }

    pub fn response(method: &'a str, path: &'a str) -> Self {
        Self {
            method,
            path,
            kind: MessageKind::Response,
            status: None,
        }
    }

    /// Restrict the lookup to definitions applying to `status`.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Outcome of validating one bundled example.
#[derive(Debug, Clone)]
pub struct ExampleReport {
    pub endpoint: String,
    pub kind: MessageKind,
    pub version: String,
    pub index: usize,
    pub outcome: std::result::Result<(), ValidationFailure>,
}

impl ExampleReport {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Ordered collection of endpoints.
///
/// Built once from a declaration set and read-only afterwards; share it
/// between threads behind an `Arc`. Lookups return `None` when nothing
/// matches; a miss is never an error.
pub struct Registry {
    endpoints: Vec<Endpoint>,
    config: RegistryConfig,
    status_predicate: Box<dyn StatusApplicability>,
    param_parsers: ParamParsers,
}

impl Registry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            endpoints: Vec::new(),
            config,
            status_predicate: Box::new(DeclaredStatuses),
            param_parsers: ParamParsers::new(),
        }
    }

    /// Build a registry from declarations, in order.
    pub fn build(declarations: &[EndpointDeclaration]) -> Result<Self> {
        Self::build_with_config(declarations, RegistryConfig::default())
    }

    /// Build a registry from declarations with explicit config.
    pub fn build_with_config(
        declarations: &[EndpointDeclaration],
        config: RegistryConfig,
    ) -> Result<Self> {
        let mut registry = Self::with_config(config);
        for declaration in declarations {
            registry.register(declaration)?;
        }
        debug!(endpoints = registry.endpoints.len(), "registry built");
        Ok(registry)
    }

    /// Build one endpoint and append it.
    ///
    /// On error nothing is appended.
    pub fn register(&mut self, declaration: &EndpointDeclaration) -> Result<()> {
        let endpoint =
            Endpoint::from_declaration_with_config(declaration, &self.config.endpoint)?;

        if self.config.check_examples_on_build {
            check_endpoint_examples(&endpoint)?;
        }

        self.endpoints.push(endpoint);
        Ok(())
    }

    /// Replace the status applicability predicate.
    pub fn with_status_predicate(
        mut self,
        predicate: impl StatusApplicability + 'static,
    ) -> Self {
        self.status_predicate = Box::new(predicate);
        self
    }

    /// Replace the parameter parser stack.
    pub fn with_param_parsers(mut self, parsers: ParamParsers) -> Self {
        self.param_parsers = parsers;
        self
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn param_parsers(&self) -> &ParamParsers {
        &self.param_parsers
    }

    /// First endpoint, in registration order, matching method and path.
    ///
    /// Overlapping routes are not diagnosed: the earlier registration wins.
    pub fn find_endpoint(&self, method: &str, path: &str) -> Option<&Endpoint> {
        let method = normalize_method(method);
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.method() == method && endpoint.route_matches(path))
    }

    /// Resolve a lookup against an already-chosen version.
    pub fn find(&self, lookup: &Lookup<'_>, version: &str) -> Option<&EndpointDefinition> {
        let endpoint = self.find_endpoint(lookup.method, lookup.path)?;
        self.select(endpoint, lookup, version)
    }

    /// Resolve a lookup, asking `resolver` for the version once an endpoint
    /// has matched.
    pub fn resolve<C: ?Sized>(
        &self,
        lookup: &Lookup<'_>,
        resolver: &dyn VersionResolver<C>,
        context: &C,
    ) -> Option<&EndpointDefinition> {
        let endpoint = self.find_endpoint(lookup.method, lookup.path)?;
        let version = resolver.resolve_version(context);
        self.select(endpoint, lookup, &version)
    }

    fn select<'r>(
        &self,
        endpoint: &'r Endpoint,
        lookup: &Lookup<'_>,
        version: &str,
    ) -> Option<&'r EndpointDefinition> {
        let Some(definition) = endpoint.find_definition(version, lookup.kind) else {
            debug!(
                endpoint = endpoint.name(),
                kind = %lookup.kind,
                version,
                "no definition for version"
            );
            return None;
        };

        match lookup.status {
            Some(status) if !self.status_predicate.applies(definition, status) => {
                debug!(
                    endpoint = endpoint.name(),
                    version,
                    status,
                    "definition does not apply to status"
                );
                None
            }
            _ => Some(definition),
        }
    }

    /// Parse raw path/query parameters against a definition's schema.
    pub fn coerce_params(
        &self,
        definition: &EndpointDefinition,
        raw: &BTreeMap<String, String>,
    ) -> Result<Value> {
        self.param_parsers.coerce(definition.schema(), raw)
    }

    /// Validate every bundled example of every endpoint.
    pub fn check_examples(&self) -> Vec<ExampleReport> {
        self.endpoints
            .iter()
            .flat_map(endpoint_definitions)
            .flat_map(|definition| {
                definition.examples().map(move |example| ExampleReport {
                    endpoint: definition.endpoint_name().to_string(),
                    kind: definition.kind(),
                    version: definition.version().to_string(),
                    index: example.index(),
                    outcome: example.validate(),
                })
            })
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("endpoints", &self.endpoints)
            .field("config", &self.config)
            .field("param_parsers", &self.param_parsers)
            .finish_non_exhaustive()
    }
}

fn endpoint_definitions(endpoint: &Endpoint) -> impl Iterator<Item = &EndpointDefinition> {
    endpoint
        .definitions(MessageKind::Request)
        .chain(endpoint.definitions(MessageKind::Response))
}

fn check_endpoint_examples(endpoint: &Endpoint) -> Result<()> {
    for definition in endpoint_definitions(endpoint) {
        for example in definition.examples() {
            example
                .validate()
                .map_err(|failure| RegistryError::InvalidExample {
                    kind: definition.kind(),
                    index: example.index(),
                    failure,
                })?;
        }
    }
    Ok(())
}
