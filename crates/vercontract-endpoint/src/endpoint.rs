use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::config::EndpointConfig;
use crate::declaration::EndpointDeclaration;
use crate::definition::EndpointDefinition;
use crate::error::{EndpointError, Result};
use crate::kind::MessageKind;
use crate::route::RoutePattern;

/// A (method, route template) pair with its versioned definitions.
#[derive(Debug)]
pub struct Endpoint {
    name: String,
    method: String,
    description: Option<String>,
    route: RoutePattern,
    requests: DefinitionSet,
    responses: DefinitionSet,
}

/// Definitions for one message kind, keyed by version, in first-declared
/// order.
#[derive(Debug, Default)]
struct DefinitionSet {
    order: Vec<String>,
    by_version: HashMap<String, EndpointDefinition>,
}

impl DefinitionSet {
    fn insert(&mut self, definition: EndpointDefinition) -> Option<EndpointDefinition> {
        let version = definition.version().to_string();
        let replaced = self.by_version.insert(version.clone(), definition);
        if replaced.is_none() {
            self.order.push(version);
        }
        replaced
    }

    fn get(&self, version: &str) -> Option<&EndpointDefinition> {
        self.by_version.get(version)
    }

    fn iter(&self) -> impl Iterator<Item = &EndpointDefinition> {
        self.order
            .iter()
            .filter_map(|version| self.by_version.get(version))
    }

    fn len(&self) -> usize {
        self.by_version.len()
    }
}

impl Endpoint {
    /// Build an endpoint with default config.
    pub fn from_declaration(declaration: &EndpointDeclaration) -> Result<Self> {
        Self::from_declaration_with_config(declaration, &EndpointConfig::default())
    }

    /// Build an endpoint, compiling every declared version.
    ///
    /// Either every definition compiles and the endpoint is returned, or the
    /// first failure is returned and nothing is built.
    pub fn from_declaration_with_config(
        declaration: &EndpointDeclaration,
        config: &EndpointConfig,
    ) -> Result<Self> {
        declaration.check_required_fields()?;

        let mut endpoint = Self {
            name: declaration.name.clone(),
            method: normalize_method(&declaration.method),
            description: declaration.description.clone(),
            route: RoutePattern::new(declaration.route.clone()),
            requests: DefinitionSet::default(),
            responses: DefinitionSet::default(),
        };

        for kind in [MessageKind::Request, MessageKind::Response] {
            for definition_decl in declaration.definitions(kind) {
                for version in &definition_decl.versions {
                    let definition = EndpointDefinition::from_declaration(
                        &endpoint.name,
                        version,
                        kind,
                        definition_decl,
                        &config.schema,
                    )?;
                    endpoint.insert(kind, definition, config)?;
                }
            }
        }

        debug!(
            endpoint = %endpoint.name,
            method = %endpoint.method,
            route = endpoint.route.template(),
            requests = endpoint.requests.len(),
            responses = endpoint.responses.len(),
            "endpoint built"
        );

        Ok(endpoint)
    }

    fn insert(
        &mut self,
        kind: MessageKind,
        definition: EndpointDefinition,
        config: &EndpointConfig,
    ) -> Result<()> {
        let version = definition.version().to_string();
        if config.fail_on_duplicate_version && self.set(kind).get(&version).is_some() {
            return Err(EndpointError::DuplicateVersion {
                endpoint: self.name.clone(),
                kind,
                version,
            });
        }

        let set = match kind {
            MessageKind::Request => &mut self.requests,
            MessageKind::Response => &mut self.responses,
        };
        if set.insert(definition).is_some() {
            warn!(
                endpoint = %self.name,
                %kind,
                %version,
                "version declared more than once; later declaration wins"
            );
        }
        Ok(())
    }

    fn set(&self, kind: MessageKind) -> &DefinitionSet {
        match kind {
            MessageKind::Request => &self.requests,
            MessageKind::Response => &self.responses,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn route(&self) -> &str {
        self.route.template()
    }

    /// Case-insensitive method comparison.
    pub fn method_matches(&self, method: &str) -> bool {
        normalize_method(method) == self.method
    }

    /// Whether `path` matches the whole route template.
    pub fn route_matches(&self, path: &str) -> bool {
        self.route.matches(path)
    }

    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method_matches(method) && self.route_matches(path)
    }

    /// Values of the route's `:name` segments for a matching path.
    pub fn path_params(&self, path: &str) -> Option<BTreeMap<String, String>> {
        self.route.params(path)
    }

    /// The definition registered for exactly `version`.
    pub fn find_definition(
        &self,
        version: &str,
        kind: MessageKind,
    ) -> Option<&EndpointDefinition> {
        self.set(kind).get(version)
    }

    /// Definitions for `kind`: the one for `version` when given, all of them
    /// otherwise. Never an error; an empty result means nothing matched.
    pub fn find_definitions(
        &self,
        version: Option<&str>,
        kind: MessageKind,
    ) -> Vec<&EndpointDefinition> {
        match version {
            Some(version) => self.find_definition(version, kind).into_iter().collect(),
            None => self.definitions(kind).collect(),
        }
    }

    /// Definitions for `kind`, in first-declared version order.
    pub fn definitions(&self, kind: MessageKind) -> impl Iterator<Item = &EndpointDefinition> {
        self.set(kind).iter()
    }

    /// Versions declared for `kind`, in first-declared order.
    pub fn versions(&self, kind: MessageKind) -> impl Iterator<Item = &str> {
        self.set(kind).order.iter().map(String::as_str)
    }
}

/// Lower-case, trimmed method token used for comparisons.
pub fn normalize_method(method: &str) -> String {
    method.trim().to_ascii_lowercase()
}
