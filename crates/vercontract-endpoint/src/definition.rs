use std::collections::BTreeSet;

use serde_json::Value;
use vercontract_schema::{SchemaConfig, StrictSchema, ValidationFailure};

use crate::declaration::DefinitionDeclaration;
use crate::error::{EndpointError, Result};
use crate::example::{Example, ExampleRef};
use crate::kind::MessageKind;

/// One version of one endpoint's request or response body.
///
/// The declared schema is strictified and compiled exactly once, here; only
/// the strict form is kept.
#[derive(Debug)]
pub struct EndpointDefinition {
    endpoint_name: String,
    version: String,
    kind: MessageKind,
    schema: StrictSchema,
    examples: Vec<Example>,
    statuses: Option<BTreeSet<u16>>,
}

impl EndpointDefinition {
    /// Build the definition for `version` out of a declaration that may
    /// cover several versions.
    pub fn from_declaration(
        endpoint_name: &str,
        version: &str,
        kind: MessageKind,
        declaration: &DefinitionDeclaration,
        config: &SchemaConfig,
    ) -> Result<Self> {
        let schema = StrictSchema::compile_with_config(declaration.schema.clone(), config)
            .map_err(|source| EndpointError::Schema {
                endpoint: endpoint_name.to_string(),
                version: version.to_string(),
                source,
            })?;

        Ok(Self {
            endpoint_name: endpoint_name.to_string(),
            version: version.to_string(),
            kind,
            schema,
            examples: declaration
                .examples
                .iter()
                .cloned()
                .map(Example::new)
                .collect(),
            statuses: declaration
                .statuses
                .as_ref()
                .map(|codes| codes.iter().copied().collect()),
        })
    }

    pub fn endpoint_name(&self) -> &str {
        &self.endpoint_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// The strict schema payloads are validated against.
    pub fn schema(&self) -> &Value {
        self.schema.as_value()
    }

    pub fn strict_schema(&self) -> &StrictSchema {
        &self.schema
    }

    /// Declared status codes, if the definition is restricted to some.
    pub fn statuses(&self) -> Option<&BTreeSet<u16>> {
        self.statuses.as_ref()
    }

    /// Whether the definition applies to responses with `status`.
    pub fn applies_to_status(&self, status: u16) -> bool {
        self.statuses
            .as_ref()
            .is_none_or(|codes| codes.contains(&status))
    }

    /// `"<endpoint name> (v. <version>)"`.
    pub fn description(&self) -> String {
        format!("{} (v. {})", self.endpoint_name, self.version)
    }

    /// Validate a payload, reporting every violation.
    pub fn validate(&self, payload: &Value) -> std::result::Result<(), ValidationFailure> {
        self.schema.validate(&self.description(), payload)
    }

    pub fn examples(&self) -> impl Iterator<Item = ExampleRef<'_>> {
        self.examples
            .iter()
            .enumerate()
            .map(move |(index, example)| ExampleRef::new(self, index, example))
    }

    pub fn example_count(&self) -> usize {
        self.examples.len()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn declaration(schema: Value, examples: Vec<Value>) -> DefinitionDeclaration {
        DefinitionDeclaration {
            versions: vec!["1".to_string()],
            schema,
            examples,
            statuses: None,
        }
    }

    fn widget_definition(examples: Vec<Value>) -> EndpointDefinition {
        EndpointDefinition::from_declaration(
            "widgets",
            "1",
            MessageKind::Response,
            &declaration(
                json!({"type": "object", "properties": {"id": {"type": "string"}}}),
                examples,
            ),
            &SchemaConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn strict_schema_is_derived_at_construction() {
        let definition = widget_definition(vec![]);
        assert_eq!(definition.schema()["additionalProperties"], json!(false));
        assert_eq!(definition.schema()["properties"]["id"]["required"], json!(true));
    }

    #[test]
    fn validation_failure_describes_endpoint_and_version() {
        let definition = widget_definition(vec![]);
        let failure = definition
            .validate(&json!({"id": "7", "extra": 1}))
            .unwrap_err();

        assert_eq!(failure.description, "widgets (v. 1)");
        assert_eq!(failure.payload, Some(json!({"id": "7", "extra": 1})));
        assert!(failure.violations.iter().any(|v| v.contains("extra")));
        assert!(definition.validate(&json!({"id": "7"})).is_ok());
    }

    #[test]
    fn examples_validate_through_their_definition() {
        let definition = widget_definition(vec![json!({"id": "1"}), json!({"id": 1})]);
        let outcomes: Vec<_> = definition.examples().map(|e| e.validate()).collect();

        assert_eq!(definition.example_count(), 2);
        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].is_err());
        assert_eq!(definition.examples().nth(1).unwrap().index(), 1);
    }

    #[test]
    fn status_filter_defaults_to_any() {
        let definition = widget_definition(vec![]);
        assert!(definition.statuses().is_none());
        assert!(definition.applies_to_status(500));
    }

    #[test]
    fn declared_statuses_restrict_applicability() {
        let mut decl = declaration(json!({"type": "object"}), vec![]);
        decl.statuses = Some(vec![200, 201]);
        let definition = EndpointDefinition::from_declaration(
            "widgets",
            "1",
            MessageKind::Response,
            &decl,
            &SchemaConfig::default(),
        )
        .unwrap();

        assert!(definition.applies_to_status(200));
        assert!(definition.applies_to_status(201));
        assert!(!definition.applies_to_status(404));
    }

    #[test]
    fn uncompilable_schema_is_a_configuration_error() {
        let result = EndpointDefinition::from_declaration(
            "widgets",
            "3",
            MessageKind::Request,
            &declaration(json!({"type": 12}), vec![]),
            &SchemaConfig::default(),
        );

        match result {
            Err(EndpointError::Schema { endpoint, version, .. }) => {
                assert_eq!(endpoint, "widgets");
                assert_eq!(version, "3");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }
}
