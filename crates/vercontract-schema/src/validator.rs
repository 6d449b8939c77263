use jsonschema::Validator;
use serde_json::Value;
use tracing::debug;

use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError, ValidationFailure};
use crate::strict::{lower, strictify};

/// A declared schema rewritten into strict form and compiled once.
///
/// The author form is consumed at construction; only the strict form (and its
/// lowered draft 2020-12 equivalent used for evaluation) is kept.
#[derive(Debug)]
pub struct StrictSchema {
    strict: Value,
    lowered: Value,
    validator: Validator,
}

impl StrictSchema {
    /// Strictify and compile a declared schema with default config.
    pub fn compile(declared: Value) -> Result<Self> {
        Self::compile_with_config(declared, &SchemaConfig::default())
    }

    /// Strictify and compile a declared schema with explicit config.
    pub fn compile_with_config(mut declared: Value, config: &SchemaConfig) -> Result<Self> {
        strictify(&mut declared);
        let lowered = lower(&declared);

        let validator = jsonschema::options()
            .should_validate_formats(config.validate_formats)
            .build(&lowered)
            .map_err(|err| SchemaError::CompileFailed(err.to_string()))?;
        debug!(
            validate_formats = config.validate_formats,
            "strict schema compiled"
        );

        Ok(Self {
            strict: declared,
            lowered,
            validator,
        })
    }

    /// The strict form: `additionalProperties: false` and a boolean `required`
    /// on every hardened node.
    pub fn as_value(&self) -> &Value {
        &self.strict
    }

    /// The document actually handed to the validator.
    pub fn lowered(&self) -> &Value {
        &self.lowered
    }

    /// Check the schema against its meta-schema.
    pub fn schema_violations(&self) -> Vec<String> {
        meta_violations(&self.lowered)
    }

    /// Every violation of `payload` against the schema, in evaluation order.
    pub fn violations(&self, payload: &Value) -> Vec<String> {
        self.validator
            .iter_errors(payload)
            .map(|err| format_violation(&err))
            .collect()
    }

    /// Validate `payload`, self-checking the schema first.
    ///
    /// `description` names what is being validated in the resulting failure.
    pub fn validate(
        &self,
        description: &str,
        payload: &Value,
    ) -> std::result::Result<(), ValidationFailure> {
        let schema_violations = self.schema_violations();
        if !schema_violations.is_empty() {
            return Err(ValidationFailure::schema(description, schema_violations));
        }

        let violations = self.violations(payload);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::payload(description, payload.clone(), violations))
        }
    }

    /// Validate a raw JSON payload.
    pub fn validate_slice(&self, description: &str, payload: &[u8]) -> Result<()> {
        let value: Value = serde_json::from_slice(payload)?;
        self.validate(description, &value)?;
        Ok(())
    }
}

/// Every violation of `lowered` against the draft 2020-12 meta-schema.
fn meta_violations(lowered: &Value) -> Vec<String> {
    let meta = jsonschema::draft202012::meta::validator();
    meta.iter_errors(lowered)
        .map(|err| format_violation(&err))
        .collect()
}

fn format_violation(err: &jsonschema::ValidationError<'_>) -> String {
    let path = err.instance_path().to_string();
    if path.is_empty() {
        format!("$: {err}")
    } else {
        format!("${path}: {err}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn widget_schema() -> StrictSchema {
        StrictSchema::compile(json!({
            "type": "object",
            "properties": {
                "id": {"type": "string"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn declared_property_is_required() {
        let schema = widget_schema();
        let failure = schema.validate("widgets (v. 1)", &json!({})).unwrap_err();
        assert_eq!(failure.violations.len(), 1);
        assert!(failure.violations[0].contains("id"));
        assert_eq!(failure.payload, Some(json!({})));
    }

    #[test]
    fn undeclared_property_is_rejected() {
        let schema = widget_schema();
        let failure = schema
            .validate("widgets (v. 1)", &json!({"id": "7", "extra": 1}))
            .unwrap_err();

        assert!(failure.violations.iter().any(|v| v.contains("extra")));
        assert_eq!(failure.description, "widgets (v. 1)");
        assert!(!failure.is_schema_failure());
    }

    #[test]
    fn conforming_payload_passes() {
        assert!(widget_schema()
            .validate("widgets (v. 1)", &json!({"id": "7"}))
            .is_ok());
    }

    #[test]
    fn all_violations_are_collected() {
        let schema = StrictSchema::compile(json!({
            "type": "object",
            "properties": {
                "a": {"type": "integer"},
                "b": {"type": "string"}
            }
        }))
        .unwrap();

        let failure = schema
            .validate("pair (v. 1)", &json!({"a": "x", "b": 3, "c": null}))
            .unwrap_err();
        assert!(failure.violations.len() >= 3);
    }

    #[test]
    fn optional_property_may_be_absent() {
        let schema = StrictSchema::compile(json!({
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "note": {"type": "string", "optional": true}
            }
        }))
        .unwrap();

        assert!(schema.validate("d", &json!({"id": "1"})).is_ok());
        assert!(schema.validate("d", &json!({"id": "1", "note": "n"})).is_ok());
    }

    #[test]
    fn nested_objects_are_strict() {
        let schema = StrictSchema::compile(json!({
            "type": "object",
            "properties": {
                "nested": {
                    "type": "object",
                    "properties": {"v": {"type": "integer"}}
                }
            }
        }))
        .unwrap();

        assert!(schema.validate("d", &json!({"nested": {"v": 1}})).is_ok());
        assert!(schema
            .validate("d", &json!({"nested": {"v": 1, "extra": true}}))
            .is_err());
        assert!(schema.validate("d", &json!({"nested": {}})).is_err());
    }

    #[test]
    fn strict_form_keeps_boolean_required() {
        let schema = widget_schema();
        assert_eq!(schema.as_value()["properties"]["id"]["required"], json!(true));
        assert_eq!(schema.lowered()["required"], json!(["id"]));
    }

    #[test]
    fn invalid_schema_fails_compile() {
        assert!(matches!(
            StrictSchema::compile(json!({"type": "definitely-not-a-type"})),
            Err(SchemaError::CompileFailed(_))
        ));
    }

    #[test]
    fn invalid_json_payload_fails() {
        assert!(matches!(
            widget_schema().validate_slice("d", b"not-json"),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn format_assertion_follows_config() {
        let declared = json!({"type": "string", "format": "email"});
        let lenient = StrictSchema::compile(declared.clone()).unwrap();
        let asserting = StrictSchema::compile_with_config(
            declared,
            &SchemaConfig {
                validate_formats: true,
            },
        )
        .unwrap();

        assert!(lenient.validate("d", &json!("not-an-email")).is_ok());
        assert!(asserting.validate("d", &json!("not-an-email")).is_err());
    }

    #[test]
    fn meta_violations_are_all_collected() {
        let violations = meta_violations(&json!({"type": 12, "minimum": "low"}));
        assert!(violations.len() >= 2);
        assert!(violations.iter().any(|v| v.starts_with("$/type")));
        assert!(violations.iter().any(|v| v.starts_with("$/minimum")));

        assert!(widget_schema().schema_violations().is_empty());
    }

    #[test]
    fn malformed_schema_fails_without_payload() {
        let mut schema = widget_schema();
        schema.lowered = json!({"type": 12, "minimum": "low"});

        let failure = schema
            .validate("widgets (v. 1)", &json!({"id": "7"}))
            .unwrap_err();
        assert!(failure.is_schema_failure());
        assert_eq!(failure.payload, None);
        assert_eq!(failure.description, "widgets (v. 1)");
        assert!(failure.violations.len() >= 2);
    }

    #[test]
    fn referenced_schema_keeps_its_own_strictness() {
        let schema = StrictSchema::compile(json!({
            "type": "object",
            "$defs": {
                "addr": {"type": "object", "properties": {"city": {"type": "string"}}}
            },
            "properties": {"home": {"$ref": "#/$defs/addr"}}
        }))
        .unwrap();

        assert!(schema.validate("d", &json!({"home": {"city": "x"}})).is_ok());
        assert!(schema
            .validate("d", &json!({"home": {"city": "x", "zip": 1}}))
            .is_err());
        assert!(schema.validate("d", &json!({"home": {}})).is_err());
        assert!(schema.validate("d", &json!({})).is_err());
    }
}
