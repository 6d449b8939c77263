//! Author-form to strict-form schema rewriting.
//!
//! Contract schemas are written with an inline `optional` flag on each node
//! instead of a JSON Schema `required` name list. [`strictify`] hardens every
//! schema node: undeclared properties are rejected and `optional` becomes a
//! per-node `required` boolean. [`lower`] then turns that strict form into a
//! draft 2020-12 document the validator understands.

use serde_json::{Map, Value};

const PROPERTIES: &str = "properties";
const OPTIONAL: &str = "optional";
const REQUIRED: &str = "required";
const ADDITIONAL_PROPERTIES: &str = "additionalProperties";
const REF: &str = "$ref";

/// Rewrite an author-form schema into its strict form, in place.
///
/// Children are rewritten before their parent. Every mapping node is hardened
/// except the mapping found directly under a `properties` key, which names
/// property schemas rather than being a schema itself. Hardening sets
/// `additionalProperties: false` and replaces `optional` with
/// `required = !optional`.
///
/// Runs once per schema; the output no longer carries `optional`, so running
/// it again is not meaningful.
pub fn strictify(schema: &mut Value) {
    strictify_node(schema, true);
}

fn strictify_node(node: &mut Value, harden: bool) {
    match node {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                strictify_node(child, key != PROPERTIES);
            }
            if harden {
                harden_node(map);
            }
        }
        Value::Array(items) => {
            for item in items {
                strictify_node(item, true);
            }
        }
        _ => {}
    }
}

fn harden_node(map: &mut Map<String, Value>) {
    let optional = map.remove(OPTIONAL).is_some_and(|flag| is_truthy(&flag));
    map.insert(ADDITIONAL_PROPERTIES.to_string(), Value::Bool(false));
    map.insert(REQUIRED.to_string(), Value::Bool(!optional));
}

// Declarations come from loosely typed files; anything but `null`/`false`
// marks the node optional.
fn is_truthy(flag: &Value) -> bool {
    !matches!(flag, Value::Null | Value::Bool(false))
}

/// Produce the draft 2020-12 equivalent of a strict schema.
///
/// Per-node `required: true` flags on property schemas become the parent's
/// `required` name array; boolean `required` keys are dropped everywhere else.
/// Nodes holding a `$ref` lose the injected `additionalProperties`.
/// The strict schema itself is left untouched.
pub fn lower(strict: &Value) -> Value {
    let mut lowered = strict.clone();
    lower_node(&mut lowered, true);
    lowered
}

fn lower_node(node: &mut Value, schema_position: bool) {
    match node {
        Value::Object(map) => {
            let required_names = if schema_position {
                required_property_names(map)
            } else {
                Vec::new()
            };

            for (key, child) in map.iter_mut() {
                lower_node(child, key != PROPERTIES);
            }

            if schema_position {
                if matches!(map.get(REQUIRED), Some(Value::Bool(_))) {
                    map.remove(REQUIRED);
                }
                // Siblings of `$ref` apply alongside it in 2020-12; the
                // referenced schema carries its own strictness.
                if map.contains_key(REF) {
                    map.remove(ADDITIONAL_PROPERTIES);
                }
                if !required_names.is_empty() {
                    map.insert(REQUIRED.to_string(), Value::Array(required_names));
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                lower_node(item, true);
            }
        }
        _ => {}
    }
}

fn required_property_names(map: &Map<String, Value>) -> Vec<Value> {
    let Some(Value::Object(properties)) = map.get(PROPERTIES) else {
        return Vec::new();
    };

    properties
        .iter()
        .filter(|(_, schema)| schema.get(REQUIRED) == Some(&Value::Bool(true)))
        .map(|(name, _)| Value::String(name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn strict(mut schema: Value) -> Value {
        strictify(&mut schema);
        schema
    }

    #[test]
    fn root_node_is_hardened() {
        let out = strict(json!({"type": "object"}));
        assert_eq!(out["additionalProperties"], json!(false));
        assert_eq!(out["required"], json!(true));
    }

    #[test]
    fn properties_wrapper_is_not_hardened() {
        let out = strict(json!({
            "type": "object",
            "properties": {
                "id": {"type": "string"}
            }
        }));

        let properties = out["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 1);
        assert!(!properties.contains_key("additionalProperties"));
        assert!(!properties.contains_key("required"));
    }

    #[test]
    fn property_schemas_default_to_required() {
        let out = strict(json!({
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "note": {"type": "string", "optional": true}
            }
        }));

        assert_eq!(out["properties"]["id"]["required"], json!(true));
        assert_eq!(out["properties"]["id"]["additionalProperties"], json!(false));
        assert_eq!(out["properties"]["note"]["required"], json!(false));
        assert!(out["properties"]["note"].get("optional").is_none());
    }

    #[test]
    fn explicit_optional_false_is_required() {
        let out = strict(json!({"type": "string", "optional": false}));
        assert_eq!(out["required"], json!(true));
        assert!(out.get("optional").is_none());
    }

    #[test]
    fn nesting_depth_does_not_stop_hardening() {
        let out = strict(json!({
            "type": "object",
            "properties": {
                "outer": {
                    "type": "object",
                    "properties": {
                        "inner": {
                            "type": "object",
                            "properties": {
                                "leaf": {"type": "integer", "optional": true}
                            }
                        }
                    }
                }
            }
        }));

        let inner = &out["properties"]["outer"]["properties"]["inner"];
        assert_eq!(inner["additionalProperties"], json!(false));
        assert_eq!(inner["required"], json!(true));
        assert!(inner["properties"].get("additionalProperties").is_none());
        assert_eq!(inner["properties"]["leaf"]["required"], json!(false));
    }

    #[test]
    fn sequence_elements_are_visited() {
        let out = strict(json!({
            "type": "array",
            "items": {"type": "object", "properties": {"a": {"type": "integer"}}},
            "anyOf": [{"type": "array"}, {"type": "null", "optional": true}]
        }));

        assert_eq!(out["items"]["additionalProperties"], json!(false));
        assert_eq!(out["items"]["properties"]["a"]["required"], json!(true));
        assert_eq!(out["anyOf"][0]["required"], json!(true));
        assert_eq!(out["anyOf"][1]["required"], json!(false));
    }

    #[test]
    fn author_additional_properties_is_overridden() {
        let out = strict(json!({"type": "object", "additionalProperties": true}));
        assert_eq!(out["additionalProperties"], json!(false));
    }

    #[test]
    fn truthy_optional_values_count_as_optional() {
        assert_eq!(strict(json!({"optional": "yes"}))["required"], json!(false));
        assert_eq!(strict(json!({"optional": null}))["required"], json!(true));
    }

    #[test]
    fn lower_collects_required_names() {
        let out = lower(&strict(json!({
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "note": {"type": "string", "optional": true}
            }
        })));

        assert_eq!(out["required"], json!(["id"]));
        assert!(out["properties"]["id"].get("required").is_none());
        assert!(out["properties"]["note"].get("required").is_none());
        assert_eq!(out["additionalProperties"], json!(false));
    }

    #[test]
    fn lower_omits_empty_required_list() {
        let out = lower(&strict(json!({
            "type": "object",
            "properties": {"note": {"type": "string", "optional": true}}
        })));

        assert!(out.get("required").is_none());
    }

    #[test]
    fn lower_keeps_property_named_required() {
        let out = lower(&strict(json!({
            "type": "object",
            "properties": {"required": {"type": "boolean"}}
        })));

        assert_eq!(out["required"], json!(["required"]));
        assert_eq!(out["properties"]["required"]["type"], json!("boolean"));
    }

    #[test]
    fn lower_drops_additional_properties_beside_ref() {
        let out = lower(&strict(json!({
            "type": "object",
            "$defs": {
                "addr": {"type": "object", "properties": {"city": {"type": "string"}}}
            },
            "properties": {"home": {"$ref": "#/$defs/addr"}}
        })));

        assert_eq!(out["required"], json!(["home"]));
        assert!(out["properties"]["home"].get("additionalProperties").is_none());
        assert_eq!(out["$defs"]["addr"]["additionalProperties"], json!(false));
        assert_eq!(out["$defs"]["addr"]["required"], json!(["city"]));
    }
}
