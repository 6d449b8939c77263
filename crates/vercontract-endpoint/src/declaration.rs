//! Structured endpoint declarations, as handed over by a declaration loader.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EndpointError, Result};
use crate::kind::MessageKind;

/// One endpoint as declared by a contract author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDeclaration {
    pub name: String,
    /// Path template with `:param` placeholders.
    pub route: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub request: Vec<DefinitionDeclaration>,
    #[serde(default)]
    pub response: Vec<DefinitionDeclaration>,
}

/// One schema shared by one or more versions of a request or response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionDeclaration {
    pub versions: Vec<String>,
    /// Author-form schema using `optional` flags. Absent reads as `null`,
    /// which `check_required_fields` rejects.
    #[serde(default)]
    pub schema: Value,
    #[serde(default)]
    pub examples: Vec<Value>,
    /// HTTP status codes this definition applies to. Absent means any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<u16>>,
}

impl EndpointDeclaration {
    /// Deserialize a declaration from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Definitions declared for one message kind, in declaration order.
    pub fn definitions(&self, kind: MessageKind) -> &[DefinitionDeclaration] {
        match kind {
            MessageKind::Request => &self.request,
            MessageKind::Response => &self.response,
        }
    }

    /// Reject declarations with empty mandatory fields.
    pub fn check_required_fields(&self) -> Result<()> {
        let endpoint = if self.name.trim().is_empty() {
            "<unnamed>".to_string()
        } else {
            self.name.clone()
        };
        let missing = |field| EndpointError::MissingField {
            endpoint: endpoint.clone(),
            field,
        };

        if self.name.trim().is_empty() {
            return Err(missing("name"));
        }
        if self.route.trim().is_empty() {
            return Err(missing("route"));
        }
        if self.method.trim().is_empty() {
            return Err(missing("method"));
        }

        for definition in self.request.iter().chain(self.response.iter()) {
            if definition.versions.is_empty()
                || definition.versions.iter().any(|v| v.trim().is_empty())
            {
                return Err(missing("versions"));
            }
            if definition.schema.is_null() {
                return Err(missing("schema"));
            }
        }

        Ok(())
    }
}
