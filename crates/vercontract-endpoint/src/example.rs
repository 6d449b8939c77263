use serde_json::Value;
use vercontract_schema::ValidationFailure;

use crate::definition::EndpointDefinition;

/// A documented payload bundled with a definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    data: Value,
}

impl Example {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// An example together with the definition that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ExampleRef<'a> {
    definition: &'a EndpointDefinition,
    index: usize,
    example: &'a Example,
}

impl<'a> ExampleRef<'a> {
    pub(crate) fn new(
        definition: &'a EndpointDefinition,
        index: usize,
        example: &'a Example,
    ) -> Self {
        Self {
            definition,
            index,
            example,
        }
    }

    /// Position within the definition's examples.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn data(&self) -> &'a Value {
        self.example.data()
    }

    pub fn definition(&self) -> &'a EndpointDefinition {
        self.definition
    }

    /// Validate the example against its definition's current schema.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        self.definition.validate(self.example.data())
    }
}
