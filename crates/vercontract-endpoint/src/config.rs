use vercontract_schema::SchemaConfig;

/// Controls how endpoints are built from declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndpointConfig {
    /// Options forwarded to schema compilation.
    pub schema: SchemaConfig,
    /// When true, declaring the same version twice for one message kind is a
    /// configuration error. Otherwise the later declaration wins.
    pub fail_on_duplicate_version: bool,
}
