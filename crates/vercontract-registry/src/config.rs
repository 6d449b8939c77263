use vercontract_endpoint::EndpointConfig;

/// Controls how a registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    /// Options applied to every endpoint.
    pub endpoint: EndpointConfig,
    /// When true, an endpoint whose bundled examples do not validate is
    /// rejected at registration instead of being checked on demand.
    pub check_examples_on_build: bool,
}
