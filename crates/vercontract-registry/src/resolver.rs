//! Strategies injected by the embedding application.

use vercontract_endpoint::EndpointDefinition;

/// Maps a request/response context to the version string to look up.
///
/// The context type is opaque to the registry: headers, a session, a parsed
/// URL, whatever the host framework carries.
pub trait VersionResolver<C: ?Sized>: Send + Sync {
    fn resolve_version(&self, context: &C) -> String;
}

/// A resolver that always answers the same version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticVersion(String);

impl StaticVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn version(&self) -> &str {
        &self.0
    }
}

impl<C: ?Sized> VersionResolver<C> for StaticVersion {
    fn resolve_version(&self, _context: &C) -> String {
        self.0.clone()
    }
}

impl<C: ?Sized, F> VersionResolver<C> for F
where
    F: Fn(&C) -> String + Send + Sync,
{
    fn resolve_version(&self, context: &C) -> String {
        self(context)
    }
}

/// Decides whether a definition applies to a response status code.
pub trait StatusApplicability: Send + Sync {
    fn applies(&self, definition: &EndpointDefinition, status: u16) -> bool;
}

/// Uses the status codes declared on each definition; definitions without a
/// declared set apply to every status.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredStatuses;

impl StatusApplicability for DeclaredStatuses {
    fn applies(&self, definition: &EndpointDefinition, status: u16) -> bool {
        definition.applies_to_status(status)
    }
}

impl<F> StatusApplicability for F
where
    F: Fn(&EndpointDefinition, u16) -> bool + Send + Sync,
{
    fn applies(&self, definition: &EndpointDefinition, status: u16) -> bool {
        self(definition, status)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn static_version_ignores_context() {
        let resolver = StaticVersion::new("2");
        assert_eq!(VersionResolver::<str>::resolve_version(&resolver, "anything"), "2");
        assert_eq!(resolver.version(), "2");
    }

    #[test]
    fn closures_resolve_from_context() {
        let resolver = |headers: &HashMap<String, String>| {
            headers
                .get("accept-version")
                .cloned()
                .unwrap_or_else(|| "1".to_string())
        };

        let mut headers = HashMap::new();
        assert_eq!(resolver.resolve_version(&headers), "1");
        headers.insert("accept-version".to_string(), "3".to_string());
        assert_eq!(resolver.resolve_version(&headers), "3");
    }
}
