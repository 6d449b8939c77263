/// Controls how strict schemas are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaConfig {
    /// When true, `format` keywords (e.g. `date-time`, `email`) are asserted
    /// instead of treated as annotations.
    pub validate_formats: bool,
}
