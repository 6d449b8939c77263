use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

const SEPARATOR: char = '/';
const PARAM_MARKER: char = ':';
const PARAM_PATTERN: &str = "([^/]+)";

/// A route template such as `/widgets/:id`, compiled on first use.
///
/// `:name` segments match any non-empty run of characters other than `/`;
/// every other segment matches literally. Matches are anchored at both ends,
/// so prefixes and extra trailing segments never match.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    template: String,
    compiled: OnceLock<Option<CompiledRoute>>,
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    regex: Regex,
    param_names: Vec<String>,
}

impl RoutePattern {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            compiled: OnceLock::new(),
        }
    }

    /// The template this pattern was built from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Whether `path` matches the whole template.
    pub fn matches(&self, path: &str) -> bool {
        self.compiled()
            .is_some_and(|compiled| compiled.regex.is_match(path))
    }

    /// Values of the `:name` segments, or `None` when `path` does not match.
    pub fn params(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let compiled = self.compiled()?;
        let captures = compiled.regex.captures(path)?;

        let params = compiled
            .param_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                captures
                    .get(i + 1)
                    .map(|value| (name.clone(), value.as_str().to_string()))
            })
            .collect();
        Some(params)
    }

    fn compiled(&self) -> Option<&CompiledRoute> {
        self.compiled
            .get_or_init(|| compile_template(&self.template))
            .as_ref()
    }
}

fn compile_template(template: &str) -> Option<CompiledRoute> {
    let mut param_names = Vec::new();
    let segments: Vec<String> = template
        .split(SEPARATOR)
        .map(|segment| match segment.strip_prefix(PARAM_MARKER) {
            Some(name) => {
                param_names.push(name.to_string());
                PARAM_PATTERN.to_string()
            }
            None => regex::escape(segment),
        })
        .collect();

    let pattern = format!("^{}$", segments.join("/"));
    match Regex::new(&pattern) {
        Ok(regex) => Some(CompiledRoute { regex, param_names }),
        Err(err) => {
            warn!(template, error = %err, "route template failed to compile");
            None
        }
    }
}
