//! Parsers for non-body request parameters (path segments, query strings).
//!
//! Parsers are kept on a stack keyed by `(type, options)`: the most recently
//! registered parser that accepts a pair handles it, so applications can
//! override the built-ins without removing them.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Number, Value};

use crate::error::{RegistryError, Result};

const DEFAULT_SEPARATOR: &str = ",";

/// Converts a raw parameter string into a typed JSON value.
pub trait ParamParser: Send + Sync {
    /// Whether this parser handles parameters declared as `kind` with
    /// `options` (the parameter's schema node).
    fn accepts(&self, kind: &str, options: &Map<String, Value>) -> bool;

    /// Parse `raw`, or `None` when it is not a valid value. `parsers` is the
    /// full stack, for parsers of compound types.
    fn parse(
        &self,
        raw: &str,
        options: &Map<String, Value>,
        parsers: &ParamParsers,
    ) -> Option<Value>;
}

/// Stack of parameter parsers, most recent on top.
pub struct ParamParsers {
    parsers: Vec<Box<dyn ParamParser>>,
}

impl ParamParsers {
    /// A stack holding only the built-in parsers.
    pub fn new() -> Self {
        let mut parsers = Self::empty();
        parsers.register(StringParser);
        parsers.register(IntegerParser);
        parsers.register(NumberParser);
        parsers.register(BooleanParser);
        parsers.register(ArrayParser);
        parsers
    }

    /// A stack with no parsers at all.
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Push a parser; it takes precedence over everything registered before.
    pub fn register(&mut self, parser: impl ParamParser + 'static) {
        self.parsers.push(Box::new(parser));
    }

    /// Push a closure handling exactly `kind`, whatever the options.
    pub fn register_fn<F>(&mut self, kind: impl Into<String>, parse: F)
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.register(FnParser {
            kind: kind.into(),
            parse,
        });
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    fn find(&self, kind: &str, options: &Map<String, Value>) -> Option<&dyn ParamParser> {
        self.parsers
            .iter()
            .rev()
            .find(|parser| parser.accepts(kind, options))
            .map(|parser| parser.as_ref())
    }

    /// Parse parameter `name`, declared as `kind` with `options`.
    pub fn parse(
        &self,
        name: &str,
        kind: &str,
        options: &Map<String, Value>,
        raw: &str,
    ) -> Result<Value> {
        let parser = self
            .find(kind, options)
            .ok_or_else(|| RegistryError::UnknownParamType {
                name: name.to_string(),
                kind: kind.to_string(),
            })?;

        parser
            .parse(raw, options, self)
            .ok_or_else(|| RegistryError::InvalidParam {
                name: name.to_string(),
                kind: kind.to_string(),
                value: raw.to_string(),
            })
    }

    /// Turn raw string parameters into a JSON object shaped by `schema`.
    ///
    /// Each parameter declared under the schema's `properties` is parsed by
    /// its declared `type`; undeclared parameters are kept as strings so
    /// strict validation can reject them.
    pub fn coerce(&self, schema: &Value, raw: &BTreeMap<String, String>) -> Result<Value> {
        let properties = schema.get("properties").and_then(Value::as_object);

        let mut out = Map::new();
        for (name, value) in raw {
            let declared = properties
                .and_then(|properties| properties.get(name))
                .and_then(Value::as_object);
            let coerced = match declared {
                Some(options) => self.parse(name, declared_type(options), options, value)?,
                None => Value::String(value.clone()),
            };
            out.insert(name.clone(), coerced);
        }
        Ok(Value::Object(out))
    }
}

impl Default for ParamParsers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParamParsers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamParsers")
            .field("parsers", &self.parsers.len())
            .finish()
    }
}

/// The first non-null entry of a schema node's `type`, `string` if absent.
fn declared_type(options: &Map<String, Value>) -> &str {
    match options.get("type") {
        Some(Value::String(kind)) => kind.as_str(),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .find(|kind| *kind != "null")
            .unwrap_or("string"),
        _ => "string",
    }
}

struct StringParser;

impl ParamParser for StringParser {
    fn accepts(&self, kind: &str, _options: &Map<String, Value>) -> bool {
        kind == "string"
    }

    fn parse(&self, raw: &str, _: &Map<String, Value>, _: &ParamParsers) -> Option<Value> {
        Some(Value::String(raw.to_string()))
    }
}

struct IntegerParser;

impl ParamParser for IntegerParser {
    fn accepts(&self, kind: &str, _options: &Map<String, Value>) -> bool {
        kind == "integer"
    }

    fn parse(&self, raw: &str, _: &Map<String, Value>, _: &ParamParsers) -> Option<Value> {
        raw.trim().parse::<i64>().ok().map(Value::from)
    }
}

struct NumberParser;

impl ParamParser for NumberParser {
    fn accepts(&self, kind: &str, _options: &Map<String, Value>) -> bool {
        kind == "number"
    }

    fn parse(&self, raw: &str, _: &Map<String, Value>, _: &ParamParsers) -> Option<Value> {
        let raw = raw.trim();
        if let Ok(int) = raw.parse::<i64>() {
            return Some(Value::from(int));
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
    }
}

struct BooleanParser;

impl ParamParser for BooleanParser {
    fn accepts(&self, kind: &str, _options: &Map<String, Value>) -> bool {
        kind == "boolean"
    }

    fn parse(&self, raw: &str, _: &Map<String, Value>, _: &ParamParsers) -> Option<Value> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        }
    }
}

/// Splits on the `separator` option (default `,`) and parses each element by
/// the type declared under `items`.
struct ArrayParser;

impl ParamParser for ArrayParser {
    fn accepts(&self, kind: &str, _options: &Map<String, Value>) -> bool {
        kind == "array"
    }

    fn parse(
        &self,
        raw: &str,
        options: &Map<String, Value>,
        parsers: &ParamParsers,
    ) -> Option<Value> {
        if raw.is_empty() {
            return Some(Value::Array(Vec::new()));
        }

        let separator = options
            .get("separator")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SEPARATOR);
        let empty = Map::new();
        let items = options
            .get("items")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        let kind = declared_type(items);
        let parser = parsers.find(kind, items)?;

        raw.split(separator)
            .map(|element| parser.parse(element, items, parsers))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array)
    }
}

struct FnParser<F> {
    kind: String,
    parse: F,
}

impl<F> ParamParser for FnParser<F>
where
    F: Fn(&str) -> Option<Value> + Send + Sync,
{
    fn accepts(&self, kind: &str, _options: &Map<String, Value>) -> bool {
        kind == self.kind
    }

    fn parse(&self, raw: &str, _: &Map<String, Value>, _: &ParamParsers) -> Option<Value> {
        (self.parse)(raw)
    }
}
