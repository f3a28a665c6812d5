use serde_json::{Map, Value};

use super::error::NormalizeError;

/// Maximum number of line items accepted in a single draft.
pub const MAX_LINE_ITEMS: usize = 10_000;

/// The untyped record produced by the LLM stage.
///
/// Only the outer shape is checked on construction: the root must be a JSON
/// object and `positionen`, when present, must be an array of objects.
/// Everything else is interpreted later by the stage that needs it.
#[derive(Debug, Clone)]
pub struct Draft {
    root: Map<String, Value>,
}

impl Draft {
    pub fn from_value(value: Value) -> Result<Self, NormalizeError> {
        let root = match value {
            Value::Object(map) => map,
            other => {
                return Err(NormalizeError::shape("$", "object", json_type_name(&other)));
            }
        };

        match root.get("positionen") {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                if items.len() > MAX_LINE_ITEMS {
                    return Err(NormalizeError::TooManyLines {
                        count: items.len(),
                        max: MAX_LINE_ITEMS,
                    });
                }
                for (i, item) in items.iter().enumerate() {
                    if !item.is_object() {
                        return Err(NormalizeError::shape(
                            format!("positionen[{i}]"),
                            "object",
                            json_type_name(item),
                        ));
                    }
                }
            }
            Some(other) => {
                return Err(NormalizeError::shape(
                    "positionen",
                    "array",
                    json_type_name(other),
                ));
            }
        }

        Ok(Self { root })
    }

    /// Top-level field by draft name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// The line items in draft order; empty when `positionen` is absent.
    pub fn line_items(&self) -> &[Value] {
        match self.root.get("positionen") {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// `dokument.rechnungsart` as given, with `null` treated as absent.
    pub fn invoice_type(&self) -> Option<&Value> {
        self.root
            .get("dokument")
            .and_then(|d| d.get("rechnungsart"))
            .filter(|v| !v.is_null())
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.root
    }
}

/// Short JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
