//! YAML notation used to author the node tree.
//!
//! Parsing goes through `serde_yaml::Value` and is then converted into the
//! JSON value model used by the rest of the crate, so mapping keys that are
//! not strings (numbers, booleans) are turned into their text form.

use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::utils::first_line;

/// Parses YAML-like text into a structured value.
///
/// # Errors
///
/// Returns `StructuredTextError` holding the first line of the parser message.
///
/// # Examples
///
/// ```
/// use tmaker::structured_text::parse_structured_text;
///
/// let value = parse_structured_text("- $: text\n  id: a\n").unwrap();
/// assert_eq!(value[0]["$"], "text");
/// ```
pub fn parse_structured_text(text: &str) -> Result<Value> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)
        .map_err(|e| Error::StructuredTextError(first_line(&e.to_string()).to_string()))?;
    Ok(yaml_to_json(value))
}

/// Prints a structured value as YAML-like text.
pub fn print_structured_text(value: &Value) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| Error::StructuredTextError(e.to_string()))
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                if let Some(key) = key_to_string(key) {
                    map.insert(key, yaml_to_json(value));
                }
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_to_string(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Null => Some("null".to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
    }
}
