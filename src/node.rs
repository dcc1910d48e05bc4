//! Node tree of a document.
//!
//! The authored `custom` value is a loosely typed structure (sequences,
//! mappings and scalars). It is classified here into explicit variants so the
//! renderer never has to inspect raw mappings.

use serde_json::{Map, Number, Value};

use crate::constants::keys;
use crate::context::Context;
use crate::error::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

/// A mapping naming a template through `$`, plus its props in authoring order
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub props: Vec<(String, Node)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    List(Vec<Node>),
    Component(Component),
    /// A mapping without a usable `$` key. Renders to nothing.
    Record,
}

impl Scalar {
    /// String form of the scalar. Integral floats print without a fraction.
    pub fn render(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => number_to_string(n),
            Scalar::Text(s) => s.clone(),
        }
    }
}

fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
            format!("{:.0}", f)
        }
        _ => n.to_string(),
    }
}

/// Template name carried by a `$` value, if it names one at all.
/// Empty strings, `null`, `false` and zero do not.
fn component_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()) => {
            Some(number_to_string(n))
        }
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

impl Node {
    /// Classifies a raw value recursively.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use tmaker::node::Node;
    ///
    /// let node = Node::from_value(&json!({"$": "text", "id": "a"}));
    /// assert!(matches!(node, Node::Component(ref c) if c.name == "text" && c.props.len() == 1));
    /// ```
    pub fn from_value(value: &Value) -> Node {
        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n.clone())),
            Value::String(s) => Node::Scalar(Scalar::Text(s.clone())),
            Value::Array(items) => Node::List(items.iter().map(Node::from_value).collect()),
            Value::Object(map) => Self::from_mapping(map),
        }
    }

    fn from_mapping(map: &Map<String, Value>) -> Node {
        match map.get(keys::COMPONENT).and_then(component_name) {
            Some(name) => Node::Component(Component {
                name,
                props: map
                    .iter()
                    .filter(|(key, _)| key.as_str() != keys::COMPONENT)
                    .map(|(key, value)| (key.clone(), Node::from_value(value)))
                    .collect(),
            }),
            None => Node::Record,
        }
    }

    /// Whether the node is a plain string scalar
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Text(_)))
    }
}

/// A classified top-level sequence: the render context and the components
/// to render, in sequence order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub context: Context,
    pub nodes: Vec<Node>,
}

impl Document {
    /// Classifies the authored top-level sequence.
    ///
    /// The first element carrying `$globals` supplies the globals table and
    /// the first carrying `$settings` the settings. Those marker elements are
    /// never rendered, nor is any element without a `$` key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCustom` when the value is not a sequence and
    /// `InvalidSettings` when the settings have the wrong shape.
    pub fn classify(custom: &Value) -> Result<Document> {
        let items = custom.as_array().ok_or(Error::InvalidCustom)?;

        let globals = items
            .iter()
            .find_map(|item| item.as_object()?.get(keys::GLOBALS));
        let settings = items
            .iter()
            .find_map(|item| item.as_object()?.get(keys::SETTINGS));
        let context = Context::build(globals, settings)?;

        let nodes = items
            .iter()
            .filter_map(Value::as_object)
            .filter(|map| {
                map.contains_key(keys::COMPONENT)
                    && !map.contains_key(keys::GLOBALS)
                    && !map.contains_key(keys::SETTINGS)
            })
            .map(Node::from_mapping)
            .collect();

        Ok(Document { context, nodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(Scalar::Null.render(), "null");
        assert_eq!(Scalar::Bool(false).render(), "false");
        assert_eq!(Node::from_value(&json!(3)), Node::Scalar(Scalar::Number(3.into())));
        assert_eq!(number_to_string(&Number::from_f64(2.0).unwrap()), "2");
        assert_eq!(number_to_string(&Number::from_f64(2.5).unwrap()), "2.5");
        assert_eq!(number_to_string(&Number::from(-7)), "-7");
    }

    #[test]
    fn test_props_keep_authoring_order() {
        let node = Node::from_value(&json!({"$": "card", "zeta": 1, "alpha": 2, "mid": 3}));
        match node {
            Node::Component(component) => {
                let keys: Vec<_> = component.props.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
            }
            other => panic!("expected component, got {:?}", other),
        }
    }

    #[test]
    fn test_falsy_component_names() {
        assert_eq!(Node::from_value(&json!({"$": ""})), Node::Record);
        assert_eq!(Node::from_value(&json!({"$": null})), Node::Record);
        assert_eq!(Node::from_value(&json!({"$": 0})), Node::Record);
        assert_eq!(Node::from_value(&json!({"id": "x"})), Node::Record);
        assert!(matches!(Node::from_value(&json!({"$": 12})), Node::Component(c) if c.name == "12"));
    }

    #[test]
    fn test_classify_requires_sequence() {
        assert!(matches!(Document::classify(&json!({"$": "text"})), Err(Error::InvalidCustom)));
        assert!(matches!(Document::classify(&json!("")), Err(Error::InvalidCustom)));
    }

    #[test]
    fn test_classify_markers() {
        let custom = json!([
            "loose text",
            {"$globals": {"site": "first"}},
            {"$": "text", "id": "a"},
            {"$globals": {"site": "second"}},
            {"$settings": {"date": {"format": "dd"}}},
            {"$": "text", "$globals": {"site": "ignored"}},
            {"id": "no component"},
            {"$": "text", "id": "b"}
        ]);
        let document = Document::classify(&custom).unwrap();
        assert_eq!(document.context.global("site"), Some("first"));
        assert_eq!(document.context.date_format(), "dd");
        assert_eq!(document.nodes.len(), 2);
    }
}
