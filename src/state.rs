//! Application state: the delimiter, the template library and the authored
//! node tree.
//!
//! The shell owns the single `AppState` and is the only place where it is
//! mutated. Rendering and encoding borrow it.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::Clock;
use crate::constants::example::DEFAULT_CUSTOM;
use crate::constants::state::DEFAULT_BUCKET;
use crate::error::*;
use crate::registry::{TemplateDef, TemplateRegistry};
use crate::structured_text::{parse_structured_text, print_structured_text};
use crate::transforms::{render_document, Rendered};

/// The authored node tree, or nothing yet.
///
/// Serialized as `""` when empty and as the sequence itself otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCustom", into = "RawCustom")]
pub enum Custom {
    #[default]
    Empty,
    Tree(Vec<Value>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCustom {
    Text(String),
    Tree(Vec<Value>),
}

impl TryFrom<RawCustom> for Custom {
    type Error = String;

    fn try_from(raw: RawCustom) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawCustom::Text(text) if text.is_empty() => Ok(Custom::Empty),
            RawCustom::Text(_) => Err("custom must be \"\" or a sequence".to_string()),
            RawCustom::Tree(items) => Ok(Custom::Tree(items)),
        }
    }
}

impl From<Custom> for RawCustom {
    fn from(custom: Custom) -> Self {
        match custom {
            Custom::Empty => RawCustom::Text(String::new()),
            Custom::Tree(items) => RawCustom::Tree(items),
        }
    }
}

impl Custom {
    /// Parses authored YAML-like text. Empty text means no content.
    ///
    /// # Errors
    ///
    /// `StructuredTextError` when the text does not parse, `InvalidCustom`
    /// when it parses to anything but a sequence.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Custom::Empty);
        }
        match parse_structured_text(text)? {
            Value::Array(items) => Ok(Custom::Tree(items)),
            _ => Err(Error::InvalidCustom),
        }
    }

    /// Prints the tree back as YAML-like text (`""` when empty)
    pub fn to_text(&self) -> Result<String> {
        match self {
            Custom::Empty => Ok(String::new()),
            Custom::Tree(items) => print_structured_text(&Value::Array(items.clone())),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Custom::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub bucket: String,
    pub templates: Vec<TemplateDef>,
    pub custom: Custom,
}

impl Default for AppState {
    /// A new document: default bucket, one empty template, no custom content
    fn default() -> Self {
        AppState::with_bucket(DEFAULT_BUCKET)
    }
}

impl AppState {
    pub fn with_bucket<S: Into<String>>(bucket: S) -> Self {
        AppState {
            bucket: bucket.into(),
            templates: vec![TemplateDef::default()],
            custom: Custom::Empty,
        }
    }

    /// The delimiter to render with, never empty
    pub fn bucket(&self) -> &str {
        if self.bucket.is_empty() {
            DEFAULT_BUCKET
        } else {
            &self.bucket
        }
    }

    pub fn set_bucket<S: Into<String>>(&mut self, bucket: S) {
        self.bucket = bucket.into();
    }

    pub fn registry(&self) -> TemplateRegistry<'_> {
        TemplateRegistry::new(&self.templates)
    }

    pub fn add_template(&mut self, template: TemplateDef) {
        self.templates.push(template);
    }

    /// Removes the last template, if any
    pub fn remove_last_template(&mut self) -> Option<TemplateDef> {
        self.templates.pop()
    }

    /// Replaces the custom tree from authored text.
    ///
    /// On failure the custom content is cleared and the error returned, the
    /// rest of the state is left untouched.
    pub fn set_custom_text(&mut self, text: &str) -> Result<()> {
        match Custom::parse(text) {
            Ok(custom) => {
                self.custom = custom;
                Ok(())
            }
            Err(e) => {
                self.custom = Custom::Empty;
                Err(e)
            }
        }
    }

    pub fn custom_text(&self) -> Result<String> {
        self.custom.to_text()
    }

    /// The tree to preview: the custom tree, or the built-in example while
    /// there is no custom content yet
    pub fn preview_tree(&self) -> Result<Cow<'_, [Value]>> {
        match &self.custom {
            Custom::Tree(items) => Ok(Cow::Borrowed(items.as_slice())),
            Custom::Empty => match Custom::parse(DEFAULT_CUSTOM)? {
                Custom::Tree(items) => Ok(Cow::Owned(items)),
                Custom::Empty => Ok(Cow::Owned(Vec::new())),
            },
        }
    }

    /// Renders the preview tree
    pub fn render(&self, clock: &dyn Clock) -> Result<Rendered> {
        let tree = Value::Array(self.preview_tree()?.into_owned());
        render_document(&tree, &self.templates, self.bucket(), clock)
    }
}
