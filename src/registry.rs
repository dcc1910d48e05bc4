use serde::{Deserialize, Serialize};

/// A named template. `code` holds free text with `bucket + KEY + bucket`
/// placeholders and meta directive tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDef {
    pub name: String,
    pub code: String,
}

impl TemplateDef {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, code: C) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Ordered view over the templates of a document.
///
/// The registry borrows the templates and keeps no derived state, so it is
/// simply rebuilt from the document for every render.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRegistry<'a> {
    templates: &'a [TemplateDef],
}

impl<'a> TemplateRegistry<'a> {
    pub fn new(templates: &'a [TemplateDef]) -> Self {
        Self { templates }
    }

    /// Replaces the registered templates wholesale
    pub fn register(&mut self, templates: &'a [TemplateDef]) {
        self.templates = templates;
    }

    /// Finds a template by exact name. The first match wins when names repeat.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmaker::registry::{TemplateDef, TemplateRegistry};
    ///
    /// let templates = vec![TemplateDef::new("text", "a"), TemplateDef::new("text", "b")];
    /// let registry = TemplateRegistry::new(&templates);
    /// assert_eq!(registry.find("text").map(|t| t.code.as_str()), Some("a"));
    /// assert!(registry.find("Text").is_none());
    /// ```
    pub fn find(&self, name: &str) -> Option<&'a TemplateDef> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Template names in display order
    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.templates.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
