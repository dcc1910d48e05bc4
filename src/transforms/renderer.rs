use std::cell::RefCell;

use regex::Regex;
use serde_json::Value;

use crate::clock::Clock;
use crate::constants::state::DEFAULT_BUCKET;
use crate::context::Context;
use crate::error::*;
use crate::node::{Component, Document, Node};
use crate::registry::{TemplateDef, TemplateRegistry};
use crate::transforms::{
    directive_pattern, process, DirectiveExpander, PropertySubstituter, Transform,
};

/// A lookup that silently rendered nothing (or the raw token)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Miss {
    /// A component named a template that does not exist. Rendered empty.
    UnknownTemplate(String),
    /// `GB:key` named a missing global. The token was kept verbatim.
    UnknownGlobal(String),
}

/// Output of a successful render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub output: String,
    pub misses: Vec<Miss>,
}

/// Renders node trees against a template registry.
///
/// Rendering is a pure function of the registry, the bucket, the context and
/// the clock. Lookup misses are collected but never fail the render.
pub struct NodeRenderer<'a> {
    registry: TemplateRegistry<'a>,
    bucket: &'a str,
    context: &'a Context,
    clock: &'a dyn Clock,
    pattern: Regex,
    misses: RefCell<Vec<Miss>>,
}

impl<'a> NodeRenderer<'a> {
    /// Creates a renderer. An empty bucket falls back to `##`.
    pub fn new(
        registry: TemplateRegistry<'a>,
        bucket: &'a str,
        context: &'a Context,
        clock: &'a dyn Clock,
    ) -> Result<Self> {
        let bucket = if bucket.is_empty() {
            DEFAULT_BUCKET
        } else {
            bucket
        };
        Ok(Self {
            registry,
            bucket,
            context,
            clock,
            pattern: directive_pattern(bucket)?,
            misses: RefCell::new(Vec::new()),
        })
    }

    /// Renders a node
    ///
    /// - scalars render to their string form
    /// - lists made only of strings are joined with newlines, other lists
    ///   are concatenated
    /// - components render their template (empty when the template is missing)
    pub fn render(&self, node: &Node) -> Result<String> {
        match node {
            Node::Scalar(scalar) => Ok(scalar.render()),
            Node::List(items) if items.iter().all(Node::is_text) => Ok(items
                .iter()
                .map(|item| self.render(item))
                .collect::<Result<Vec<_>>>()?
                .join("\n")),
            Node::List(items) => items.iter().map(|item| self.render(item)).collect(),
            Node::Component(component) => self.render_component(component),
            Node::Record => Ok(String::new()),
        }
    }

    fn render_component(&self, component: &Component) -> Result<String> {
        let Some(template) = self.registry.find(&component.name) else {
            crate::debug!("Template \"{}\" not found, rendering empty", component.name);
            self.misses
                .borrow_mut()
                .push(Miss::UnknownTemplate(component.name.clone()));
            return Ok(String::new());
        };

        let props = component
            .props
            .iter()
            .map(|(key, value)| Ok((key.clone(), self.render(value)?)))
            .collect::<Result<Vec<_>>>()?;

        let expander = DirectiveExpander::new(&self.pattern, self.context, self.clock, &props);
        let substituter = PropertySubstituter::new(self.bucket, &props);
        let output = process(&[&expander as &dyn Transform, &substituter], &template.code)?;

        self.misses.borrow_mut().extend(expander.into_misses());
        Ok(output)
    }

    /// Lookup misses met so far
    pub fn into_misses(self) -> Vec<Miss> {
        self.misses.into_inner()
    }
}

/// Renders an authored top-level sequence into the final text.
///
/// The `$globals` and `$settings` markers build the context, then every
/// top-level component is rendered in sequence order and concatenated.
///
/// # Errors
///
/// Any failure is reported as a single `RenderError`, without partial output.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tmaker::clock::SystemClock;
/// use tmaker::registry::TemplateDef;
/// use tmaker::transforms::render_document;
///
/// let templates = vec![TemplateDef::new("text", "<div id=\"##id##\">##body##</div>")];
/// let custom = json!([{"$": "text", "id": "a", "body": "hi"}]);
/// let rendered = render_document(&custom, &templates, "##", &SystemClock).unwrap();
/// assert_eq!(rendered.output, "<div id=\"a\">hi</div>");
/// ```
pub fn render_document(
    custom: &Value,
    templates: &[TemplateDef],
    bucket: &str,
    clock: &dyn Clock,
) -> Result<Rendered> {
    render_classified(custom, templates, bucket, clock).map_err(|e| {
        crate::debug!("Render failed: {}", e);
        match e {
            Error::RenderError(_) => e,
            other => Error::RenderError(other.to_string()),
        }
    })
}

fn render_classified(
    custom: &Value,
    templates: &[TemplateDef],
    bucket: &str,
    clock: &dyn Clock,
) -> Result<Rendered> {
    let document = Document::classify(custom)?;
    let renderer = NodeRenderer::new(
        TemplateRegistry::new(templates),
        bucket,
        &document.context,
        clock,
    )?;

    let output = document
        .nodes
        .iter()
        .map(|node| renderer.render(node))
        .collect::<Result<String>>()?;

    Ok(Rendered {
        output,
        misses: renderer.into_misses(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use serde_json::json;

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2025, 12, 24)
                .unwrap()
                .and_hms_opt(18, 44, 9)
                .unwrap(),
        )
    }

    fn render(custom: Value, templates: &[TemplateDef]) -> Rendered {
        render_document(&custom, templates, "##", &clock()).unwrap()
    }

    fn text_template() -> Vec<TemplateDef> {
        vec![TemplateDef::new("text", "<div id=\"##id##\">##body##</div>")]
    }

    #[test]
    fn test_end_to_end_component() {
        let rendered = render(
            json!([{"$": "text", "id": "a", "body": "hi"}]),
            &text_template(),
        );
        assert_eq!(rendered.output, "<div id=\"a\">hi</div>");
        assert!(rendered.misses.is_empty());
    }

    #[test]
    fn test_nested_components() {
        let rendered = render(
            json!([{"$": "text", "id": "outer", "body": [
                {"$": "text", "id": "x", "body": "1"},
                {"$": "text", "id": "y", "body": "2"}
            ]}]),
            &text_template(),
        );
        assert_eq!(
            rendered.output,
            "<div id=\"outer\"><div id=\"x\">1</div><div id=\"y\">2</div></div>"
        );
    }

    #[test]
    fn test_string_list_prop_joins_with_newline() {
        let rendered = render(
            json!([{"$": "text", "id": "l", "body": ["a", "b"]}]),
            &text_template(),
        );
        assert_eq!(rendered.output, "<div id=\"l\">a\nb</div>");
    }

    #[test]
    fn test_mixed_list_concatenates() {
        let templates = text_template();
        let context = Context::default();
        let clock = clock();
        let renderer =
            NodeRenderer::new(TemplateRegistry::new(&templates), "##", &context, &clock).unwrap();
        let list = Node::from_value(&json!(["a", 1, "b", null, true]));
        assert_eq!(renderer.render(&list).unwrap(), "a1bnulltrue");
        let strings = Node::from_value(&json!(["a", "b"]));
        assert_eq!(renderer.render(&strings).unwrap(), "a\nb");
        assert_eq!(renderer.render(&Node::from_value(&json!([]))).unwrap(), "");
    }

    #[test]
    fn test_missing_template_renders_empty() {
        let rendered = render(json!([{"$": "missing"}]), &text_template());
        assert_eq!(rendered.output, "");
        assert_eq!(
            rendered.misses,
            vec![Miss::UnknownTemplate("missing".to_string())]
        );
    }

    #[test]
    fn test_top_level_skips_non_components() {
        let rendered = render(
            json!([
                "loose",
                ["a", "b"],
                {"$globals": {"who": "me"}},
                {"$": "text", "id": "1", "body": "##GB:who##"},
                {"body": "no template"}
            ]),
            &text_template(),
        );
        // The prop value is substituted after directives ran, so the token stays.
        assert_eq!(rendered.output, "<div id=\"1\">##GB:who##</div>");
    }

    #[test]
    fn test_directives_and_globals_in_template() {
        let templates = vec![TemplateDef::new(
            "card",
            "##REM:card##[##GB:who##]##LINE:2####DEF:title,none##|##title##",
        )];
        let rendered = render(
            json!([
                {"$globals": {"who": "me"}},
                {"$": "card", "title": "T"},
                {"$": "card"}
            ]),
            &templates,
        );
        assert_eq!(rendered.output, "[me]\n\nT|T[me]\n\nnone|##title##");
    }

    #[test]
    fn test_def_reads_rendered_props_only() {
        let templates = vec![
            TemplateDef::new("outer", "##inner##"),
            TemplateDef::new("inner", "##DEF:label,fallback##"),
        ];
        let rendered = render(
            json!([{"$": "outer", "label": "outer label", "inner": {"$": "inner"}}]),
            &templates,
        );
        assert_eq!(rendered.output, "fallback");
    }

    #[test]
    fn test_settings_drive_date_and_time() {
        let templates = vec![TemplateDef::new("stamp", "##DATE## ##TIME##")];
        let rendered = render(
            json!([
                {"$settings": {"date": {"format": "yyyy-MM-dd"}, "time": {"format": "hh:mm", "interval": "15m"}}},
                {"$": "stamp"}
            ]),
            &templates,
        );
        assert_eq!(rendered.output, "2025-12-24 18:30");
    }

    #[test]
    fn test_render_is_deterministic_with_fixed_clock() {
        let templates = vec![TemplateDef::new("stamp", "##DATE## ##TIME## ##x##")];
        let custom = json!([{"$": "stamp", "x": [1, {"$": "stamp", "x": "y"}]}]);
        assert_eq!(render(custom.clone(), &templates), render(custom, &templates));
    }

    #[test]
    fn test_empty_bucket_falls_back() {
        let custom = json!([{"$": "text", "id": "a", "body": "b"}]);
        let rendered = render_document(&custom, &text_template(), "", &clock()).unwrap();
        assert_eq!(rendered.output, "<div id=\"a\">b</div>");
    }

    #[test]
    fn test_huge_line_count_renders_diagnostic() {
        let templates = vec![TemplateDef::new("t", "a##LINE:9223372036854775807##b")];
        let rendered = render(json!([{"$": "t"}]), &templates);
        assert_eq!(
            rendered.output,
            format!("a{}b", crate::constants::directive::INVALID_LINE)
        );
    }

    #[test]
    fn test_structural_failure_is_reported() {
        let result = render_document(&json!({"$": "text"}), &text_template(), "##", &clock());
        assert!(matches!(result, Err(Error::RenderError(_))));
        let result = render_document(
            &json!([{"$settings": {"time": "soon"}}]),
            &text_template(),
            "##",
            &clock(),
        );
        assert!(matches!(result, Err(Error::RenderError(_))));
    }
}
