use std::cell::RefCell;

use regex::{Captures, Regex};

use crate::clock::{format_time, Clock};
use crate::constants::directive::{INVALID_DEF, INVALID_LINE, MAX_LINE_BREAKS};
use crate::constants::time::LOCALE_TIME_FORMAT;
use crate::context::Context;
use crate::error::Result;
use crate::transforms::{Miss, Props, Transform};
use crate::utils::{format_pattern, safe_time_format};

/// Builds the pattern matching `bucket + NAME (":" ARG)? + bucket` where NAME
/// is made of uppercase letters. The argument never spans lines.
pub fn directive_pattern(bucket: &str) -> Result<Regex> {
    let fence = regex::escape(bucket);
    Ok(Regex::new(&format!(r"{fence}([A-Z]+)(?::([^\n]*?))?{fence}"))?)
}

/// A meta directive token, parsed but not yet expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'t> {
    /// `LINE[:n]` emits |n| newlines (default 1)
    Line(Option<&'t str>),
    /// `DATE` current date
    Date,
    /// `TIME` current (bucketed) time
    Time,
    /// `GB:key` value of a global
    Global(Option<&'t str>),
    /// `REM` authoring comment, removed
    Remark,
    /// `DEF:prop,fallback` rendered prop or fallback
    Default(Option<&'t str>),
    /// Any other uppercase token, kept verbatim
    Unknown,
}

impl<'t> Directive<'t> {
    pub fn parse(name: &str, arg: Option<&'t str>) -> Self {
        match name {
            "LINE" => Directive::Line(arg),
            "DATE" => Directive::Date,
            "TIME" => Directive::Time,
            "GB" => Directive::Global(arg),
            "REM" => Directive::Remark,
            "DEF" => Directive::Default(arg),
            _ => Directive::Unknown,
        }
    }
}

/// Expands the meta directives of a template body in a single left to right
/// pass. Runs before the property substitution.
pub struct DirectiveExpander<'a> {
    pattern: &'a Regex,
    context: &'a Context,
    clock: &'a dyn Clock,
    props: &'a Props,
    misses: RefCell<Vec<Miss>>,
}

impl<'a> DirectiveExpander<'a> {
    /// Creates an expander.
    ///
    /// # Arguments
    /// * `pattern` - The directive pattern for the current bucket (see `directive_pattern`)
    /// * `context` - Globals and settings shared by the whole render
    /// * `clock` - Source of "now" for `DATE` and `TIME`
    /// * `props` - Already rendered props of the current component, read by `DEF`
    pub fn new(
        pattern: &'a Regex,
        context: &'a Context,
        clock: &'a dyn Clock,
        props: &'a Props,
    ) -> Self {
        Self {
            pattern,
            context,
            clock,
            props,
            misses: RefCell::new(Vec::new()),
        }
    }

    pub fn expand(&self, code: &str) -> String {
        self.pattern
            .replace_all(code, |caps: &Captures| {
                let token = caps.get(0).map_or("", |m| m.as_str());
                let name = caps.get(1).map_or("", |m| m.as_str());
                let arg = caps.get(2).map(|m| m.as_str());
                self.resolve(Directive::parse(name, arg), token)
            })
            .into_owned()
    }

    /// Lookup misses met while expanding
    pub fn into_misses(self) -> Vec<Miss> {
        self.misses.into_inner()
    }

    fn resolve(&self, directive: Directive<'_>, token: &str) -> String {
        match directive {
            Directive::Line(arg) => match arg.filter(|a| !a.is_empty()) {
                None => "\n".to_string(),
                Some(count) => match count.trim().parse::<i64>().map(i64::unsigned_abs) {
                    Ok(n) if n <= MAX_LINE_BREAKS => "\n".repeat(n as usize),
                    _ => INVALID_LINE.to_string(),
                },
            },
            Directive::Date => format_pattern(&self.clock.now(), self.context.date_format()),
            Directive::Time => match self.context.time_format() {
                Some((format, interval)) => format_time(self.clock, format, interval),
                None => safe_time_format(&self.clock.now(), LOCALE_TIME_FORMAT),
            },
            Directive::Global(None) => token.to_string(),
            Directive::Global(Some(key)) => match self.context.global(key) {
                Some(value) => value.to_string(),
                None => {
                    self.misses
                        .borrow_mut()
                        .push(Miss::UnknownGlobal(key.to_string()));
                    token.to_string()
                }
            },
            Directive::Remark => String::new(),
            Directive::Default(arg) => {
                let parts: Vec<&str> = arg.map(|a| a.split(',').collect()).unwrap_or_default();
                match parts.as_slice() {
                    [prop, fallback] => self
                        .props
                        .iter()
                        .find(|(key, _)| key == prop)
                        .map_or_else(|| fallback.to_string(), |(_, value)| value.clone()),
                    _ => INVALID_DEF.to_string(),
                }
            }
            Directive::Unknown => token.to_string(),
        }
    }
}

impl Transform for DirectiveExpander<'_> {
    fn transform(&self, text: &str) -> Result<String> {
        Ok(self.expand(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::constants::time::INVALID_INTERVAL;
    use chrono::NaiveDate;
    use serde_json::json;

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 1, 31)
                .unwrap()
                .and_hms_opt(10, 7, 42)
                .unwrap(),
        )
    }

    fn expand_with(code: &str, context: &Context, props: &Props) -> String {
        let pattern = directive_pattern("##").unwrap();
        let clock = clock();
        DirectiveExpander::new(&pattern, context, &clock, props).expand(code)
    }

    fn expand(code: &str) -> String {
        expand_with(code, &Context::default(), &[])
    }

    #[test]
    fn test_line() {
        assert_eq!(expand("a##LINE##b"), "a\nb");
        assert_eq!(expand("a##LINE:3##b"), "a\n\n\nb");
        assert_eq!(expand("a##LINE:-2##b"), "a\n\nb");
        assert_eq!(expand("a##LINE:0##b"), "ab");
        assert_eq!(expand("a##LINE:x##b"), format!("a{}b", INVALID_LINE));
    }

    #[test]
    fn test_line_count_is_bounded() {
        assert_eq!(expand("##LINE:1024##").len(), 1024);
        assert_eq!(expand("##LINE:1025##"), INVALID_LINE);
        assert_eq!(expand("##LINE:9223372036854775807##"), INVALID_LINE);
        assert_eq!(expand("##LINE:-9223372036854775808##"), INVALID_LINE);
        assert_eq!(expand("##LINE:99999999999999999999##"), INVALID_LINE);
    }

    #[test]
    fn test_remark_and_unknown() {
        assert_eq!(expand("x##REM##y##REM:note to self##z"), "xyz");
        assert_eq!(expand("##FOO## ##FOO:bar##"), "##FOO## ##FOO:bar##");
        assert_eq!(expand("##body## ##Line##"), "##body## ##Line##");
    }

    #[test]
    fn test_date_default_and_configured() {
        assert_eq!(expand("##DATE##"), "2024/01/31");
        let settings = json!({"date": {"format": "dd.MM.yyyy"}});
        let context = Context::build(None, Some(&settings)).unwrap();
        assert_eq!(expand_with("##DATE##", &context, &[]), "31.01.2024");
    }

    #[test]
    fn test_time() {
        assert_eq!(expand("##TIME##"), "10:07:42");
        let settings = json!({"time": {"format": "hh:mm", "interval": "15m"}});
        let context = Context::build(None, Some(&settings)).unwrap();
        assert_eq!(expand_with("##TIME##", &context, &[]), "10:00");
        let settings = json!({"time": {"interval": "bogus"}});
        let context = Context::build(None, Some(&settings)).unwrap();
        assert_eq!(expand_with("##TIME##", &context, &[]), INVALID_INTERVAL);
    }

    #[test]
    fn test_global_lookup() {
        let globals = json!({"site": "example.org"});
        let context = Context::build(Some(&globals), None).unwrap();
        let pattern = directive_pattern("##").unwrap();
        let clock = clock();
        let expander = DirectiveExpander::new(&pattern, &context, &clock, &[]);
        assert_eq!(
            expander.expand("##GB:site## ##GB:missing## ##GB##"),
            "example.org ##GB:missing## ##GB##"
        );
        assert_eq!(
            expander.into_misses(),
            vec![Miss::UnknownGlobal("missing".to_string())]
        );
    }

    #[test]
    fn test_def() {
        let props = vec![("title".to_string(), "Hello".to_string())];
        let context = Context::default();
        assert_eq!(expand_with("##DEF:title,Untitled##", &context, &props), "Hello");
        assert_eq!(expand_with("##DEF:other,Untitled##", &context, &props), "Untitled");
        assert_eq!(expand_with("##DEF:other,##", &context, &props), "");
        assert_eq!(expand_with("##DEF:title##", &context, &props), INVALID_DEF);
        assert_eq!(expand_with("##DEF:a,b,c##", &context, &props), INVALID_DEF);
        assert_eq!(expand_with("##DEF##", &context, &props), INVALID_DEF);
    }

    #[test]
    fn test_single_pass_does_not_rescan_output() {
        let globals = json!({"nl": "##LINE##"});
        let context = Context::build(Some(&globals), None).unwrap();
        assert_eq!(expand_with("##GB:nl##", &context, &[]), "##LINE##");
    }

    #[test]
    fn test_custom_bucket_is_escaped() {
        let pattern = directive_pattern("$(").unwrap();
        let clock = clock();
        let context = Context::default();
        let expander = DirectiveExpander::new(&pattern, &context, &clock, &[]);
        assert_eq!(expander.expand("a$(LINE:2$(b ##LINE##"), "a\n\nb ##LINE##");
    }
}
