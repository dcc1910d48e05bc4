use crate::error::Result;
use crate::transforms::{Props, Transform};

/// Replaces every `bucket + key + bucket` placeholder with the rendered prop.
///
/// Props are applied one after the other over the whole text, so a value
/// that reintroduces a later placeholder gets substituted as well.
pub struct PropertySubstituter<'a> {
    bucket: &'a str,
    props: &'a Props,
}

impl<'a> PropertySubstituter<'a> {
    pub fn new(bucket: &'a str, props: &'a Props) -> Self {
        Self { bucket, props }
    }

    pub fn substitute(&self, code: &str) -> String {
        self.props.iter().fold(code.to_string(), |acc, (key, value)| {
            let placeholder = format!("{}{}{}", self.bucket, key, self.bucket);
            acc.replace(&placeholder, value)
        })
    }
}

impl Transform for PropertySubstituter<'_> {
    fn transform(&self, text: &str) -> Result<String> {
        Ok(self.substitute(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_replaces_all_occurrences() {
        let props = props(&[("id", "a")]);
        let substituter = PropertySubstituter::new("##", &props);
        assert_eq!(substituter.substitute("##id##-##id##"), "a-a");
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let props = props(&[("id", "a")]);
        let substituter = PropertySubstituter::new("##", &props);
        assert_eq!(substituter.substitute("##id## ##body##"), "a ##body##");
    }

    #[test]
    fn test_custom_bucket() {
        let props = props(&[("x", "1")]);
        let substituter = PropertySubstituter::new("%%", &props);
        assert_eq!(substituter.substitute("[%%x%%] ##x##"), "[1] ##x##");
    }

    #[test]
    fn test_earlier_value_reintroducing_later_placeholder() {
        let props = props(&[("a", "##b##"), ("b", "B")]);
        let substituter = PropertySubstituter::new("##", &props);
        assert_eq!(substituter.substitute("##a##"), "B");
    }

    #[test]
    fn test_later_value_reintroducing_earlier_placeholder() {
        let props = props(&[("a", "A"), ("b", "##a##")]);
        let substituter = PropertySubstituter::new("##", &props);
        assert_eq!(substituter.substitute("##b##"), "##a##");
    }
}
