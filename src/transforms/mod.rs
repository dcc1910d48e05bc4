use crate::error::Result;

mod directive;
mod renderer;
mod substitution;

pub use directive::{directive_pattern, Directive, DirectiveExpander};
pub use renderer::{render_document, Miss, NodeRenderer, Rendered};
pub use substitution::PropertySubstituter;

/// Rendered props of a component, in authoring order
pub type Props = [(String, String)];

/// Trait for the text transformations applied to a template body
///
/// A component body goes through the directive expansion first and the
/// property substitution afterwards.
///
/// # Examples
///
/// ```
/// use tmaker::transforms::{PropertySubstituter, Transform};
///
/// let props = vec![("name".to_string(), "world".to_string())];
/// let substituter = PropertySubstituter::new("##", &props);
/// assert_eq!(substituter.transform("hello ##name##").unwrap(), "hello world");
/// ```
pub trait Transform {
    /// Transforms the input text
    ///
    /// # Arguments
    /// * `text` - The text to transform
    ///
    /// # Returns
    /// The transformed text or an error if transformation fails
    fn transform(&self, text: &str) -> Result<String>;
}

/// Process the text through the given transforms in sequence
///
/// # Arguments
/// * `transforms` - The transforms to apply, in order
/// * `text` - The text to process
///
/// # Returns
/// The processed text after applying all transforms or an error if any transform fails
pub fn process(transforms: &[&dyn Transform], text: &str) -> Result<String> {
    transforms
        .iter()
        .try_fold(text.to_string(), |acc, transform| transform.transform(&acc))
}
