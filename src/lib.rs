//! `tmaker` is a library to compose text documents out of reusable templates.
//!
//! A document is an `AppState`: a delimiter (the *bucket*), a list of named
//! templates and an authored node tree (the *custom* content). Rendering
//! walks the tree, expands meta directives (`##LINE##`, `##DATE##`,
//! `##GB:key##`...) in each template and substitutes the component
//! properties. The whole state can be shared as a compact `lz:` token or
//! exported as a plain JSON document.
//!
//! The main entry points are `AppState::render` and the `codec` module. The
//! `controller::DocumentController` bundles them behind the operations of
//! the command line shell.
//!
//! "Hello world" example:
//! ```
//! use tmaker::clock::SystemClock;
//! use tmaker::registry::TemplateDef;
//! use tmaker::state::AppState;
//!
//! let mut state = AppState::default();
//! state.add_template(TemplateDef::new("greet", "Hello ##who##!"));
//! state.set_custom_text("- $: greet\n  who: world\n").unwrap();
//!
//! let rendered = state.render(&SystemClock).unwrap();
//! assert_eq!(rendered.output, "Hello world!");
//! ```

pub mod clock;
pub mod codec;
pub mod config;
pub mod constants;
pub mod context;
pub mod controller;
pub mod error;
pub mod log;
pub mod node;
pub mod registry;
pub mod state;
pub mod structured_text;
pub mod transforms;
pub mod utils;

/// The tmaker prelude
///
/// This module re-exports the most commonly used items from tmaker.
/// You can use it with `use tmaker::prelude::*;` to bring all common items into scope.
pub mod prelude {
    // Re-export commonly used traits
    pub use crate::clock::Clock;
    pub use crate::transforms::Transform;

    // Re-export commonly used types
    pub use crate::clock::{FixedClock, SystemClock};
    pub use crate::error::{Error, Result};
    pub use crate::registry::TemplateDef;
    pub use crate::state::{AppState, Custom};
    pub use crate::transforms::{Miss, Rendered};

    // Re-export commonly used constants
    pub use crate::constants::state::DEFAULT_BUCKET;

    // Re-export commonly used functions
    pub use crate::codec::{decode_token, encode_token, export_document, import_document};
    pub use crate::transforms::render_document;
}
