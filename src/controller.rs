use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use nu_ansi_term::Color::{Green, Red, Yellow};

use crate::clock::Clock;
use crate::codec::{encode_token, export_document, import_document, restore};
use crate::config::MainConfig;
use crate::constants::example::EXAMPLE_PROJECT;
use crate::constants::state::DOCUMENT_EXT;
use crate::error::*;
use crate::log::debug_message;
use crate::registry::TemplateDef;
use crate::state::AppState;
use crate::transforms::Miss;

/// Name used by `export` when none is given
pub const DEFAULT_EXPORT_NAME: &str = "document";

/// Where the state of a run comes from
#[derive(Debug, Clone, Copy, Default)]
pub enum StateSource<'s> {
    /// A compact token, or any URL holding one
    Token(&'s str),
    /// An exported plain document
    Document(&'s Path),
    /// A new document with the configured defaults
    #[default]
    Fresh,
}

/// Owns the single `AppState` of a run and provides the operations behind
/// every shell command (render, link, export, import, template and custom
/// editing, bucket change).
///
/// Every operation writes its user facing output to the given writer.
pub struct DocumentController<'a> {
    pub config: &'a MainConfig,
    state: AppState,
}

impl<'a> DocumentController<'a> {
    pub fn new(config: &'a MainConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Loads the state from the given source.
    ///
    /// A corrupt token prints a warning and falls back to a new document,
    /// a document that cannot be read or validated aborts the load.
    pub fn load(
        config: &'a MainConfig,
        source: StateSource<'_>,
        output: &mut dyn Write,
    ) -> Result<Self> {
        let state = match source {
            StateSource::Token(token) => {
                let restored = restore(Some(token), || config.new_document());
                if let Some(error) = restored.error {
                    writeln!(
                        output,
                        "{}",
                        Yellow.paint(debug_message(
                            "Unable to restore the token, starting a new document",
                            format!(" ({})", error)
                        ))
                    )?;
                }
                restored.state
            }
            StateSource::Document(path) => read_document(path)?,
            StateSource::Fresh => config.new_document(),
        };
        Ok(Self::new(config, state))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Renders the preview, optionally replacing the custom tree first with
    /// the YAML contents of `custom_file`.
    ///
    /// A custom file that fails to parse leaves no custom content: the cause
    /// is reported and the built-in example tree is rendered instead.
    ///
    /// # Returns
    /// `Ok(true)` once the rendered text has been written, `Ok(false)` when
    /// the custom file was rejected.
    pub fn render(
        &mut self,
        custom_file: Option<&Path>,
        clock: &dyn Clock,
        output: &mut dyn Write,
    ) -> Result<bool> {
        let mut parsed = true;
        if let Some(path) = custom_file {
            let text = fs::read_to_string(path)?;
            if let Err(e) = self.state.set_custom_text(&text) {
                writeln!(output, "{}", Red.paint(e.to_string()))?;
                parsed = false;
            }
        }

        let rendered = self.state.render(clock)?;
        for miss in &rendered.misses {
            match miss {
                Miss::UnknownTemplate(name) => crate::debug!("Unknown template \"{}\"", name),
                Miss::UnknownGlobal(key) => crate::debug!("Unknown global \"{}\"", key),
            }
        }
        writeln!(output, "{}", rendered.output)?;
        Ok(parsed)
    }

    /// Writes the shareable link of the current state
    pub fn link(&self, output: &mut dyn Write) -> Result<bool> {
        let token = encode_token(&self.state)?;
        writeln!(output, "{}", self.config.link(&token))?;
        Ok(true)
    }

    /// Discards the current state in favour of a new document
    pub fn new_document(&mut self, output: &mut dyn Write) -> Result<bool> {
        self.state = self.config.new_document();
        self.link(output)
    }

    /// Replaces the current state with the bundled example project
    pub fn example(&mut self, output: &mut dyn Write) -> Result<bool> {
        self.state = import_document(EXAMPLE_PROJECT)?;
        self.link(output)
    }

    /// Exports the state as a plain document.
    ///
    /// The file is named `<export_prefix><name>.json` and written into
    /// `directory` (current directory by default). With `to_stdout` the
    /// document is written to `output` instead.
    ///
    /// # Returns
    /// The path of the written file, `None` when printed.
    pub fn export(
        &self,
        name: Option<&str>,
        directory: Option<&Path>,
        to_stdout: bool,
        output: &mut dyn Write,
    ) -> Result<Option<PathBuf>> {
        let document = export_document(&self.state)?;
        if to_stdout {
            writeln!(output, "{}", document)?;
            return Ok(None);
        }

        let file_name = format!(
            "{}{}{}",
            self.config.defaults.export_prefix,
            name.unwrap_or(DEFAULT_EXPORT_NAME),
            DOCUMENT_EXT
        );
        let path = directory.unwrap_or_else(|| Path::new(".")).join(file_name);
        fs::write(&path, document)?;
        writeln!(
            output,
            "Document exported to \"{}\"",
            Green.paint(path.to_string_lossy())
        )?;
        Ok(Some(path))
    }

    /// Adopts an exported document, replacing the current state as a whole
    pub fn import(&mut self, path: &Path, output: &mut dyn Write) -> Result<bool> {
        self.state = read_document(path)?;
        crate::debug!("Imported {:?}", path);
        self.link(output)
    }

    /// Lists the template names in registry order
    pub fn list_templates(&self, output: &mut dyn Write) -> Result<bool> {
        let registry = self.state.registry();
        if registry.is_empty() {
            writeln!(output, "{}", Yellow.paint("No templates defined"))?;
            return Ok(true);
        }
        for (index, name) in registry.names().enumerate() {
            let name = if name.is_empty() { "<unnamed>" } else { name };
            writeln!(output, "{:>3}. {}", index + 1, Green.paint(name))?;
        }
        Ok(true)
    }

    /// Appends a template, reading its code from `code_file` when given
    pub fn add_template(
        &mut self,
        name: &str,
        code_file: Option<&Path>,
        output: &mut dyn Write,
    ) -> Result<bool> {
        let code = match code_file {
            Some(path) => fs::read_to_string(path)?,
            None => String::new(),
        };
        self.state.add_template(TemplateDef::new(name, code));
        self.link(output)
    }

    /// Removes the last template
    pub fn delete_template(&mut self, output: &mut dyn Write) -> Result<bool> {
        if self.state.remove_last_template().is_none() {
            writeln!(output, "{}", Yellow.paint("No templates to delete"))?;
            return Ok(false);
        }
        self.link(output)
    }

    /// Writes the custom tree as YAML-like text
    pub fn show_custom(&self, output: &mut dyn Write) -> Result<bool> {
        write!(output, "{}", self.state.custom_text()?)?;
        Ok(true)
    }

    /// Adopts the authored text as the new custom tree.
    ///
    /// A parse failure empties the custom tree, reports the first line of
    /// the cause and still prints the resulting link.
    pub fn set_custom(&mut self, text: &str, output: &mut dyn Write) -> Result<bool> {
        let parsed = match self.state.set_custom_text(text) {
            Ok(()) => {
                writeln!(output, "{}", Green.paint("success!"))?;
                true
            }
            Err(e) => {
                writeln!(output, "{}", Red.paint(e.to_string()))?;
                false
            }
        };
        self.link(output)?;
        Ok(parsed)
    }

    /// Like `set_custom`, reading the text from a file
    pub fn set_custom_file(&mut self, path: &Path, output: &mut dyn Write) -> Result<bool> {
        let text = fs::read_to_string(path)?;
        self.set_custom(&text, output)
    }

    /// Opens the custom tree in the user's editor and adopts the result
    #[cfg(feature = "editor")]
    pub fn edit_custom(&mut self, output: &mut dyn Write) -> Result<bool> {
        let edited = edit::edit(self.state.custom_text()?)?;
        self.set_custom(&edited, output)
    }

    /// Changes the delimiter
    pub fn set_bucket(&mut self, bucket: &str, output: &mut dyn Write) -> Result<bool> {
        self.state.set_bucket(bucket);
        self.link(output)
    }
}

fn read_document(path: &Path) -> Result<AppState> {
    let import_error = |cause: String| Error::ImportError {
        location: ConfigType::DOCUMENT,
        file: path.to_string_lossy().into_owned(),
        cause,
    };
    let text = fs::read_to_string(path).map_err(|e| import_error(e.to_string()))?;
    import_document(&text).map_err(|e| import_error(e.to_string()))
}
