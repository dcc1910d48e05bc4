use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use crate::{
    bootstrap::{expand_path, BootStrap},
    clap_app,
};
use clap::ArgMatches;
use tmaker::{
    clock::SystemClock,
    controller::{DocumentController, StateSource},
    error::*,
};

pub struct App {
    pub matches: ArgMatches,
}

impl App {
    pub fn new() -> Result<Self> {
        #[cfg(windows)]
        let _ = nu_ansi_term::enable_ansi_support();

        let interactive_output = std::io::stdout().is_terminal();

        Ok(App {
            matches: Self::matches(interactive_output)?,
        })
    }

    pub fn matches(interactive_output: bool) -> Result<ArgMatches> {
        Ok(clap_app::build_app(interactive_output).get_matches())
    }

    /// Looks up a global argument, preferring the innermost subcommand
    /// where it was given.
    fn global_value(&self, id: &str) -> Option<&str> {
        let mut current = &self.matches;
        let mut value = current.get_one::<String>(id);
        while let Some((_, sub_matches)) = current.subcommand() {
            current = sub_matches;
            value = current.get_one::<String>(id).or(value);
        }
        value.map(|s| s.as_str())
    }

    /// Expands the path held by a command argument
    fn path_arg(args: &ArgMatches, id: &str) -> Result<Option<PathBuf>> {
        args.get_one::<String>(id)
            .map(|path| expand_path(path))
            .transpose()
    }

    fn required_path_arg(args: &ArgMatches, id: &str) -> Result<PathBuf> {
        Self::path_arg(args, id)?
            .ok_or_else(|| Error::ArgsProcessingError(format!("missing argument <{}>", id)))
    }

    /// Start the application, bootstraps the configuration, loads the document and
    /// forwards the request to the controller.
    ///
    /// # Returns
    /// A `Result` indicating whether the command completed successfully.
    pub fn start(&self) -> Result<bool> {
        let bootstrap = BootStrap::new()?;

        let doc_path = match self.global_value("doc") {
            Some(doc) => Some(expand_path(doc)?),
            None => None,
        };
        let source = match (self.global_value("token"), &doc_path) {
            (Some(token), _) => StateSource::Token(token),
            (None, Some(path)) => StateSource::Document(path),
            (None, None) => StateSource::Fresh,
        };

        let stdout = std::io::stdout();
        let mut output = stdout.lock();
        let mut controller = DocumentController::load(bootstrap.get_config(), source, &mut output)?;

        let result = match self.matches.subcommand() {
            Some(("link", _)) => controller.link(&mut output),
            Some(("new", _)) => controller.new_document(&mut output),
            Some(("example", _)) => controller.example(&mut output),
            Some(("export", args)) => {
                let directory = Self::path_arg(args, "output")?;
                controller
                    .export(
                        args.get_one::<String>("name").map(|s| s.as_str()),
                        directory.as_deref(),
                        args.get_flag("stdout"),
                        &mut output,
                    )
                    .map(|_| true)
            }
            Some(("import", args)) => {
                let path = Self::required_path_arg(args, "FILE")?;
                controller.import(&path, &mut output)
            }
            Some(("templates", args)) => self.run_templates(&mut controller, args, &mut output),
            Some(("custom", args)) => self.run_custom(&mut controller, args, &mut output),
            Some(("bucket", args)) => {
                let bucket = args.get_one::<String>("VALUE").map_or("", |s| s.as_str());
                controller.set_bucket(bucket, &mut output)
            }
            Some(("render", args)) => {
                let custom = Self::path_arg(args, "custom")?;
                controller.render(custom.as_deref(), &SystemClock, &mut output)
            }
            _ => controller.render(None, &SystemClock, &mut output),
        };

        output.flush()?;
        result
    }

    /// Runs any of the templates subcommands (list, add, delete)
    fn run_templates(
        &self,
        controller: &mut DocumentController,
        args: &ArgMatches,
        output: &mut dyn Write,
    ) -> Result<bool> {
        match args.subcommand() {
            Some(("list", _)) => controller.list_templates(output),
            Some(("add", add_args)) => {
                let name = add_args.get_one::<String>("name").map_or("", |s| s.as_str());
                let code = Self::path_arg(add_args, "code")?;
                controller.add_template(name, code.as_deref(), output)
            }
            Some(("delete", _)) => controller.delete_template(output),
            _ => Err(Error::ArgsProcessingError(
                "Invalid subcommand provided".to_string(),
            )),
        }
    }

    /// Runs any of the custom subcommands (show, set, edit when "editor" feature is enabled)
    fn run_custom(
        &self,
        controller: &mut DocumentController,
        args: &ArgMatches,
        output: &mut dyn Write,
    ) -> Result<bool> {
        match args.subcommand() {
            Some(("show", _)) => controller.show_custom(output),
            Some(("set", set_args)) => {
                let path = Self::required_path_arg(set_args, "FILE")?;
                controller.set_custom_file(&path, output)
            }
            #[cfg(feature = "editor")]
            Some(("edit", _)) => controller.edit_custom(output),
            _ => Err(Error::ArgsProcessingError(
                "Invalid subcommand provided".to_string(),
            )),
        }
    }
}
