use clap::{
    arg,
    builder::{styling::AnsiColor, Styles},
    crate_description, crate_name, crate_version, ArgGroup, ColorChoice, Command,
};

fn env_no_color() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|x| !x.is_empty())
}

// Builds the application command line interface defining the commands, subcommands
// and arguments
pub fn build_app(interactive_output: bool) -> Command {
    let color_when = if interactive_output && !env_no_color() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default())
        .usage(AnsiColor::Green.on_default())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default());

    Command::new(crate_name!())
    .styles(styles)
    .version(crate_version!())
    .about(crate_description!())
    .color(color_when)
    .arg(
        arg!(--token <TOKEN> "Loads the document from a compact token or link")
        .long_help(
            "Loads the document carried by a compact token (lz:...). \
                    A full link can be given, everything after the first \"lz:\" is decoded. \
                    A token that cannot be decoded falls back to a new document.",
        )
        .global(true),
    )
    .arg(
        arg!(--doc <FILE> "Loads the document from an exported file")
        .long_help(
            "Loads a plain document previously written by the export command. \
                    The document is validated as a whole and rejected if any part is invalid.",
        )
        .global(true),
    )
    .group(ArgGroup::new("source").args(["token", "doc"]))
    .subcommand(
        Command::new("render")
        .about("Renders the document (default command).")
        .long_about(
            "Renders the custom content of the document with its templates. \
                    While the document has no custom content, a built-in example tree is rendered.",
        )
        .arg(arg!(-c --custom <FILE> "Replaces the custom content before rendering")),
    )
    .subcommand(Command::new("link").about("Prints the shareable link of the document."))
    .subcommand(
        Command::new("new")
        .about("Prints the link of a new document.")
        .long_about(
            "Discards the loaded document and prints the link of a new one, \
                    holding one empty template and no custom content.",
        ),
    )
    .subcommand(
        Command::new("example")
        .about("Prints the link of the bundled example project."),
    )
    .subcommand(
        Command::new("export")
        .about("Exports the document as a plain JSON file.")
        .long_about(
            "Writes the document to <export_prefix><NAME>.json (see the export_prefix \
                    setting in tmaker.toml) using two-space indentation.",
        )
        .arg(arg!(-n --name <NAME> "Name of the exported document"))
        .arg(arg!(-o --output <DIR> "Directory to write the document into"))
        .arg(arg!(--stdout "Prints the document instead of writing a file").conflicts_with("output")),
    )
    .subcommand(
        Command::new("import")
        .about("Imports an exported document and prints its link.")
        .arg(arg!(<FILE> "The exported document")),
    )
    .subcommand(build_templates_command())
    .subcommand(build_custom_command())
    .subcommand(
        Command::new("bucket")
        .about("Changes the delimiter around placeholders and directives.")
        .arg(arg!(<VALUE> "The new delimiter")),
    )
}

/// Builds the templates command
///
/// # Returns
/// A `Command` object representing the templates command.
fn build_templates_command() -> Command {
    Command::new("templates")
    .about("Modify the templates of the document")
    .arg_required_else_help(true)
    .subcommand(
        Command::new("list")
        .alias("ls")
        .about("Lists the templates of the document."),
    )
    .subcommand(
        Command::new("add")
        .arg(arg!(<name> "The name of the template to add"))
        .arg(arg!(--code <FILE> "File holding the template code"))
        .about("Appends a template to the document."),
    )
    .subcommand(
        Command::new("delete")
        .alias("rm")
        .about("Removes the last template of the document."),
    )
}

/// Builds the custom command with the edit subcommand when editor feature is enabled
///
/// # Returns
/// A `Command` object representing the custom command.
fn build_custom_command() -> Command {
    let custom_cmd = Command::new("custom")
    .about("Modify the custom content of the document")
    .arg_required_else_help(true)
    .subcommand(Command::new("show").about("Prints the custom content as YAML."))
    .subcommand(
        Command::new("set")
        .arg(arg!(<FILE> "YAML file holding the node sequence"))
        .about("Replaces the custom content.")
        .long_about(
            "Parses the YAML file and adopts it as the custom content. \
                    The file must hold a sequence; on failure the custom content is emptied.",
        ),
    );

    #[cfg(feature = "editor")]
    {
        custom_cmd.subcommand(
            Command::new("edit")
            .about("Opens the custom content in the default text editor."),
        )
    }
    #[cfg(not(feature = "editor"))]
    {
        custom_cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_is_consistent() {
        build_app(false).debug_assert();
    }

    #[test]
    fn test_global_source_args() {
        let matches = build_app(false)
            .try_get_matches_from(["tmaker", "export", "--token", "lz:abc", "--stdout"])
            .unwrap();
        let (name, export) = matches.subcommand().unwrap();
        assert_eq!(name, "export");
        assert_eq!(export.get_one::<String>("token").map(String::as_str), Some("lz:abc"));
        assert!(export.get_flag("stdout"));

        let clash =
            build_app(false).try_get_matches_from(["tmaker", "--token", "lz:a", "--doc", "d.json"]);
        assert!(clash.is_err());
    }
}
