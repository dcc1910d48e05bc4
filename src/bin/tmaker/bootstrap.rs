use chrono::prelude::*;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

pub use tmaker::{
    config::{parse as config_parse, MainConfig, DEFAULT_CONF_FILE},
    error::*,
};

use tmaker::constants::state::{DEFAULT_BUCKET, DEFAULT_EXPORT_PREFIX};

use crate::directories::PROJECT_DIRS;

static DEFAULT_CONF: &str = "# File automatically generated on ${date}\n\
                            [defaults]\n\
                            # Delimiter used by new documents\n\
                            bucket        = \"${bucket}\"\n\
                            # File name prefix of exported documents\n\
                            export_prefix = \"${export_prefix}\"\n\
                            # Printed in front of the #lz:... token of shared links\n\
                            link_base     = \"\"\n";

#[derive(Debug)]
pub struct BootStrap {
    config: MainConfig,
}

impl BootStrap {
    pub fn new() -> Result<Self> {
        Ok(BootStrap {
            config: parse_main_config()?,
        })
    }

    pub fn get_config(&self) -> &MainConfig {
        &self.config
    }
}

/// Expands environment variables and `~` in a path given on the command line
///
/// # Errors
/// Returns `ArgsProcessingError` if a variable cannot be resolved
pub fn expand_path(path: &str) -> Result<PathBuf> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| Error::ArgsProcessingError(format!("unable to expand \"{}\" : {}", path, e)))
}

/// Creates the default main configuration file in the config directory
///
/// # Arguments
/// * `config_file` - The path to the configuration file
///
/// # Returns
/// A `Result` containing the configuration data as a `String`
///
/// # Errors
/// * `ConfigError` - If the configuration file cannot be created
/// * `IoError` - If an I/O error occurs while creating the configuration file
fn create_default_config(config_file: &Path) -> Result<String> {
    let parent_dir = config_file
        .parent()
        .ok_or_else(|| Error::ConfigError(config_file.to_string_lossy().into_owned()))?;
    std::fs::create_dir_all(parent_dir)?;
    let current_date: DateTime<Local> = Local::now();
    let config_data = DEFAULT_CONF
        .replacen("${date}", &current_date.to_string(), 1)
        .replacen("${bucket}", DEFAULT_BUCKET, 1)
        .replacen("${export_prefix}", DEFAULT_EXPORT_PREFIX, 1);

    File::create(config_file)?.write_all(config_data.as_bytes())?;
    tmaker::debug!("Default configuration created in {:?}", config_file);
    Ok(config_data)
}

/// Processes the main configuration file retrieving the associated `MainConfig` structure
///
/// This function reads the configuration file and returns a `MainConfig` structure.
/// If the file does not exist, it creates a default configuration file.
///
/// # Errors
///
/// This function returns an error if the configuration file cannot be read or parsed.
pub fn parse_main_config() -> Result<MainConfig> {
    let conf_file = PROJECT_DIRS
        .as_ref()
        .map(|dirs| dirs.config_dir().join(DEFAULT_CONF_FILE))
        .ok_or_else(|| Error::ConfigError(String::from("<home directory not found>")))?;

    let toml_data = match config_parse(&conf_file) {
        Ok(data) => data,
        Err(Error::Io(e)) if e.kind() == ::std::io::ErrorKind::NotFound => {
            create_default_config(&conf_file)?
        }
        Err(Error::Io(e)) => {
            return Err(Error::ConfigReadError {
                file: String::from(DEFAULT_CONF_FILE),
                cause: e.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    MainConfig::from_toml(&toml_data, DEFAULT_CONF_FILE)
}
