use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::state::{DEFAULT_BUCKET, DEFAULT_EXPORT_PREFIX};
use crate::error::*;
use crate::state::AppState;

pub const DEFAULT_CONF_FILE: &str = "tmaker.toml";

#[derive(Deserialize, Debug, Default)]
pub struct MainConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Deserialize, Debug, Serialize, PartialEq)]
#[serde(default)]
pub struct Defaults {
    /// Delimiter of new documents
    pub bucket: String,
    /// File name prefix of exported documents
    pub export_prefix: String,
    /// Printed in front of `#lz:...` links
    pub link_base: String,
}

impl Default for Defaults {
    fn default() -> Defaults {
        Defaults {
            bucket: DEFAULT_BUCKET.to_string(),
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            link_base: String::new(),
        }
    }
}

impl MainConfig {
    /// Parses the TOML contents of a configuration file
    pub fn from_toml(data: &str, file: &str) -> Result<Self> {
        toml::from_str(data).map_err(|e| Error::SerdeTomlError {
            location: ConfigType::MAIN,
            file: file.to_string(),
            cause: e.to_string(),
        })
    }

    /// A new document using the configured defaults
    pub fn new_document(&self) -> AppState {
        AppState::with_bucket(self.defaults.bucket.as_str())
    }

    /// Builds the shareable link for a compact token
    pub fn link(&self, token: &str) -> String {
        format!("{}#{}", self.defaults.link_base, token)
    }
}

pub fn parse(file_path: &Path) -> Result<String> {
    let mut config_content = String::new();
    File::open(file_path)?.read_to_string(&mut config_content)?;
    Ok(config_content)
}
