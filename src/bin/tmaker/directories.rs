use std::env;
use std::path::PathBuf;

use once_cell::sync::Lazy;

/// Wrapper for 'dirs' that treats MacOS more like Linux, by following the XDG specification.
/// `TMAKER_CONFIG_DIR` is checked before the `XDG_CONFIG_HOME` environment variable.
/// The fallback directory is `~/.config/tmaker`.
pub struct ProjectDirs {
    config_dir: PathBuf,
}

impl ProjectDirs {
    fn new() -> Option<ProjectDirs> {
        let config_dir =
            if let Some(config_dir_op) = env::var_os("TMAKER_CONFIG_DIR").map(PathBuf::from) {
                config_dir_op
            } else {
                #[cfg(target_os = "macos")]
                let config_dir_op = env::var_os("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .filter(|p| p.is_absolute())
                    .or_else(|| dirs_next::home_dir().map(|d| d.join(".config")));

                #[cfg(not(target_os = "macos"))]
                let config_dir_op = dirs_next::config_dir();

                config_dir_op.map(|d| d.join("tmaker"))?
            };

        Some(ProjectDirs { config_dir })
    }

    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }
}

/// `None` when no home directory can be found
pub static PROJECT_DIRS: Lazy<Option<ProjectDirs>> = Lazy::new(ProjectDirs::new);
