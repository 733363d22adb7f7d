//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "dirlisting";
const APPLICATION: &str = "dirlisting-demo";

/// Name of the listing config file inside the config directory.
pub const CONFIG_FILE: &str = "listing.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/dirlisting-demo` or `~/.config/dirlisting-demo`
/// - macOS: `~/Library/Application Support/dev.dirlisting.dirlisting-demo`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default location of the listing config, if it exists.
pub fn default_config() -> Option<PathBuf> {
    config_dir()
        .map(|dir| dir.join(CONFIG_FILE))
        .filter(|path| path.is_file())
}
