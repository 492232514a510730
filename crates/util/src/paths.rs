//! Filesystem path helpers shared by the settings loader and the CLI.

use std::path::{Path, PathBuf};

use dirs_next::{config_dir, home_dir};

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "typeahead";

/// Expand a leading `~` (either separator style) to the user's home
/// directory. Surrounding whitespace is ignored; other paths pass through.
pub fn expand_home(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    match trimmed.strip_prefix('~') {
        Some("") => home(),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => home().join(&rest[1..]),
        _ => PathBuf::from(trimmed),
    }
}

/// Resolve `file_name` under `<config_dir>/typeahead/`, falling back to the
/// working directory when the platform has no config directory.
pub fn app_config_path(file_name: impl AsRef<Path>) -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(file_name)
}
