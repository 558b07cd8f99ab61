//! Centralized configuration paths for paneframe
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/paneframe/`
//! - Windows: `%APPDATA%\paneframe\`
//!
//! This module is the single source of truth for config paths.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "paneframe";

/// Prefix of the daily-rotated log files (`paneframe.log.YYYY-MM-DD`)
pub const LOG_FILE_PREFIX: &str = "paneframe.log";

/// Base config directory for paneframe
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/paneframe`
///   - Else: `~/.config/paneframe`
///
/// Windows:
///   - `%APPDATA%\paneframe`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/paneframe/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/paneframe/layouts/`
pub fn layouts_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("layouts"))
}

/// `~/.config/paneframe/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure layouts dir exists, returning it
pub fn ensure_layouts_dir() -> Result<PathBuf, String> {
    let layouts = ensure_config_dir()?.join("layouts");
    ensure_dir(&layouts)?;
    Ok(layouts)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = ensure_config_dir()?.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_the_app_dir() {
        let Some(base) = config_dir() else { return };
        assert!(base.ends_with(APP_DIR));
        assert_eq!(config_file(), Some(base.join("config.yaml")));
        assert_eq!(layouts_dir(), Some(base.join("layouts")));
        assert_eq!(logs_dir(), Some(base.join("logs")));
    }
}
