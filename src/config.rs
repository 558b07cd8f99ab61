//! Workspace configuration persistence
//!
//! Stores host settings and the menu table in `~/.config/paneframe/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::menu::{MenuEntry, MenuRegistry};
use crate::storage::DEFAULT_NAMESPACE;

/// Workspace configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Origin the host is served from; every bridge message is checked against it
    #[serde(default = "default_host_origin")]
    pub host_origin: String,

    /// Outer route prefix under which menu sections live
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Minimum viewport width (CSS px) for a two-panel layout
    #[serde(default = "default_breakpoint_px")]
    pub breakpoint_px: u32,

    #[serde(default = "default_storage_namespace")]
    pub storage_namespace: String,

    #[serde(default = "default_menu")]
    pub menu: Vec<MenuEntry>,
}

fn default_host_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_base_path() -> String {
    "/admin".to_string()
}

fn default_breakpoint_px() -> u32 {
    1024
}

fn default_storage_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::new("customers", "Customers", "/admin/customers"),
        MenuEntry::new("notices", "Notices", "/admin/notices"),
        MenuEntry::new("employees", "Employees", "/admin/employees"),
        MenuEntry::new("files", "Files", "/admin/files"),
    ]
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            host_origin: default_host_origin(),
            base_path: default_base_path(),
            breakpoint_px: default_breakpoint_px(),
            storage_namespace: default_storage_namespace(),
            menu: default_menu(),
        }
    }
}

impl WorkspaceConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from an explicit file, or return defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to an explicit file
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn menu_registry(&self) -> MenuRegistry {
        MenuRegistry::with_entries(self.base_path.clone(), self.menu.clone())
    }
}
