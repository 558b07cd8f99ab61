//! Tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! layout transitions, bridge traffic, and drag gestures.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=bridge=debug,drag=trace` - scoped filtering
//! - `RUST_LOG=paneframe::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/paneframe/logs/paneframe.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_PREFIX;
use crate::model::{Layout, PanelId, TabId};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`.
/// File logging writes to `~/.config/paneframe/logs/paneframe.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console goes to stderr; stdout carries the driver's JSON output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of panel/tab structure for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDigest {
    pub active_panel: PanelId,
    pub panels: Vec<PanelDigest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelDigest {
    pub id: PanelId,
    pub tabs: Vec<TabId>,
    pub active: Option<TabId>,
}

impl LayoutDigest {
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            active_panel: layout.active_panel_id().clone(),
            panels: layout
                .panels()
                .iter()
                .map(|p| PanelDigest {
                    id: p.id.clone(),
                    tabs: p.tabs().iter().map(|t| t.id.clone()).collect(),
                    active: p.active_tab_id().cloned(),
                })
                .collect(),
        }
    }

    /// Generate a diff description between two digests
    pub fn diff(&self, other: &LayoutDigest) -> Option<String> {
        let mut changes = Vec::new();

        if self.panels.len() != other.panels.len() {
            changes.push(format!(
                "panel count: {} → {}",
                self.panels.len(),
                other.panels.len()
            ));
        }
        if self.active_panel != other.active_panel {
            changes.push(format!(
                "active panel: {} → {}",
                self.active_panel, other.active_panel
            ));
        }

        for after in &other.panels {
            let Some(before) = self.panels.iter().find(|p| p.id == after.id) else {
                changes.push(format!("{}: created {:?}", after.id, ids(&after.tabs)));
                continue;
            };
            if before.tabs != after.tabs {
                changes.push(format!(
                    "{}: {:?} → {:?}",
                    after.id,
                    ids(&before.tabs),
                    ids(&after.tabs)
                ));
            }
            if before.active != after.active {
                changes.push(format!(
                    "{}: active {} → {}",
                    after.id,
                    before.active.as_ref().map_or("-", TabId::as_str),
                    after.active.as_ref().map_or("-", TabId::as_str)
                ));
            }
        }
        for before in &self.panels {
            if !other.panels.iter().any(|p| p.id == before.id) {
                changes.push(format!("{}: removed", before.id));
            }
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

fn ids(tabs: &[TabId]) -> Vec<&str> {
    tabs.iter().map(TabId::as_str).collect()
}
