//! Menu registry - the capability table of pages that can be opened as tabs
//!
//! Each registrable page contributes `{ id, label, href, icon }`. The id doubles
//! as the tab id, so the workspace only ever stores ids and looks the rest up here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use super::layout::{TabDescriptor, TabId};

/// A page registered in the admin menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: String,
    pub label: String,
    pub href: String,
    /// Opaque reference to the icon asset; never interpreted by the workspace
    #[serde(default)]
    pub icon: Option<String>,
}

impl MenuEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            href: href.into(),
            icon: None,
        }
    }

    pub fn descriptor(&self) -> TabDescriptor {
        TabDescriptor {
            id: TabId::new(self.id.clone()),
            label: self.label.clone(),
            href: self.href.clone(),
        }
    }
}

/// Result of mapping an outer URL onto the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuMatch {
    /// The workspace root; no tab is required
    Root,
    /// A registered section
    Entry(TabId),
    /// Not a known section
    Unmatched,
}

/// Menu entries keyed by their stable id
#[derive(Debug, Clone, Default)]
pub struct MenuRegistry {
    base_path: String,
    entries: HashMap<String, MenuEntry>,
    /// Registration order, for display
    order: Vec<String>,
}

impl MenuRegistry {
    pub fn new(base_path: impl Into<String>) -> Self {
        let base = base_path.into();
        Self {
            base_path: base.trim_end_matches('/').to_string(),
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn with_entries(base_path: impl Into<String>, entries: Vec<MenuEntry>) -> Self {
        let mut registry = Self::new(base_path);
        for entry in entries {
            registry.register(entry);
        }
        registry
    }

    /// Register (or replace) an entry. Later registrations with the same id win.
    pub fn register(&mut self, entry: MenuEntry) {
        if self.entries.contains_key(&entry.id) {
            tracing::debug!(target: "nav", "Replacing menu entry {}", entry.id);
        } else {
            self.order.push(entry.id.clone());
        }
        self.entries.insert(entry.id.clone(), entry);
    }

    pub fn get(&self, id: &str) -> Option<&MenuEntry> {
        self.entries.get(id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Map an outer URL to a menu identity by prefix.
    ///
    /// `<base>/<segment>/...` resolves to `<segment>` when it is registered.
    /// `/`, `<base>` and `<base>/` are the root.
    pub fn resolve(&self, url: &str) -> MenuMatch {
        let Some(path) = outer_path(url) else {
            return MenuMatch::Unmatched;
        };
        let trimmed = path.trim_end_matches('/');

        if trimmed.is_empty() || trimmed == self.base_path {
            return MenuMatch::Root;
        }

        let rest = if self.base_path.is_empty() {
            trimmed.strip_prefix('/')
        } else {
            trimmed
                .strip_prefix(self.base_path.as_str())
                .and_then(|r| r.strip_prefix('/'))
        };

        let Some(rest) = rest else {
            return MenuMatch::Unmatched;
        };
        let segment = rest.split('/').next().unwrap_or_default();

        if self.entries.contains_key(segment) {
            MenuMatch::Entry(TabId::new(segment))
        } else {
            MenuMatch::Unmatched
        }
    }
}

/// Normalized path of an outer URL. Only the path takes part in matching, so
/// relative URLs resolve against a placeholder document root.
fn outer_path(url: &str) -> Option<String> {
    let root = Url::parse("http://localhost/").ok()?;
    root.join(url).ok().map(|u| u.path().to_string())
}
