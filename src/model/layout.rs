//! Workspace layout - panels, tabs, and the operations that mutate them
//!
//! The layout is the single source of truth for which pages are open and where.
//! It holds one or two panels; each panel owns an ordered list of tabs and
//! remembers which one is active. Tabs are addressed by id everywhere - there are
//! no back-references from a tab to its panel, use [`Layout::find_tab_panel`].
//!
//! Every operation is safe to call with stale ids: a reference to a tab or panel
//! that no longer exists is a no-op.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of panels the workspace shows side by side
pub const MAX_PANELS: usize = 2;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a tab. Derived from the menu identity it represents, so it is
/// unique across the whole workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a panel (`panel-1`, `panel-2`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Panel id for the given sequence number
    pub fn numbered(seq: u64) -> Self {
        Self(format!("panel-{}", seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ============================================================================
// Tabs
// ============================================================================

/// What a caller supplies to open a tab (usually resolved from the menu registry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDescriptor {
    pub id: TabId,
    pub label: String,
    pub href: String,
}

impl TabDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: TabId::new(id),
            label: label.into(),
            href: href.into(),
        }
    }
}

/// A logical open page in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub label: String,
    pub href: String,
    /// Most specific URL currently shown for this tab (owned by navigation sync)
    pub current_path: String,
    #[serde(default)]
    pub is_pinned: bool,
}

impl Tab {
    pub fn from_descriptor(descriptor: TabDescriptor) -> Self {
        Self {
            id: descriptor.id,
            current_path: descriptor.href.clone(),
            label: descriptor.label,
            href: descriptor.href,
            is_pinned: false,
        }
    }
}

// ============================================================================
// Panels
// ============================================================================

/// An ordered group of tabs with one active tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: PanelId,
    tabs: Vec<Tab>,
    #[serde(default)]
    active_tab_id: Option<TabId>,
}

impl Panel {
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            tabs: Vec::new(),
            active_tab_id: None,
        }
    }

    /// Tabs in render order
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab_id(&self) -> Option<&TabId> {
        self.active_tab_id.as_ref()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.as_ref().and_then(|id| self.tab(id))
    }

    pub fn tab(&self, id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| &t.id == id)
    }

    fn tab_mut(&mut self, id: &TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| &t.id == id)
    }

    pub fn position(&self, id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TabId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Remove the tab at `index`, moving activation to its left neighbour
    /// (or right when it was leftmost) if it was the active tab.
    fn remove_at(&mut self, index: usize) -> Tab {
        let tab = self.tabs.remove(index);
        if self.active_tab_id.as_ref() == Some(&tab.id) {
            let fallback = if index > 0 { index - 1 } else { 0 };
            self.active_tab_id = self.tabs.get(fallback).map(|t| t.id.clone());
        }
        tab
    }

    fn push_active(&mut self, tab: Tab) {
        self.active_tab_id = Some(tab.id.clone());
        self.tabs.push(tab);
    }

    /// Repair the active tab after a restore: keep it if it still exists,
    /// otherwise fall back to the first tab.
    fn repair_active(&mut self) {
        let valid = self
            .active_tab_id
            .as_ref()
            .map(|id| self.contains(id))
            .unwrap_or(false);
        if !valid {
            self.active_tab_id = self.tabs.first().map(|t| t.id.clone());
        }
    }
}

// ============================================================================
// Layout (top-level container)
// ============================================================================

/// The full set of panels plus which one is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    panels: Vec<Panel>,
    active_panel_id: PanelId,
    #[serde(default)]
    next_panel_seq: u64,
}

impl Default for Layout {
    fn default() -> Self {
        let primary = PanelId::numbered(1);
        Self {
            panels: vec![Panel::new(primary.clone())],
            active_panel_id: primary,
            next_panel_seq: 2,
        }
    }
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Panels in display order (primary first)
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn active_panel_id(&self) -> &PanelId {
        &self.active_panel_id
    }

    pub fn panel(&self, id: &PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| &p.id == id)
    }

    fn panel_mut(&mut self, id: &PanelId) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| &p.id == id)
    }

    fn panel_index(&self, id: &PanelId) -> Option<usize> {
        self.panels.iter().position(|p| &p.id == id)
    }

    pub fn active_panel(&self) -> Option<&Panel> {
        self.panel(&self.active_panel_id)
            .or_else(|| self.panels.first())
    }

    pub fn primary_panel(&self) -> Option<&Panel> {
        self.panels.first()
    }

    /// The active tab of the active panel
    pub fn focused_tab(&self) -> Option<&Tab> {
        self.active_panel().and_then(|p| p.active_tab())
    }

    /// The panel currently containing the tab, computed on demand
    pub fn find_tab_panel(&self, tab_id: &TabId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.contains(tab_id))
    }

    pub fn find_tab(&self, tab_id: &TabId) -> Option<&Tab> {
        self.panels.iter().find_map(|p| p.tab(tab_id))
    }

    pub fn contains_tab(&self, tab_id: &TabId) -> bool {
        self.find_tab_panel(tab_id).is_some()
    }

    pub fn has_two_panels(&self) -> bool {
        self.panels.len() >= 2
    }

    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.panels.iter().flat_map(|p| p.tabs.iter())
    }

    pub fn tab_count(&self) -> usize {
        self.panels.iter().map(Panel::len).sum()
    }

    // =========================================================================
    // Tab operations
    // =========================================================================

    /// Activate the tab if it is open anywhere; otherwise append it to the
    /// active panel and activate it. Never creates a panel.
    pub fn open_tab(&mut self, descriptor: TabDescriptor) {
        if let Some(panel_id) = self.find_tab_panel(&descriptor.id).map(|p| p.id.clone()) {
            self.set_active_tab(&descriptor.id, &panel_id);
            return;
        }

        let target = match self.active_panel() {
            Some(panel) => panel.id.clone(),
            None => return,
        };
        if let Some(panel) = self.panel_mut(&target) {
            panel.push_active(Tab::from_descriptor(descriptor));
        }
        self.active_panel_id = target;
    }

    /// Close a tab. Pinned tabs and tabs not in `panel_id` are left alone.
    pub fn close_tab(&mut self, tab_id: &TabId, panel_id: &PanelId) {
        let Some(panel) = self.panel_mut(panel_id) else {
            return;
        };
        let Some(index) = panel.position(tab_id) else {
            return;
        };
        if panel.tabs[index].is_pinned {
            return;
        }
        panel.remove_at(index);
        self.prune_empty_panels();
    }

    /// Close every unpinned tab in the panel except `tab_id`, which becomes active
    pub fn close_other_tabs(&mut self, tab_id: &TabId, panel_id: &PanelId) {
        let Some(panel) = self.panel(panel_id) else {
            return;
        };
        if !panel.contains(tab_id) {
            return;
        }
        let doomed: Vec<TabId> = panel
            .tabs
            .iter()
            .filter(|t| &t.id != tab_id && !t.is_pinned)
            .map(|t| t.id.clone())
            .collect();
        for id in &doomed {
            self.close_tab(id, panel_id);
        }
        self.set_active_tab(tab_id, panel_id);
    }

    /// Close every unpinned tab in the panel
    pub fn close_all_tabs(&mut self, panel_id: &PanelId) {
        let Some(panel) = self.panel(panel_id) else {
            return;
        };
        let doomed: Vec<TabId> = panel
            .tabs
            .iter()
            .filter(|t| !t.is_pinned)
            .map(|t| t.id.clone())
            .collect();
        for id in &doomed {
            self.close_tab(id, panel_id);
        }
    }

    /// Ids the given close would actually remove (pinned tabs excluded)
    pub fn closable_tabs(&self, panel_id: &PanelId, keep: Option<&TabId>) -> Vec<TabId> {
        self.panel(panel_id)
            .map(|p| {
                p.tabs
                    .iter()
                    .filter(|t| !t.is_pinned && Some(&t.id) != keep)
                    .map(|t| t.id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn pin_tab(&mut self, tab_id: &TabId) {
        self.set_pinned(tab_id, true);
    }

    pub fn unpin_tab(&mut self, tab_id: &TabId) {
        self.set_pinned(tab_id, false);
    }

    fn set_pinned(&mut self, tab_id: &TabId, pinned: bool) {
        if let Some(tab) = self.panels.iter_mut().find_map(|p| p.tab_mut(tab_id)) {
            tab.is_pinned = pinned;
        }
    }

    /// Make the tab active in its panel and make that panel active
    pub fn set_active_tab(&mut self, tab_id: &TabId, panel_id: &PanelId) {
        let Some(panel) = self.panel_mut(panel_id) else {
            return;
        };
        if !panel.contains(tab_id) {
            return;
        }
        panel.active_tab_id = Some(tab_id.clone());
        self.active_panel_id = panel_id.clone();
    }

    /// Update the URL a tab is showing. Returns whether anything changed.
    pub fn set_current_path(&mut self, tab_id: &TabId, path: &str) -> bool {
        match self.panels.iter_mut().find_map(|p| p.tab_mut(tab_id)) {
            Some(tab) if tab.current_path != path => {
                tab.current_path = path.to_string();
                true
            }
            _ => false,
        }
    }

    /// Move a tab to a new index within its panel (remove, then reinsert)
    pub fn reorder_tab(&mut self, panel_id: &PanelId, tab_id: &TabId, to_index: usize) {
        let Some(panel) = self.panel_mut(panel_id) else {
            return;
        };
        let Some(from) = panel.position(tab_id) else {
            return;
        };
        let tab = panel.tabs.remove(from);
        let to = to_index.min(panel.tabs.len());
        panel.tabs.insert(to, tab);
    }

    // =========================================================================
    // Panel operations
    // =========================================================================

    /// Split a tab out into a new second panel, which becomes active.
    ///
    /// No-op when two panels already exist, when the tab is unknown, or when
    /// it is the only tab of its panel.
    pub fn create_panel(&mut self, tab_id: &TabId) {
        if self.panels.len() >= MAX_PANELS {
            return;
        }
        let Some(origin) = self.find_tab_panel(tab_id).map(|p| p.id.clone()) else {
            return;
        };
        let Some(panel) = self.panel_mut(&origin) else {
            return;
        };
        if panel.len() < 2 {
            return;
        }
        let Some(index) = panel.position(tab_id) else {
            return;
        };
        let tab = panel.remove_at(index);

        let id = self.mint_panel_id();
        let mut new_panel = Panel::new(id.clone());
        new_panel.push_active(tab);
        self.panels.push(new_panel);
        self.active_panel_id = id;
    }

    /// Move a tab to the end of another panel, keeping its pinned flag.
    /// The tab becomes active there; an emptied origin panel is removed.
    pub fn move_tab_to_panel(&mut self, tab_id: &TabId, from: &PanelId, to: &PanelId) {
        if from == to || self.panel(to).is_none() {
            return;
        }
        let Some(origin) = self.panel_mut(from) else {
            return;
        };
        let Some(index) = origin.position(tab_id) else {
            return;
        };
        let tab = origin.remove_at(index);
        if let Some(target) = self.panel_mut(to) {
            target.push_active(tab);
        }
        self.active_panel_id = to.clone();
        self.prune_empty_panels();
    }

    /// Fold every non-primary panel into the primary one, preserving order.
    /// Idempotent: a single-panel layout is left untouched.
    pub fn merge_into_primary(&mut self) {
        if self.panels.len() < 2 {
            return;
        }
        let secondary_was_active = self.panels[0].id != self.active_panel_id;
        let extras: Vec<Panel> = self.panels.drain(1..).collect();
        let primary = &mut self.panels[0];
        for extra in extras {
            if secondary_was_active && extra.active_tab_id.is_some() {
                primary.active_tab_id = extra.active_tab_id.clone();
            }
            primary.tabs.extend(extra.tabs);
        }
        primary.repair_active();
        self.active_panel_id = primary.id.clone();
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    /// Drop emptied panels. The last remaining panel is never removed.
    fn prune_empty_panels(&mut self) {
        if self.panels.len() > 1 {
            self.panels.retain(|p| !p.is_empty());
            if self.panels.is_empty() {
                // Every panel was empty; keep a fresh primary
                let id = self.mint_panel_id();
                self.panels.push(Panel::new(id));
            }
        }
        if self.panel(&self.active_panel_id).is_none() {
            if let Some(first) = self.panels.first() {
                self.active_panel_id = first.id.clone();
            }
        }
    }

    fn mint_panel_id(&mut self) -> PanelId {
        loop {
            let id = PanelId::numbered(self.next_panel_seq.max(1));
            self.next_panel_seq = self.next_panel_seq.max(1) + 1;
            if self.panel(&id).is_none() {
                return id;
            }
        }
    }

    /// Repair a layout read from storage so it satisfies every invariant:
    /// at most two panels, unique tab ids, no empty secondary panel, valid
    /// active ids.
    pub fn normalized(mut self) -> Self {
        if self.panels.is_empty() {
            return Self::default();
        }

        if self.panels.len() > MAX_PANELS {
            let extras: Vec<Panel> = self.panels.drain(MAX_PANELS..).collect();
            let last = &mut self.panels[MAX_PANELS - 1];
            for extra in extras {
                last.tabs.extend(extra.tabs);
            }
        }

        let mut seen = HashSet::new();
        for panel in &mut self.panels {
            panel.tabs.retain(|t| seen.insert(t.id.clone()));
            panel.repair_active();
        }

        let mut seen_panels = HashSet::new();
        self.panels.retain(|p| seen_panels.insert(p.id.clone()));

        self.prune_empty_panels();
        self
    }

    /// Describe the first violated invariant, if any
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.panels.is_empty() || self.panels.len() > MAX_PANELS {
            return Err(format!("panel count {} out of range", self.panels.len()));
        }
        if self.panels.len() > 1 {
            if let Some(empty) = self.panels.iter().find(|p| p.is_empty()) {
                return Err(format!("panel {} is empty", empty.id));
            }
        }
        if self.panel(&self.active_panel_id).is_none() {
            return Err(format!("active panel {} missing", self.active_panel_id));
        }
        let mut seen = HashSet::new();
        for panel in &self.panels {
            for tab in &panel.tabs {
                if !seen.insert(&tab.id) {
                    return Err(format!("duplicate tab id {}", tab.id));
                }
            }
            match (&panel.active_tab_id, panel.is_empty()) {
                (None, false) => return Err(format!("panel {} has no active tab", panel.id)),
                (Some(id), _) if !panel.contains(id) => {
                    return Err(format!("panel {} active tab {} missing", panel.id, id))
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Panic on a violated invariant (debug builds only)
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self, context: &str) {
        if let Err(e) = self.check_invariants() {
            panic!("layout invariant violated after {}: {}", context, e);
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self, _context: &str) {}
}

// ============================================================================
// Persisted snapshot
// ============================================================================

/// Serialized projection of the layout written to storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Schema version for forward compatibility
    pub version: u32,
    pub layout: Layout,
}

impl LayoutSnapshot {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn capture(layout: &Layout) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            layout: layout.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored snapshot; unknown versions are rejected.
    /// The returned layout is normalized.
    pub fn restore(json: &str) -> Option<Layout> {
        let snapshot: LayoutSnapshot = match serde_json::from_str(json) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(target: "storage", "Discarding unreadable layout snapshot: {}", e);
                return None;
            }
        };
        if snapshot.version != Self::CURRENT_VERSION {
            tracing::warn!(
                target: "storage",
                "Discarding layout snapshot with unknown version {}",
                snapshot.version
            );
            return None;
        }
        Some(snapshot.layout.normalized())
    }
}
