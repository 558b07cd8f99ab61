//! Unsaved-form tracking per tab, fed by `FORM_DIRTY` bridge messages.
//! A tab that never reported is clean.

use std::collections::{HashMap, HashSet};

use super::layout::{Layout, TabId};

#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    forms: HashMap<TabId, HashSet<String>>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a form's state. Forms without an id share the `""` slot.
    /// Returns whether the tab's overall dirty flag changed.
    pub fn set(&mut self, tab_id: &TabId, form_id: Option<&str>, is_dirty: bool) -> bool {
        let was_dirty = self.is_dirty(tab_id);
        let key = form_id.unwrap_or_default().to_string();
        if is_dirty {
            self.forms.entry(tab_id.clone()).or_default().insert(key);
        } else if let Some(forms) = self.forms.get_mut(tab_id) {
            forms.remove(&key);
            if forms.is_empty() {
                self.forms.remove(tab_id);
            }
        }
        was_dirty != self.is_dirty(tab_id)
    }

    pub fn is_dirty(&self, tab_id: &TabId) -> bool {
        self.forms.get(tab_id).is_some_and(|f| !f.is_empty())
    }

    /// The subset of `tab_ids` with unsaved forms, in the given order
    pub fn dirty_among(&self, tab_ids: &[TabId]) -> Vec<TabId> {
        tab_ids
            .iter()
            .filter(|id| self.is_dirty(id))
            .cloned()
            .collect()
    }

    /// Drop state for tabs that are no longer open
    pub fn retain_open(&mut self, layout: &Layout) {
        self.forms.retain(|tab, _| layout.contains_tab(tab));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TabDescriptor;

    #[test]
    fn test_tab_dirty_until_every_form_clean() {
        let mut dirty = DirtyTracker::new();
        let tab = TabId::new("customers");

        assert!(dirty.set(&tab, Some("profile"), true));
        assert!(!dirty.set(&tab, Some("address"), true));
        assert!(!dirty.set(&tab, Some("profile"), false));
        assert!(dirty.is_dirty(&tab));
        assert!(dirty.set(&tab, Some("address"), false));
        assert!(!dirty.is_dirty(&tab));
    }

    #[test]
    fn test_clean_report_for_unknown_tab_is_noop() {
        let mut dirty = DirtyTracker::new();
        assert!(!dirty.set(&TabId::new("x"), None, false));
        assert!(!dirty.is_dirty(&TabId::new("x")));
    }

    #[test]
    fn test_closed_tabs_are_dropped() {
        let mut dirty = DirtyTracker::new();
        let mut layout = Layout::new();
        layout.open_tab(TabDescriptor::new("customers", "Customers", "/admin/customers"));
        dirty.set(&TabId::new("customers"), None, true);
        dirty.set(&TabId::new("notices"), Some("draft"), true);

        dirty.retain_open(&layout);

        assert!(dirty.is_dirty(&TabId::new("customers")));
        assert!(!dirty.is_dirty(&TabId::new("notices")));
    }
}
