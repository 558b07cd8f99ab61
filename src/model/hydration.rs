//! Hydration gate - restores the persisted layout exactly once per session
//!
//! Until the gate opens, nothing that depends on tab/panel state is projected
//! and nothing is persisted, so the in-memory default layout can never
//! overwrite what is in storage.

use super::layout::{Layout, LayoutSnapshot};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HydrationState {
    #[default]
    Pending,
    Hydrated,
}

/// What a hydrate request produced
#[derive(Debug, Clone, PartialEq)]
pub enum HydrationOutcome {
    /// The gate was already open; nothing was read
    AlreadyHydrated,
    /// A stored snapshot was found and normalized
    Restored(Layout),
    /// Nothing usable in storage; keep the default layout
    Defaults,
}

#[derive(Debug, Clone, Default)]
pub struct HydrationGate {
    state: HydrationState,
}

impl HydrationGate {
    pub fn state(&self) -> HydrationState {
        self.state
    }

    pub fn is_hydrated(&self) -> bool {
        self.state == HydrationState::Hydrated
    }

    /// Open the gate without reading storage (fresh session)
    pub fn skip(&mut self) {
        self.state = HydrationState::Hydrated;
    }

    /// Read the snapshot under `key` and open the gate. Only the first call reads.
    pub fn hydrate(&mut self, store: &dyn KeyValueStore, key: &str) -> HydrationOutcome {
        if self.is_hydrated() {
            tracing::debug!(target: "storage", "Hydrate for {} ignored, already hydrated", key);
            return HydrationOutcome::AlreadyHydrated;
        }
        self.state = HydrationState::Hydrated;

        let raw = match store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(target: "storage", "No stored layout for {}", key);
                return HydrationOutcome::Defaults;
            }
            Err(e) => {
                tracing::warn!(target: "storage", "Failed to read layout {}: {:#}", key, e);
                return HydrationOutcome::Defaults;
            }
        };

        match LayoutSnapshot::restore(&raw) {
            Some(layout) => {
                tracing::info!(
                    target: "storage",
                    "Restored layout {} ({} panels, {} tabs)",
                    key,
                    layout.panels().len(),
                    layout.tab_count()
                );
                HydrationOutcome::Restored(layout)
            }
            None => HydrationOutcome::Defaults,
        }
    }
}
