//! Central message router - the host's single inbound listener
//!
//! Every inbound event goes through the same pipeline:
//! origin guard → decode → resolve target tab against the *current* layout →
//! fan out to subscribers. Messages are fire-and-forget, so the sender's idea
//! of which tab or panel exists may be stale; resolution never trusts it.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::origin::OriginGuard;
use super::protocol::{BridgeMessage, Envelope, MessageKind};
use crate::model::{Layout, PanelId, TabId};

/// A message event as the browser delivers it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub origin: String,
    /// Structured object, or a JSON string from older senders
    pub data: Value,
}

impl InboundEvent {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// A message resolved to a tab that is open right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedMessage {
    pub tab_id: TabId,
    /// Panel currently holding the tab (not necessarily the one the sender named)
    pub panel_id: PanelId,
    pub message: BridgeMessage,
    /// Resolved through `panelId` because the sender did not include `tabId`
    pub via_panel_fallback: bool,
}

/// Why an inbound event had no effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    ForeignOrigin(String),
    Undecodable(String),
    /// Host-to-child commands are never accepted inbound
    NotInbound(MessageKind),
    /// The tab was closed after the message was sent
    StaleTab(TabId),
    UnknownPanel(PanelId),
    EmptyPanel(PanelId),
    NoIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

#[derive(Debug, Clone)]
struct Subscription {
    /// `None` listens to every tab
    tab: Option<TabId>,
    /// `None` listens to every kind
    kinds: Option<Vec<MessageKind>>,
}

impl Subscription {
    fn matches(&self, routed: &RoutedMessage) -> bool {
        let tab_ok = self.tab.as_ref().map_or(true, |t| *t == routed.tab_id);
        let kind_ok = self
            .kinds
            .as_ref()
            .map_or(true, |kinds| kinds.contains(&routed.message.kind()));
        tab_ok && kind_ok
    }
}

/// Host-side router state
#[derive(Debug, Clone)]
pub struct MessageRouter {
    guard: OriginGuard,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    next_subscription: u64,
    ready: HashSet<TabId>,
}

impl MessageRouter {
    pub fn new(host_origin: &str) -> Self {
        Self {
            guard: OriginGuard::new(host_origin),
            subscriptions: BTreeMap::new(),
            next_subscription: 1,
            ready: HashSet::new(),
        }
    }

    pub fn guard(&self) -> &OriginGuard {
        &self.guard
    }

    /// Resolve an inbound event against the current layout
    pub fn route(
        &self,
        event: &InboundEvent,
        layout: &Layout,
    ) -> Result<RoutedMessage, DropReason> {
        if !self.guard.allows(&event.origin) {
            return Err(DropReason::ForeignOrigin(event.origin.clone()));
        }

        let decoded = match &event.data {
            Value::String(text) => Envelope::decode(text),
            other => Envelope::from_value(other),
        };
        let envelope = decoded.map_err(|e| DropReason::Undecodable(e.to_string()))?;

        if envelope.message.kind() == MessageKind::Focus {
            return Err(DropReason::NotInbound(MessageKind::Focus));
        }

        match (envelope.tab_id, envelope.panel_id) {
            (Some(tab_id), _) => {
                let panel = layout
                    .find_tab_panel(&tab_id)
                    .ok_or_else(|| DropReason::StaleTab(tab_id.clone()))?;
                Ok(RoutedMessage {
                    panel_id: panel.id.clone(),
                    tab_id,
                    message: envelope.message,
                    via_panel_fallback: false,
                })
            }
            (None, Some(panel_id)) => {
                let panel = layout
                    .panel(&panel_id)
                    .ok_or_else(|| DropReason::UnknownPanel(panel_id.clone()))?;
                let tab = panel
                    .active_tab()
                    .ok_or_else(|| DropReason::EmptyPanel(panel_id.clone()))?;
                Ok(RoutedMessage {
                    tab_id: tab.id.clone(),
                    panel_id,
                    message: envelope.message,
                    via_panel_fallback: true,
                })
            }
            (None, None) => Err(DropReason::NoIdentity),
        }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Listen to messages for one tab (or all tabs), optionally filtered by kind
    pub fn subscribe(
        &mut self,
        tab: Option<TabId>,
        kinds: Option<Vec<MessageKind>>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.insert(id, Subscription { tab, kinds });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Subscribers interested in a routed message, in subscription order
    pub fn subscribers_for(&self, routed: &RoutedMessage) -> Vec<SubscriptionId> {
        self.subscriptions
            .iter()
            .filter(|(_, sub)| sub.matches(routed))
            .map(|(id, _)| *id)
            .collect()
    }

    // =========================================================================
    // Child readiness
    // =========================================================================

    pub fn mark_ready(&mut self, tab_id: &TabId) {
        self.ready.insert(tab_id.clone());
    }

    pub fn is_ready(&self, tab_id: &TabId) -> bool {
        self.ready.contains(tab_id)
    }

    /// Forget children whose tabs are no longer open
    pub fn retain_open(&mut self, layout: &Layout) {
        self.ready.retain(|tab| layout.contains_tab(tab));
    }

    /// Encode a host → child command for a tab, if the tab is open
    pub fn command(
        &self,
        layout: &Layout,
        tab_id: &TabId,
        message: BridgeMessage,
    ) -> Option<ChildPost> {
        let panel = layout.find_tab_panel(tab_id)?;
        let target_origin = self.guard.target_origin()?;
        let envelope = Envelope::new(message, Some(panel.id.clone()), Some(tab_id.clone()));
        Some(ChildPost {
            panel_id: panel.id.clone(),
            tab_id: tab_id.clone(),
            target_origin,
            data: envelope.to_value(),
        })
    }
}

/// A `postMessage` from the host into one embedded document
#[derive(Debug, Clone, PartialEq)]
pub struct ChildPost {
    pub panel_id: PanelId,
    pub tab_id: TabId,
    pub target_origin: String,
    pub data: Value,
}
