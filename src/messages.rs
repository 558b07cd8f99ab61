//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use serde::Deserialize;

use crate::bridge::InboundEvent;
use crate::model::{DropZone, HydrationOutcome, PanelId, Point, TabDescriptor, TabId};

/// Workspace store transitions. Every variant is a pure `(Layout, msg) -> Layout`
/// step; ids that no longer exist make the step a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum LayoutMsg {
    /// Activate the tab if open anywhere, else append it to the active panel
    OpenTab(TabDescriptor),
    #[serde(rename_all = "camelCase")]
    CloseTab { tab_id: TabId, panel_id: PanelId },
    #[serde(rename_all = "camelCase")]
    CloseOtherTabs { tab_id: TabId, panel_id: PanelId },
    #[serde(rename_all = "camelCase")]
    CloseAllTabs { panel_id: PanelId },
    #[serde(rename_all = "camelCase")]
    PinTab { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    UnpinTab { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    SetActiveTab { tab_id: TabId, panel_id: PanelId },
    #[serde(rename_all = "camelCase")]
    SetCurrentPath { tab_id: TabId, path: String },
    #[serde(rename_all = "camelCase")]
    ReorderTab {
        panel_id: PanelId,
        tab_id: TabId,
        to_index: usize,
    },
    /// Split the tab out into a new second panel
    #[serde(rename_all = "camelCase")]
    CreatePanel { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    MoveTabToPanel {
        tab_id: TabId,
        from: PanelId,
        to: PanelId,
    },
    /// Fold the second panel into the first (responsive collapse)
    MergeIntoPrimary,
}

/// User-initiated closes, checked against unsaved forms first
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "scope", rename_all = "camelCase")]
pub enum CloseRequest {
    #[serde(rename_all = "camelCase")]
    Tab { tab_id: TabId, panel_id: PanelId },
    #[serde(rename_all = "camelCase")]
    Others { tab_id: TabId, panel_id: PanelId },
    #[serde(rename_all = "camelCase")]
    All { panel_id: PanelId },
}

impl CloseRequest {
    /// The unguarded store operation, dispatched once the user confirms
    pub fn into_layout_msg(self) -> LayoutMsg {
        match self {
            CloseRequest::Tab { tab_id, panel_id } => LayoutMsg::CloseTab { tab_id, panel_id },
            CloseRequest::Others { tab_id, panel_id } => {
                LayoutMsg::CloseOtherTabs { tab_id, panel_id }
            }
            CloseRequest::All { panel_id } => LayoutMsg::CloseAllTabs { panel_id },
        }
    }
}

/// Navigation Sync input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavMsg {
    /// The outer URL changed (address bar, history, in-app link)
    UrlChanged(String),
    /// An embedded document reported its own route change
    ChildNavigated {
        tab_id: TabId,
        path: String,
        replace: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportMsg {
    Resized { width: u32 },
}

/// Pointer input for tab dragging and competing gestures
#[derive(Debug, Clone, PartialEq)]
pub enum DragMsg {
    /// Host re-measured its drop targets
    SetDropZones(Vec<DropZone>),
    PointerDown {
        pointer_id: u32,
        tab_id: TabId,
        panel_id: PanelId,
        pos: Point,
    },
    PointerMove {
        pointer_id: u32,
        pos: Point,
    },
    PointerUp {
        pointer_id: u32,
        pos: Point,
    },
    PointerCancel {
        pointer_id: u32,
    },
    MarqueeStart {
        pointer_id: u32,
    },
    MarqueeEnd {
        pointer_id: u32,
    },
    /// Window lost focus mid-gesture
    Blur,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeMsg {
    /// A raw `message` event delivered to the host window
    Inbound(InboundEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMsg {
    /// The hydration gate opened with this result
    Hydrated(HydrationOutcome),
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Layout(LayoutMsg),
    Close(CloseRequest),
    Nav(NavMsg),
    Viewport(ViewportMsg),
    Drag(DragMsg),
    Bridge(BridgeMsg),
    App(AppMsg),
}
