//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use paneframe::bridge::InboundEvent;
use paneframe::commands::Cmd;
use paneframe::config::WorkspaceConfig;
use paneframe::messages::{BridgeMsg, LayoutMsg, Msg, ViewportMsg};
use paneframe::model::{PanelId, TabDescriptor, TabId, WorkspaceModel};
use paneframe::runtime::Host;
use paneframe::storage::MemoryStore;
use paneframe::update::update;
use serde_json::Value;

pub const HOST: &str = "http://localhost:3000";
pub const FOREIGN: &str = "https://evil.example";

/// Hydrated model on a wide viewport with the default menu
pub fn test_model() -> WorkspaceModel {
    let mut model = WorkspaceModel::new(WorkspaceConfig::default());
    model.hydration.skip();
    update(&mut model, Msg::Viewport(ViewportMsg::Resized { width: 1280 }));
    model
}

pub fn desc(id: &str) -> TabDescriptor {
    TabDescriptor::new(id, id.to_uppercase(), format!("/admin/{}", id))
}

/// Hydrated model with tabs opened in order in the primary panel
pub fn model_with_tabs(ids: &[&str]) -> WorkspaceModel {
    let mut model = test_model();
    for id in ids {
        update(&mut model, Msg::Layout(LayoutMsg::OpenTab(desc(id))));
    }
    model
}

pub fn tab(id: &str) -> TabId {
    TabId::new(id)
}

pub fn panel(id: &str) -> PanelId {
    PanelId::new(id)
}

/// Tab ids of every panel, in display order
pub fn tab_ids(model: &WorkspaceModel) -> Vec<Vec<String>> {
    model
        .layout
        .panels()
        .iter()
        .map(|p| p.tabs().iter().map(|t| t.id.to_string()).collect())
        .collect()
}

pub fn focused(model: &WorkspaceModel) -> Option<String> {
    model.layout.focused_tab().map(|t| t.id.to_string())
}

pub fn inbound(origin: &str, data: Value) -> Msg {
    Msg::Bridge(BridgeMsg::Inbound(InboundEvent::new(origin, data)))
}

/// Flatten whatever `update` returned into execution order
pub fn flat(cmd: Option<Cmd>) -> Vec<Cmd> {
    cmd.map(Cmd::into_flat).unwrap_or_default()
}

pub fn persisted(cmds: &[Cmd]) -> bool {
    cmds.iter().any(|c| matches!(c, Cmd::PersistLayout(_)))
}

/// Runtime host over an in-memory store, not yet hydrated
pub fn test_host() -> Host {
    Host::new(WorkspaceConfig::default(), Box::new(MemoryStore::new()), "alice")
}

/// Runtime host whose store already holds `json` for user `alice`
pub fn host_with_stored(json: &str) -> Host {
    use paneframe::storage::{layout_key, KeyValueStore, DEFAULT_NAMESPACE};
    let mut store = MemoryStore::new();
    store
        .set(&layout_key(DEFAULT_NAMESPACE, "alice"), json)
        .unwrap();
    Host::new(WorkspaceConfig::default(), Box::new(store), "alice")
}
