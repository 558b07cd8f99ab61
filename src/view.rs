//! Read-only projection of the workspace for rendering
//!
//! The shell renders tab strips and embedded documents from this structure.
//! Nothing is projected until the hydration gate opens, so the default layout
//! never flashes before the restored one.

use serde::Serialize;

use crate::bridge::{embed_target, EmbedTarget};
use crate::model::{DropZoneKind, Panel, PanelId, Tab, TabId, WorkspaceModel};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceView {
    pub active_panel_id: PanelId,
    pub panels: Vec<PanelView>,
    /// Split affordance and split drop target visible
    pub can_split: bool,
    pub wide: bool,
    /// Zone under the pointer while a tab is being dragged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_hover: Option<DropZoneKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub id: PanelId,
    pub is_active: bool,
    pub tabs: Vec<TabView>,
    /// Document for the panel's active tab
    pub embed: Option<EmbedTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabView {
    pub id: TabId,
    pub label: String,
    pub current_path: String,
    pub is_pinned: bool,
    pub is_active: bool,
    pub is_dirty: bool,
    /// Being dragged right now
    pub is_dragging: bool,
}

/// Project the model, or `None` while hydration is pending
pub fn workspace_view(model: &WorkspaceModel) -> Option<WorkspaceView> {
    if !model.hydration.is_hydrated() {
        return None;
    }
    let dragging = model
        .drag
        .session()
        .filter(|_| model.drag.is_dragging())
        .map(|s| &s.tab_id);

    Some(WorkspaceView {
        active_panel_id: model.layout.active_panel_id().clone(),
        panels: model
            .layout
            .panels()
            .iter()
            .map(|panel| panel_view(model, panel, dragging))
            .collect(),
        can_split: model.can_split(),
        wide: model.is_wide(),
        drop_hover: model
            .drag
            .session()
            .and_then(|s| s.hover.clone()),
    })
}

fn panel_view(model: &WorkspaceModel, panel: &Panel, dragging: Option<&TabId>) -> PanelView {
    let tab_view = |tab: &Tab| TabView {
        id: tab.id.clone(),
        label: tab.label.clone(),
        current_path: tab.current_path.clone(),
        is_pinned: tab.is_pinned,
        is_active: panel.active_tab_id() == Some(&tab.id),
        is_dirty: model.dirty.is_dirty(&tab.id),
        is_dragging: dragging == Some(&tab.id),
    };
    PanelView {
        id: panel.id.clone(),
        is_active: *model.layout.active_panel_id() == panel.id,
        tabs: panel.tabs().iter().map(tab_view).collect(),
        embed: panel.active_tab().map(|tab| {
            embed_target(
                &tab.current_path,
                &model.config.host_origin,
                &panel.id,
                &tab.id,
            )
        }),
    }
}
