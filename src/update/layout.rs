//! Layout message handlers (tabs, panels, guarded closes)

use crate::bridge::BridgeMessage;
use crate::commands::Cmd;
use crate::messages::{CloseRequest, LayoutMsg};
use crate::model::{Layout, LayoutSnapshot, TabId, WorkspaceModel};

/// Pure store transition. Stale ids make the step a no-op.
pub fn reduce(layout: &Layout, msg: &LayoutMsg) -> Layout {
    let mut next = layout.clone();
    match msg {
        LayoutMsg::OpenTab(descriptor) => next.open_tab(descriptor.clone()),
        LayoutMsg::CloseTab { tab_id, panel_id } => next.close_tab(tab_id, panel_id),
        LayoutMsg::CloseOtherTabs { tab_id, panel_id } => next.close_other_tabs(tab_id, panel_id),
        LayoutMsg::CloseAllTabs { panel_id } => next.close_all_tabs(panel_id),
        LayoutMsg::PinTab { tab_id } => next.pin_tab(tab_id),
        LayoutMsg::UnpinTab { tab_id } => next.unpin_tab(tab_id),
        LayoutMsg::SetActiveTab { tab_id, panel_id } => next.set_active_tab(tab_id, panel_id),
        LayoutMsg::SetCurrentPath { tab_id, path } => {
            next.set_current_path(tab_id, path);
        }
        LayoutMsg::ReorderTab {
            panel_id,
            tab_id,
            to_index,
        } => next.reorder_tab(panel_id, tab_id, *to_index),
        LayoutMsg::CreatePanel { tab_id } => next.create_panel(tab_id),
        LayoutMsg::MoveTabToPanel { tab_id, from, to } => next.move_tab_to_panel(tab_id, from, to),
        LayoutMsg::MergeIntoPrimary => next.merge_into_primary(),
    }
    next
}

/// Handle layout messages. Returns `None` when the step changed nothing.
pub fn update_layout(model: &mut WorkspaceModel, msg: LayoutMsg) -> Option<Cmd> {
    let next = reduce(&model.layout, &msg);
    if next == model.layout {
        tracing::trace!(target: "layout", "{:?} left the layout unchanged", msg);
        return None;
    }
    commit(model, next)
}

/// Install a new layout produced by one or more `reduce` steps
pub(crate) fn commit(model: &mut WorkspaceModel, next: Layout) -> Option<Cmd> {
    if next == model.layout {
        return None;
    }
    let focused_before = model.layout.focused_tab().map(|t| t.id.clone());
    model.layout = next;
    Some(layout_changed(model, focused_before))
}

/// Bookkeeping after any layout change: forget state of closed tabs, focus a
/// newly focused child that is ready, and persist.
pub(crate) fn layout_changed(model: &mut WorkspaceModel, focused_before: Option<TabId>) -> Cmd {
    model.dirty.retain_open(&model.layout);
    model.router.retain_open(&model.layout);

    let mut cmds = vec![Cmd::Redraw];
    if let Some(focus) = focus_cmd(model, focused_before.as_ref()) {
        cmds.push(focus);
    }
    if let Some(persist) = persist_cmd(model) {
        cmds.push(persist);
    }
    Cmd::from_vec(cmds).unwrap_or_default()
}

/// Snapshot write, suppressed until the hydration gate opens
pub(crate) fn persist_cmd(model: &WorkspaceModel) -> Option<Cmd> {
    if !model.hydration.is_hydrated() {
        tracing::debug!(target: "storage", "Persist suppressed until hydration completes");
        return None;
    }
    Some(Cmd::PersistLayout(LayoutSnapshot::capture(&model.layout)))
}

/// `FOCUS` for the focused tab if it just became focused and its child is ready
fn focus_cmd(model: &WorkspaceModel, focused_before: Option<&TabId>) -> Option<Cmd> {
    let focused = &model.layout.focused_tab()?.id;
    if Some(focused) == focused_before || !model.router.is_ready(focused) {
        return None;
    }
    model
        .router
        .command(&model.layout, focused, BridgeMessage::Focus)
        .map(Cmd::PostToChild)
}

/// Handle a user close. Tabs with unsaved forms turn the close into a
/// confirmation request and leave the layout untouched.
pub fn update_close(model: &mut WorkspaceModel, request: CloseRequest) -> Option<Cmd> {
    let doomed: Vec<TabId> = match &request {
        CloseRequest::Tab { tab_id, panel_id } => model
            .layout
            .panel(panel_id)
            .and_then(|p| p.tab(tab_id))
            .filter(|t| !t.is_pinned)
            .map(|t| vec![t.id.clone()])
            .unwrap_or_default(),
        CloseRequest::Others { tab_id, panel_id } => {
            if model.layout.panel(panel_id).is_some_and(|p| p.contains(tab_id)) {
                model.layout.closable_tabs(panel_id, Some(tab_id))
            } else {
                Vec::new()
            }
        }
        CloseRequest::All { panel_id } => model.layout.closable_tabs(panel_id, None),
    };

    let dirty = model.dirty.dirty_among(&doomed);
    if !dirty.is_empty() {
        tracing::info!(
            target: "layout",
            "Close of {:?} held back: unsaved forms in {:?}",
            request,
            dirty
        );
        return Some(Cmd::ConfirmDiscard {
            request,
            tab_ids: dirty,
        });
    }

    update_layout(model, request.into_layout_msg())
}
