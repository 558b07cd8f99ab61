//! Drag/Reorder handlers - pointer gestures into store operations

use super::layout::update_layout;
use crate::commands::Cmd;
use crate::messages::{DragMsg, LayoutMsg};
use crate::model::{resolve_drop, DragRelease, DropAction, GestureKind, WorkspaceModel};

pub fn update_drag(model: &mut WorkspaceModel, msg: DragMsg) -> Option<Cmd> {
    match msg {
        DragMsg::SetDropZones(zones) => {
            model.drag.set_zones(zones);
            None
        }

        DragMsg::PointerDown {
            pointer_id,
            tab_id,
            panel_id,
            pos,
        } => {
            if !model
                .layout
                .panel(&panel_id)
                .is_some_and(|p| p.contains(&tab_id))
            {
                tracing::debug!(target: "drag", "Press on stale tab {} ignored", tab_id);
                return None;
            }
            if let Err(reason) =
                model
                    .drag
                    .pointer_down(&mut model.gestures, pointer_id, tab_id, panel_id, pos)
            {
                tracing::debug!(target: "drag", "Pointer {} ignored: {:?}", pointer_id, reason);
            }
            None
        }

        DragMsg::PointerMove { pointer_id, pos } => {
            let was_dragging = model.drag.is_dragging();
            match model.drag.pointer_move(pointer_id, pos) {
                Ok(()) if model.drag.is_dragging() || was_dragging => Some(Cmd::Redraw),
                Ok(()) => None,
                Err(reason) => {
                    tracing::trace!(target: "drag", "Move of pointer {} ignored: {:?}", pointer_id, reason);
                    None
                }
            }
        }

        DragMsg::PointerUp { pointer_id, pos } => {
            match model.drag.pointer_up(&mut model.gestures, pointer_id, pos) {
                Ok(release) => finish(model, release),
                Err(reason) => {
                    tracing::trace!(target: "drag", "Release of pointer {} ignored: {:?}", pointer_id, reason);
                    None
                }
            }
        }

        DragMsg::PointerCancel { pointer_id } => model
            .drag
            .cancel(&mut model.gestures, Some(pointer_id))
            .then_some(Cmd::Redraw),

        DragMsg::MarqueeStart { pointer_id } => {
            if !model.gestures.try_acquire(GestureKind::Marquee, pointer_id) {
                tracing::debug!(target: "drag", "Marquee for pointer {} refused, gesture busy", pointer_id);
            }
            None
        }

        DragMsg::MarqueeEnd { pointer_id } => {
            model.gestures.release(GestureKind::Marquee, pointer_id);
            None
        }

        DragMsg::Blur => {
            let cancelled = model.drag.cancel(&mut model.gestures, None);
            model.gestures.reset();
            cancelled.then_some(Cmd::Redraw)
        }
    }
}

fn finish(model: &mut WorkspaceModel, release: DragRelease) -> Option<Cmd> {
    match release {
        DragRelease::Click { tab_id, .. } => {
            // The tab may have moved or closed while the button was down
            let panel_id = model.layout.find_tab_panel(&tab_id)?.id.clone();
            update_layout(model, LayoutMsg::SetActiveTab { tab_id, panel_id })
        }
        DragRelease::Drop { tab_id, target, .. } => {
            match resolve_drop(&model.layout, &tab_id, target.as_ref(), model.is_wide()) {
                DropAction::Reorder {
                    panel_id,
                    tab_id,
                    to_index,
                } => update_layout(
                    model,
                    LayoutMsg::ReorderTab {
                        panel_id,
                        tab_id,
                        to_index,
                    },
                ),
                DropAction::MoveToPanel { tab_id, from, to } => {
                    update_layout(model, LayoutMsg::MoveTabToPanel { tab_id, from, to })
                }
                DropAction::Split { tab_id } => {
                    update_layout(model, LayoutMsg::CreatePanel { tab_id })
                }
                DropAction::Ignore(reason) => {
                    tracing::debug!(target: "drag", "Drop of {} ignored: {:?}", tab_id, reason);
                    Some(Cmd::Redraw)
                }
            }
        }
    }
}
