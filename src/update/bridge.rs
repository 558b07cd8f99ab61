//! Bridge handlers - routed child messages into host effects

use super::navigation::child_navigated;
use crate::bridge::{BridgeMessage, RoutedMessage};
use crate::commands::Cmd;
use crate::messages::BridgeMsg;
use crate::model::WorkspaceModel;

pub fn update_bridge(model: &mut WorkspaceModel, msg: BridgeMsg) -> Option<Cmd> {
    let BridgeMsg::Inbound(event) = msg;
    let routed = match model.router.route(&event, &model.layout) {
        Ok(routed) => routed,
        Err(reason) => {
            tracing::debug!(target: "bridge", "Dropped inbound message: {:?}", reason);
            return None;
        }
    };
    if routed.via_panel_fallback {
        tracing::debug!(
            target: "bridge",
            "{:?} without tabId resolved to {} via {}",
            routed.message.kind(),
            routed.tab_id,
            routed.panel_id
        );
    }

    let mut cmds = Vec::new();
    let subscribers = model.router.subscribers_for(&routed);
    if !subscribers.is_empty() {
        cmds.push(Cmd::Notify {
            subscribers,
            message: routed.clone(),
        });
    }
    if let Some(cmd) = handle_routed(model, routed) {
        cmds.push(cmd);
    }
    Cmd::from_vec(cmds)
}

fn handle_routed(model: &mut WorkspaceModel, routed: RoutedMessage) -> Option<Cmd> {
    let RoutedMessage {
        tab_id, message, ..
    } = routed;
    match message {
        BridgeMessage::Ready => {
            model.router.mark_ready(&tab_id);
            let focused = model
                .layout
                .focused_tab()
                .is_some_and(|t| t.id == tab_id);
            if !focused {
                return None;
            }
            model
                .router
                .command(&model.layout, &tab_id, BridgeMessage::Focus)
                .map(Cmd::PostToChild)
        }
        BridgeMessage::Navigate { path, replace } => {
            child_navigated(model, &tab_id, &path, replace)
        }
        BridgeMessage::FormDirty { is_dirty, form_id } => {
            if !model.dirty.set(&tab_id, form_id.as_deref(), is_dirty) {
                return None;
            }
            tracing::debug!(target: "bridge", "Tab {} dirty: {}", tab_id, is_dirty);
            Some(Cmd::Redraw)
        }
        BridgeMessage::Download {
            url,
            file_name,
            presigned_url,
        } => Some(Cmd::Download {
            url: presigned_url.filter(|u| !u.is_empty()).unwrap_or(url),
            file_name,
        }),
        BridgeMessage::DownloadZip {
            zip_url,
            zip_file_name,
        } => Some(Cmd::Download {
            url: zip_url,
            file_name: zip_file_name,
        }),
        // Host-to-child only; the router never routes it
        BridgeMessage::Focus => None,
    }
}
