//! Scripted input for the headless driver
//!
//! One JSON object per line, tagged by `event`:
//!
//! ```text
//! {"event":"resize","width":1280}
//! {"event":"url","url":"/admin/customers"}
//! {"event":"message","origin":"http://localhost:3000","data":{"type":"READY","tabId":"customers"}}
//! {"event":"layout","msg":{"op":"createPanel","tabId":"customers"}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::bridge::InboundEvent;
use crate::messages::{BridgeMsg, CloseRequest, DragMsg, LayoutMsg, Msg, NavMsg, ViewportMsg};
use crate::model::{DropZone, PanelId, Point, TabId};
use crate::runtime::Host;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ScriptEvent {
    Url {
        url: String,
    },
    Resize {
        width: u32,
    },
    Message {
        origin: String,
        data: Value,
    },
    Layout {
        msg: LayoutMsg,
    },
    Close {
        request: CloseRequest,
    },
    /// The user answered "discard" to a confirmation prompt
    ConfirmDiscard {
        request: CloseRequest,
    },
    DropZones {
        zones: Vec<DropZone>,
    },
    #[serde(rename_all = "camelCase")]
    PointerDown {
        pointer_id: u32,
        tab_id: TabId,
        panel_id: PanelId,
        x: f64,
        y: f64,
    },
    #[serde(rename_all = "camelCase")]
    PointerMove {
        pointer_id: u32,
        x: f64,
        y: f64,
    },
    #[serde(rename_all = "camelCase")]
    PointerUp {
        pointer_id: u32,
        x: f64,
        y: f64,
    },
    #[serde(rename_all = "camelCase")]
    PointerCancel {
        pointer_id: u32,
    },
    Blur,
}

impl ScriptEvent {
    /// Feed the event into the host
    pub fn apply(self, host: &mut Host) {
        let msg = match self {
            ScriptEvent::ConfirmDiscard { request } => {
                host.confirm_discard(request);
                return;
            }
            ScriptEvent::Url { url } => Msg::Nav(NavMsg::UrlChanged(url)),
            ScriptEvent::Resize { width } => Msg::Viewport(ViewportMsg::Resized { width }),
            ScriptEvent::Message { origin, data } => {
                Msg::Bridge(BridgeMsg::Inbound(InboundEvent::new(origin, data)))
            }
            ScriptEvent::Layout { msg } => Msg::Layout(msg),
            ScriptEvent::Close { request } => Msg::Close(request),
            ScriptEvent::DropZones { zones } => Msg::Drag(DragMsg::SetDropZones(zones)),
            ScriptEvent::PointerDown {
                pointer_id,
                tab_id,
                panel_id,
                x,
                y,
            } => Msg::Drag(DragMsg::PointerDown {
                pointer_id,
                tab_id,
                panel_id,
                pos: Point::new(x, y),
            }),
            ScriptEvent::PointerMove { pointer_id, x, y } => Msg::Drag(DragMsg::PointerMove {
                pointer_id,
                pos: Point::new(x, y),
            }),
            ScriptEvent::PointerUp { pointer_id, x, y } => Msg::Drag(DragMsg::PointerUp {
                pointer_id,
                pos: Point::new(x, y),
            }),
            ScriptEvent::PointerCancel { pointer_id } => {
                Msg::Drag(DragMsg::PointerCancel { pointer_id })
            }
            ScriptEvent::Blur => Msg::Drag(DragMsg::Blur),
        };
        host.dispatch(msg);
    }
}

/// Parse a JSON-lines script
pub fn parse_script(text: &str) -> Result<Vec<ScriptEvent>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid event on line {}", i + 1))
        })
        .collect()
}
