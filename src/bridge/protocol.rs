//! Bridge message schema shared by the host and embedded documents
//!
//! Every message on the wire is a flat JSON object:
//!
//! ```json
//! { "type": "NAVIGATE", "panelId": "panel-1", "tabId": "customers",
//!   "payload": { "path": "/admin/customers/42", "replace": false } }
//! ```
//!
//! `payload` may be omitted for `READY` and `FOCUS`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::model::{PanelId, TabId};

/// Discriminant of a bridge message (`type` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Ready,
    Navigate,
    FormDirty,
    Download,
    DownloadZip,
    Focus,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Ready => "READY",
            MessageKind::Navigate => "NAVIGATE",
            MessageKind::FormDirty => "FORM_DIRTY",
            MessageKind::Download => "DOWNLOAD",
            MessageKind::DownloadZip => "DOWNLOAD_ZIP",
            MessageKind::Focus => "FOCUS",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "READY" => Some(MessageKind::Ready),
            "NAVIGATE" => Some(MessageKind::Navigate),
            "FORM_DIRTY" => Some(MessageKind::FormDirty),
            "DOWNLOAD" => Some(MessageKind::Download),
            "DOWNLOAD_ZIP" => Some(MessageKind::DownloadZip),
            "FOCUS" => Some(MessageKind::Focus),
            _ => None,
        }
    }
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct NavigatePayload {
    path: String,
    #[serde(default)]
    replace: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormDirtyPayload {
    is_dirty: bool,
    #[serde(default)]
    form_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadPayload {
    url: String,
    file_name: String,
    #[serde(default)]
    presigned_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadZipPayload {
    zip_url: String,
    zip_file_name: String,
}

/// A decoded bridge message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeMessage {
    /// Child mounted and can receive commands
    Ready,
    /// Child's own route changed
    Navigate { path: String, replace: bool },
    /// A form inside the child became dirty or clean
    FormDirty {
        is_dirty: bool,
        form_id: Option<String>,
    },
    /// Delegate a file download to the host
    Download {
        url: String,
        file_name: String,
        presigned_url: Option<String>,
    },
    /// Delegate an archive download to the host
    DownloadZip {
        zip_url: String,
        zip_file_name: String,
    },
    /// Host asks the child to take input focus
    Focus,
}

impl BridgeMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            BridgeMessage::Ready => MessageKind::Ready,
            BridgeMessage::Navigate { .. } => MessageKind::Navigate,
            BridgeMessage::FormDirty { .. } => MessageKind::FormDirty,
            BridgeMessage::Download { .. } => MessageKind::Download,
            BridgeMessage::DownloadZip { .. } => MessageKind::DownloadZip,
            BridgeMessage::Focus => MessageKind::Focus,
        }
    }

    fn payload(&self) -> Value {
        match self {
            BridgeMessage::Ready | BridgeMessage::Focus => json!({}),
            BridgeMessage::Navigate { path, replace } => json!({
                "path": path,
                "replace": replace,
            }),
            BridgeMessage::FormDirty { is_dirty, form_id } => {
                let mut payload = json!({ "isDirty": is_dirty });
                if let Some(form_id) = form_id {
                    payload["formId"] = json!(form_id);
                }
                payload
            }
            BridgeMessage::Download {
                url,
                file_name,
                presigned_url,
            } => {
                let mut payload = json!({ "url": url, "fileName": file_name });
                if let Some(presigned) = presigned_url {
                    payload["presignedUrl"] = json!(presigned);
                }
                payload
            }
            BridgeMessage::DownloadZip {
                zip_url,
                zip_file_name,
            } => json!({ "zipUrl": zip_url, "zipFileName": zip_file_name }),
        }
    }

    fn from_payload(kind: MessageKind, payload: Value) -> Result<Self, DecodeError> {
        let bad = |source| DecodeError::Payload { kind, source };
        Ok(match kind {
            MessageKind::Ready => BridgeMessage::Ready,
            MessageKind::Focus => BridgeMessage::Focus,
            MessageKind::Navigate => {
                let p: NavigatePayload = serde_json::from_value(payload).map_err(bad)?;
                BridgeMessage::Navigate {
                    path: p.path,
                    replace: p.replace.unwrap_or(false),
                }
            }
            MessageKind::FormDirty => {
                let p: FormDirtyPayload = serde_json::from_value(payload).map_err(bad)?;
                BridgeMessage::FormDirty {
                    is_dirty: p.is_dirty,
                    form_id: p.form_id,
                }
            }
            MessageKind::Download => {
                let p: DownloadPayload = serde_json::from_value(payload).map_err(bad)?;
                BridgeMessage::Download {
                    url: p.url,
                    file_name: p.file_name,
                    presigned_url: p.presigned_url.filter(|u| !u.is_empty()),
                }
            }
            MessageKind::DownloadZip => {
                let p: DownloadZipPayload = serde_json::from_value(payload).map_err(bad)?;
                BridgeMessage::DownloadZip {
                    zip_url: p.zip_url,
                    zip_file_name: p.zip_file_name,
                }
            }
        })
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Why an inbound payload could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("message data is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),
    #[error("message data is not a JSON object")]
    NotAnObject,
    #[error("message has no string `type` field")]
    MissingType,
    #[error("unknown message type {0:?}")]
    UnknownType(String),
    #[error("invalid payload for {}: {source}", kind.as_str())]
    Payload {
        kind: MessageKind,
        #[source]
        source: serde_json::Error,
    },
}

/// A message plus the identity of the document it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub message: BridgeMessage,
    pub panel_id: Option<PanelId>,
    pub tab_id: Option<TabId>,
}

impl Envelope {
    pub fn new(message: BridgeMessage, panel_id: Option<PanelId>, tab_id: Option<TabId>) -> Self {
        Self {
            message,
            panel_id,
            tab_id,
        }
    }

    /// Wire representation as a JSON value
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), json!(self.message.kind().as_str()));
        if let Some(panel_id) = &self.panel_id {
            obj.insert("panelId".into(), json!(panel_id.as_str()));
        }
        if let Some(tab_id) = &self.tab_id {
            obj.insert("tabId".into(), json!(tab_id.as_str()));
        }
        obj.insert("payload".into(), self.message.payload());
        Value::Object(obj)
    }

    pub fn encode(&self) -> String {
        self.to_value().to_string()
    }

    /// Decode a message posted as a JSON string
    pub fn decode(data: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(data).map_err(DecodeError::NotJson)?;
        Self::from_value(&value)
    }

    /// Decode a message posted as a structured object
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let obj = value.as_object().ok_or(DecodeError::NotAnObject)?;
        let type_name = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingType)?;
        let kind = MessageKind::from_wire(type_name)
            .ok_or_else(|| DecodeError::UnknownType(type_name.to_string()))?;

        let payload = match obj.get("payload") {
            None | Some(Value::Null) => json!({}),
            Some(p) => p.clone(),
        };
        let message = BridgeMessage::from_payload(kind, payload)?;

        Ok(Self {
            message,
            panel_id: id_field(obj, "panelId").map(PanelId::new),
            tab_id: id_field(obj, "tabId").map(TabId::new),
        })
    }
}

/// Read an identity field; absent, non-string and empty values all mean "not sent"
fn id_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_navigate_with_identity() {
        let env = Envelope::decode(
            r#"{"type":"NAVIGATE","panelId":"panel-1","tabId":"customers","payload":{"path":"/admin/customers/7"}}"#,
        )
        .unwrap();
        assert_eq!(env.tab_id, Some(TabId::new("customers")));
        assert_eq!(env.panel_id, Some(PanelId::new("panel-1")));
        assert_eq!(
            env.message,
            BridgeMessage::Navigate {
                path: "/admin/customers/7".into(),
                replace: false
            }
        );
    }

    #[test]
    fn test_ready_without_payload() {
        let env = Envelope::decode(r#"{"type":"READY","tabId":"notices"}"#).unwrap();
        assert_eq!(env.message, BridgeMessage::Ready);
        assert_eq!(env.panel_id, None);
    }

    #[test]
    fn test_encode_is_flat_and_camel_case() {
        let env = Envelope::new(
            BridgeMessage::Download {
                url: "/files/1".into(),
                file_name: "report.pdf".into(),
                presigned_url: Some("https://s3/obj".into()),
            },
            Some(PanelId::new("panel-2")),
            Some(TabId::new("files")),
        );
        let value = env.to_value();
        assert_eq!(value["type"], "DOWNLOAD");
        assert_eq!(value["panelId"], "panel-2");
        assert_eq!(value["payload"]["fileName"], "report.pdf");
        assert_eq!(value["payload"]["presignedUrl"], "https://s3/obj");
        assert_eq!(Envelope::from_value(&value).unwrap(), env);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            Envelope::decode("not json"),
            Err(DecodeError::NotJson(_))
        ));
        assert!(matches!(
            Envelope::decode("[1,2]"),
            Err(DecodeError::NotAnObject)
        ));
        assert!(matches!(
            Envelope::decode(r#"{"payload":{}}"#),
            Err(DecodeError::MissingType)
        ));
        assert!(matches!(
            Envelope::decode(r#"{"type":"EXPLODE"}"#),
            Err(DecodeError::UnknownType(t)) if t == "EXPLODE"
        ));
        assert!(matches!(
            Envelope::decode(r#"{"type":"FORM_DIRTY","payload":{"formId":"x"}}"#),
            Err(DecodeError::Payload { kind: MessageKind::FormDirty, .. })
        ));
    }
}
