//! Child bridge - runs inside each embedded document
//!
//! Works out which panel/tab the document belongs to, posts lifecycle and
//! intent messages to the host, and turns host commands into [`ChildCommand`]s.
//! A document without an identity is not embedded and the bridge stays silent.

use std::collections::HashMap;

use serde_json::Value;
use url::Url;

use super::embed::{
    is_external, query_param, with_query, PARAM_IFRAME, PARAM_PANEL_ID, PARAM_TAB_ID,
};
use super::origin::OriginGuard;
use super::protocol::{BridgeMessage, Envelope};
use crate::model::{PanelId, TabId};
use crate::storage::KeyValueStore;

/// Session cache keys for the identity fallback
pub const SESSION_PANEL_KEY: &str = "paneframe.bridge.panelId";
pub const SESSION_TAB_KEY: &str = "paneframe.bridge.tabId";

/// Which panel and tab an embedded document belongs to.
/// `tab_id` is absent for legacy hosts that only pass the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameIdentity {
    pub panel_id: PanelId,
    pub tab_id: Option<TabId>,
}

impl FrameIdentity {
    /// Read the identity from the document URL's query
    pub fn from_url(url: &Url) -> Option<Self> {
        if query_param(url, PARAM_IFRAME).as_deref() != Some("true") {
            return None;
        }
        let panel_id = query_param(url, PARAM_PANEL_ID).filter(|s| !s.is_empty())?;
        let tab_id = query_param(url, PARAM_TAB_ID).filter(|s| !s.is_empty());
        Some(Self {
            panel_id: PanelId::new(panel_id),
            tab_id: tab_id.map(TabId::new),
        })
    }

    fn from_session(session: &dyn KeyValueStore) -> Option<Self> {
        let panel_id = session.get(SESSION_PANEL_KEY).ok().flatten()?;
        let tab_id = session.get(SESSION_TAB_KEY).ok().flatten();
        Some(Self {
            panel_id: PanelId::new(panel_id),
            tab_id: tab_id.filter(|s| !s.is_empty()).map(TabId::new),
        })
    }

    fn remember(&self, session: &mut dyn KeyValueStore) {
        let tab = self.tab_id.as_ref().map(TabId::as_str).unwrap_or_default();
        let result = session
            .set(SESSION_PANEL_KEY, self.panel_id.as_str())
            .and_then(|_| session.set(SESSION_TAB_KEY, tab));
        if let Err(e) = result {
            tracing::debug!(target: "bridge", "Could not cache frame identity: {}", e);
        }
    }

    /// URL query wins; the session cache covers navigations that dropped it
    pub fn derive(url: Option<&Url>, session: &mut dyn KeyValueStore) -> Option<Self> {
        match url.and_then(Self::from_url) {
            Some(identity) => {
                identity.remember(session);
                Some(identity)
            }
            None => Self::from_session(session),
        }
    }
}

/// A `postMessage` the child should perform
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundPost {
    pub target_origin: String,
    pub data: Value,
}

/// Host command delivered to the child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildCommand {
    Focus,
}

/// Bridge endpoint inside an embedded document
#[derive(Debug, Clone)]
pub struct ChildBridge {
    identity: Option<FrameIdentity>,
    guard: OriginGuard,
    host: Option<Url>,
    ready_sent: bool,
    last_path: Option<String>,
    dirty_forms: HashMap<String, bool>,
}

impl ChildBridge {
    /// Connect from the document's current location (absolute, or relative
    /// to the host origin)
    pub fn connect(location: &str, host_origin: &str, session: &mut dyn KeyValueStore) -> Self {
        let host = Url::parse(host_origin).ok();
        let location_url = match &host {
            Some(host) => host.join(location).ok(),
            None => Url::parse(location).ok(),
        };
        let identity = FrameIdentity::derive(location_url.as_ref(), session);
        if identity.is_none() {
            tracing::debug!(target: "bridge", "No frame identity at {}, bridge disabled", location);
        }
        Self {
            identity,
            guard: OriginGuard::new(host_origin),
            host,
            ready_sent: false,
            last_path: None,
            dirty_forms: HashMap::new(),
        }
    }

    pub fn identity(&self) -> Option<&FrameIdentity> {
        self.identity.as_ref()
    }

    pub fn is_embedded(&self) -> bool {
        self.identity.is_some()
    }

    /// `READY`, at most once per document
    pub fn mount(&mut self) -> Option<OutboundPost> {
        if self.ready_sent {
            return None;
        }
        let post = self.post(BridgeMessage::Ready)?;
        self.ready_sent = true;
        Some(post)
    }

    /// `NAVIGATE` when the document's own route changes
    pub fn route_changed(&mut self, path: &str, replace: bool) -> Option<OutboundPost> {
        if self.last_path.as_deref() == Some(path) {
            return None;
        }
        let post = self.post(BridgeMessage::Navigate {
            path: path.to_string(),
            replace,
        })?;
        self.last_path = Some(path.to_string());
        Some(post)
    }

    /// `FORM_DIRTY` only when the form's state flips (forms start clean)
    pub fn form_dirty(&mut self, is_dirty: bool, form_id: Option<&str>) -> Option<OutboundPost> {
        let key = form_id.unwrap_or_default().to_string();
        let was_dirty = self.dirty_forms.get(&key).copied().unwrap_or(false);
        if was_dirty == is_dirty {
            return None;
        }
        let post = self.post(BridgeMessage::FormDirty {
            is_dirty,
            form_id: form_id.map(str::to_string),
        })?;
        self.dirty_forms.insert(key, is_dirty);
        Some(post)
    }

    pub fn request_download(
        &self,
        url: &str,
        file_name: &str,
        presigned_url: Option<&str>,
    ) -> Option<OutboundPost> {
        self.post(BridgeMessage::Download {
            url: url.to_string(),
            file_name: file_name.to_string(),
            presigned_url: presigned_url.map(str::to_string),
        })
    }

    pub fn request_zip_download(&self, zip_url: &str, zip_file_name: &str) -> Option<OutboundPost> {
        self.post(BridgeMessage::DownloadZip {
            zip_url: zip_url.to_string(),
            zip_file_name: zip_file_name.to_string(),
        })
    }

    /// Handle a message from the host window
    pub fn receive(&self, origin: &str, data: &Value) -> Option<ChildCommand> {
        if !self.is_embedded() || !self.guard.allows(origin) {
            return None;
        }
        match Envelope::from_value(data) {
            Ok(Envelope {
                message: BridgeMessage::Focus,
                ..
            }) => Some(ChildCommand::Focus),
            Ok(env) => {
                tracing::debug!(target: "bridge", "Child ignoring {:?}", env.message.kind());
                None
            }
            Err(e) => {
                tracing::debug!(target: "bridge", "Child dropped undecodable message: {}", e);
                None
            }
        }
    }

    /// Carry the identity query onto a same-origin link
    pub fn link_href(&self, href: &str) -> String {
        let (Some(identity), Some(host)) = (&self.identity, &self.host) else {
            return href.to_string();
        };
        if is_external(href, host) {
            return href.to_string();
        }
        let mut params = vec![
            (PARAM_IFRAME, "true"),
            (PARAM_PANEL_ID, identity.panel_id.as_str()),
        ];
        if let Some(tab_id) = &identity.tab_id {
            params.push((PARAM_TAB_ID, tab_id.as_str()));
        }
        with_query(href, host, &params).unwrap_or_else(|| href.to_string())
    }

    fn post(&self, message: BridgeMessage) -> Option<OutboundPost> {
        let identity = self.identity.as_ref()?;
        let target_origin = self.guard.target_origin()?;
        let envelope = Envelope::new(
            message,
            Some(identity.panel_id.clone()),
            identity.tab_id.clone(),
        );
        Some(OutboundPost {
            target_origin,
            data: envelope.to_value(),
        })
    }
}
