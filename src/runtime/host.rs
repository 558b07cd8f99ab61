//! The host runtime: model + storage + effect outbox
//!
//! `update` stays pure; this is where its commands meet the outside world.
//! Storage writes happen here, bridge subscribers are invoked here, and every
//! effect the embedding shell must carry out is queued as a [`HostEffect`].

use std::collections::HashMap;

use crate::bridge::{ChildPost, MessageKind, RoutedMessage, SubscriptionId};
use crate::commands::Cmd;
use crate::config::WorkspaceConfig;
use crate::messages::{AppMsg, CloseRequest, Msg};
use crate::model::{HydrationOutcome, LayoutSnapshot, TabId, WorkspaceModel};
use crate::storage::{layout_key, KeyValueStore};
use crate::update::update;
use crate::view::{workspace_view, WorkspaceView};

/// Something the embedding shell has to do
#[derive(Debug, Clone, PartialEq)]
pub enum HostEffect {
    Download { url: String, file_name: String },
    PostToChild(ChildPost),
    SyncOuterUrl { path: String, replace: bool },
    ConfirmDiscard {
        request: CloseRequest,
        tab_ids: Vec<TabId>,
    },
}

type Subscriber = Box<dyn FnMut(&RoutedMessage)>;

pub struct Host {
    model: WorkspaceModel,
    store: Box<dyn KeyValueStore>,
    storage_key: String,
    subscribers: HashMap<SubscriptionId, Subscriber>,
    outbox: Vec<HostEffect>,
    needs_redraw: bool,
}

impl Host {
    pub fn new(config: WorkspaceConfig, store: Box<dyn KeyValueStore>, user: &str) -> Self {
        let storage_key = layout_key(&config.storage_namespace, user);
        Self {
            model: WorkspaceModel::new(config),
            store,
            storage_key,
            subscribers: HashMap::new(),
            outbox: Vec::new(),
            needs_redraw: false,
        }
    }

    pub fn model(&self) -> &WorkspaceModel {
        &self.model
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Restore the persisted layout. Only the first call reads storage.
    pub fn hydrate(&mut self) {
        let outcome = self
            .model
            .hydration
            .hydrate(self.store.as_ref(), &self.storage_key);
        self.dispatch(Msg::App(AppMsg::Hydrated(outcome)));
    }

    /// Open the gate without reading storage
    pub fn skip_hydration(&mut self) {
        if self.model.hydration.is_hydrated() {
            return;
        }
        self.model.hydration.skip();
        self.dispatch(Msg::App(AppMsg::Hydrated(HydrationOutcome::Defaults)));
    }

    pub fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.execute(cmd);
        }
    }

    /// The user accepted losing unsaved forms; perform the held-back close
    pub fn confirm_discard(&mut self, request: CloseRequest) {
        self.dispatch(Msg::Layout(request.into_layout_msg()));
    }

    /// Register a callback for routed bridge messages
    pub fn subscribe(
        &mut self,
        tab: Option<TabId>,
        kinds: Option<Vec<MessageKind>>,
        callback: impl FnMut(&RoutedMessage) + 'static,
    ) -> SubscriptionId {
        let id = self.model.router.subscribe(tab, kinds);
        self.subscribers.insert(id, Box::new(callback));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id);
        self.model.router.unsubscribe(id)
    }

    /// Take every queued effect, oldest first
    pub fn drain_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.outbox)
    }

    /// Whether anything visible changed since the last call
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.needs_redraw, false)
    }

    pub fn view(&self) -> Option<WorkspaceView> {
        workspace_view(&self.model)
    }

    fn execute(&mut self, cmd: Cmd) {
        if cmd.needs_redraw() {
            self.needs_redraw = true;
        }
        for cmd in cmd.into_flat() {
            match cmd {
                Cmd::None | Cmd::Redraw | Cmd::Batch(_) => {}
                Cmd::PersistLayout(snapshot) => self.persist(&snapshot),
                Cmd::Download { url, file_name } => {
                    tracing::info!(target: "bridge", "Download {} from {}", file_name, url);
                    self.outbox.push(HostEffect::Download { url, file_name });
                }
                Cmd::PostToChild(post) => self.outbox.push(HostEffect::PostToChild(post)),
                Cmd::SyncOuterUrl { path, replace } => {
                    self.outbox.push(HostEffect::SyncOuterUrl { path, replace })
                }
                Cmd::ConfirmDiscard { request, tab_ids } => {
                    self.outbox
                        .push(HostEffect::ConfirmDiscard { request, tab_ids })
                }
                Cmd::Notify {
                    subscribers,
                    message,
                } => {
                    for id in subscribers {
                        if let Some(callback) = self.subscribers.get_mut(&id) {
                            callback(&message);
                        }
                    }
                }
            }
        }
    }

    fn persist(&mut self, snapshot: &LayoutSnapshot) {
        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(target: "storage", "Failed to serialize layout: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.storage_key, &json) {
            tracing::warn!(
                target: "storage",
                "Failed to persist layout {}: {:#}",
                self.storage_key,
                e
            );
        }
    }
}
