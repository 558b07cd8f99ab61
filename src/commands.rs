//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! The runtime executes them; `update` never touches storage or windows directly.

use crate::bridge::{ChildPost, RoutedMessage, SubscriptionId};
use crate::messages::CloseRequest;
use crate::model::{LayoutSnapshot, TabId};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Re-render the tab strip and panels
    Redraw,
    /// Write the layout snapshot to storage
    PersistLayout(LayoutSnapshot),
    /// Start a browser download in the host window
    Download { url: String, file_name: String },
    /// `postMessage` into an embedded document
    PostToChild(ChildPost),
    /// Mirror a tab's route onto the outer URL
    SyncOuterUrl { path: String, replace: bool },
    /// Ask the user before discarding unsaved forms
    ConfirmDiscard {
        request: CloseRequest,
        tab_ids: Vec<TabId>,
    },
    /// Deliver a routed bridge message to subscribers
    Notify {
        subscribers: Vec<SubscriptionId>,
        message: RoutedMessage,
    },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Collapse a list of commands: nothing, a single command, or a batch
    pub fn from_vec(mut cmds: Vec<Cmd>) -> Option<Cmd> {
        cmds.retain(|c| *c != Cmd::None);
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            // Persisting follows a layout change, which is always visible
            Cmd::PersistLayout(_) => true,
            Cmd::Download { .. } => false,
            Cmd::PostToChild(_) => false,
            Cmd::SyncOuterUrl { .. } => false,
            Cmd::ConfirmDiscard { .. } => true,
            Cmd::Notify { .. } => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Flatten nested batches into execution order
    pub fn into_flat(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::into_flat).collect(),
            other => vec![other],
        }
    }
}
