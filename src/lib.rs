//! paneframe - Elm-style multi-panel tab workspace
//!
//! Hosts independently-routed pages as embedded documents and presents them as
//! a browser-style tab workspace with up to two panels. The crate holds the
//! tab/panel state machine, outer-URL sync, the responsive collapse policy,
//! drag-and-drop of tabs, and the cross-document bridge protocol.

pub mod bridge;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod script;
pub mod storage;
pub mod tracing;
pub mod update;
pub mod view;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::WorkspaceConfig;
pub use messages::Msg;
pub use model::WorkspaceModel;
pub use runtime::Host;
