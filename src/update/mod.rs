//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod app;
mod bridge;
mod drag;
pub mod layout;
mod navigation;
mod viewport;

use crate::commands::Cmd;
use crate::messages::{LayoutMsg, Msg};
use crate::model::WorkspaceModel;

#[cfg(debug_assertions)]
use crate::tracing::LayoutDigest;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use bridge::update_bridge;
pub use drag::update_drag;
pub use layout::{reduce, update_close, update_layout};
pub use navigation::update_nav;
pub use viewport::update_viewport;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut WorkspaceModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut WorkspaceModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Layout(LayoutMsg::CreatePanel { tab_id }) if !model.is_wide() => {
            tracing::debug!(target: "layout", "Split of {} refused on narrow viewport", tab_id);
            None
        }
        Msg::Layout(m) => layout::update_layout(model, m),
        Msg::Close(req) => layout::update_close(model, req),
        Msg::Nav(m) => navigation::update_nav(model, m),
        Msg::Viewport(m) => viewport::update_viewport(model, m),
        Msg::Drag(m) => drag::update_drag(model, m),
        Msg::Bridge(m) => bridge::update_bridge(model, m),
        Msg::App(m) => app::update_app(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after layout structure and logs diffs for debugging.
/// Filters out noisy pointer-move messages from logging.
#[cfg(debug_assertions)]
fn update_traced(model: &mut WorkspaceModel, msg: Msg) -> Option<Cmd> {
    use crate::messages::DragMsg;

    let is_noisy = matches!(&msg, Msg::Drag(DragMsg::PointerMove { .. }));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = LayoutDigest::from_layout(&model.layout);

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, msg);

    let after = LayoutDigest::from_layout(&model.layout);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "layout", %diff, "state changed");
    }

    model.layout.assert_invariants(&msg_name);

    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
/// Example outputs:
/// - `Layout::CloseTab { .. }`
/// - `Nav::UrlChanged("/admin/customers")`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Layout(m) => format!("Layout::{:?}", m),
        Msg::Close(m) => format!("Close::{:?}", m),
        Msg::Nav(m) => format!("Nav::{:?}", m),
        Msg::Viewport(m) => format!("Viewport::{:?}", m),
        Msg::Drag(m) => format!("Drag::{:?}", m),
        // Inbound payloads can be large; the kind is enough
        Msg::Bridge(_) => "Bridge::Inbound".to_string(),
        Msg::App(m) => match m {
            crate::messages::AppMsg::Hydrated(outcome) => {
                format!("App::Hydrated({})", hydration_label(outcome))
            }
        },
    }
}

#[cfg(debug_assertions)]
fn hydration_label(outcome: &crate::model::HydrationOutcome) -> &'static str {
    use crate::model::HydrationOutcome;
    match outcome {
        HydrationOutcome::AlreadyHydrated => "AlreadyHydrated",
        HydrationOutcome::Restored(_) => "Restored",
        HydrationOutcome::Defaults => "Defaults",
    }
}
