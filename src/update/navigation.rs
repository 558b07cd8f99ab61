//! Navigation Sync - keeps the outer URL and the tab set consistent

use super::layout::{commit, reduce};
use crate::commands::Cmd;
use crate::messages::{LayoutMsg, NavMsg};
use crate::model::{MenuMatch, TabId, WorkspaceModel};

pub fn update_nav(model: &mut WorkspaceModel, msg: NavMsg) -> Option<Cmd> {
    match msg {
        NavMsg::UrlChanged(url) => url_changed(model, url),
        NavMsg::ChildNavigated {
            tab_id,
            path,
            replace,
        } => child_navigated(model, &tab_id, &path, replace),
    }
}

/// One tab per menu section: open it the first time, afterwards only
/// activate it and record the sub-route.
pub(crate) fn url_changed(model: &mut WorkspaceModel, url: String) -> Option<Cmd> {
    if model.nav.last_path.as_deref() == Some(url.as_str()) {
        tracing::trace!(target: "nav", "Ignoring repeated URL {}", url);
        return None;
    }
    model.nav.last_path = Some(url.clone());

    let tab_id = match model.menu.resolve(&url) {
        MenuMatch::Entry(id) => id,
        MenuMatch::Root => {
            tracing::debug!(target: "nav", "{} is the workspace root, no tab needed", url);
            return None;
        }
        MenuMatch::Unmatched => {
            tracing::debug!(target: "nav", "{} matches no menu entry", url);
            return None;
        }
    };

    let open = match model.layout.find_tab_panel(&tab_id) {
        // An already open section is activated as well, not just re-pathed
        Some(panel) => LayoutMsg::SetActiveTab {
            tab_id: tab_id.clone(),
            panel_id: panel.id.clone(),
        },
        None => {
            let entry = model.menu.get(tab_id.as_str())?;
            tracing::info!(target: "nav", "Opening tab {} for {}", tab_id, url);
            LayoutMsg::OpenTab(entry.descriptor())
        }
    };
    let next = reduce(&model.layout, &open);
    let next = reduce(
        &next,
        &LayoutMsg::SetCurrentPath {
            tab_id,
            path: url,
        },
    );
    commit(model, next)
}

/// A child reported its own route. Record it on the tab and, when that tab is
/// the one on screen, mirror it onto the outer URL.
pub(crate) fn child_navigated(
    model: &mut WorkspaceModel,
    tab_id: &TabId,
    path: &str,
    replace: bool,
) -> Option<Cmd> {
    if !model.layout.contains_tab(tab_id) {
        tracing::debug!(target: "nav", "Navigation from closed tab {} ignored", tab_id);
        return None;
    }
    let focused = model
        .layout
        .focused_tab()
        .is_some_and(|t| &t.id == tab_id);

    let next = reduce(
        &model.layout,
        &LayoutMsg::SetCurrentPath {
            tab_id: tab_id.clone(),
            path: path.to_string(),
        },
    );
    let mut cmds: Vec<Cmd> = commit(model, next).into_iter().collect();

    if focused && model.nav.last_path.as_deref() != Some(path) {
        // Pre-seed the guard so the echoed URL change is absorbed
        model.nav.last_path = Some(path.to_string());
        cmds.push(Cmd::SyncOuterUrl {
            path: path.to_string(),
            replace,
        });
    }
    Cmd::from_vec(cmds)
}
