//! paneframe - headless driver for the multi-panel tab workspace
//!
//! Restores the user's layout, replays a script of events through the
//! runtime, reports the effects a browser shell would perform, and prints the
//! final workspace view as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use paneframe::cli::CliArgs;
use paneframe::config::WorkspaceConfig;
use paneframe::messages::{Msg, ViewportMsg};
use paneframe::runtime::{Host, HostEffect};
use paneframe::script::parse_script;
use paneframe::storage::FileStore;

fn main() -> Result<()> {
    paneframe::tracing::init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => WorkspaceConfig::load_from(path),
        None => WorkspaceConfig::load(),
    };

    let store = match args.layouts_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::in_config_dir().context("No layouts directory available")?,
    };
    tracing::debug!(target: "storage", "Layouts stored in {}", store.dir().display());

    let mut host = Host::new(config, Box::new(store), &args.user);

    // Viewport is known before the gate opens so a restored split can collapse
    if let Some(width) = args.width {
        host.dispatch(Msg::Viewport(ViewportMsg::Resized { width }));
    }

    if args.fresh {
        host.skip_hydration();
    } else {
        host.hydrate();
    }
    report(&mut host);

    if let Some(path) = &args.script {
        run_script(&mut host, path)?;
    }

    let view = host.view();
    println!(
        "{}",
        serde_json::to_string_pretty(&view).context("Failed to serialize workspace view")?
    );
    Ok(())
}

fn run_script(host: &mut Host, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    let events = parse_script(&text)?;
    tracing::info!("Replaying {} events from {}", events.len(), path.display());

    for event in events {
        event.apply(host);
        report(host);
    }
    Ok(())
}

/// Print effects the browser shell would carry out
fn report(host: &mut Host) {
    for effect in host.drain_effects() {
        match effect {
            HostEffect::Download { url, file_name } => {
                eprintln!("download  {} <- {}", file_name, url);
            }
            HostEffect::PostToChild(post) => {
                eprintln!(
                    "post      {}/{} @ {}: {}",
                    post.panel_id, post.tab_id, post.target_origin, post.data
                );
            }
            HostEffect::SyncOuterUrl { path, replace } => {
                let how = if replace { "replace" } else { "push" };
                eprintln!("url       {} ({})", path, how);
            }
            HostEffect::ConfirmDiscard { request, tab_ids } => {
                eprintln!("confirm   {:?} has unsaved forms in {:?}", request, tab_ids);
            }
        }
    }
}
