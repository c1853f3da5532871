use crate::render;
use anyhow::{Context, Result};
use asset_browser_core::browser::AssetBrowser;
use asset_browser_core::clock::Clock;
use asset_browser_core::scanner::FsMetadataProvider;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, warn};

/// Access notifications do not change what exists or when it was created.
pub fn is_relevant(event: &Event) -> bool {
    !matches!(event.kind, EventKind::Access(_))
}

/// Waits for the next relevant event, then keeps collecting until no event
/// has arrived for `debounce`. Returns the touched paths, or `None` once the
/// sender is gone.
pub async fn next_batch(
    rx: &mut UnboundedReceiver<notify::Result<Event>>,
    debounce: Duration,
) -> Option<Vec<PathBuf>> {
    let mut paths = Vec::new();
    loop {
        match rx.recv().await? {
            Ok(ev) if is_relevant(&ev) => {
                paths.extend(ev.paths);
                break;
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "watch error"),
        }
    }
    loop {
        match tokio::time::timeout(debounce, rx.recv()).await {
            Ok(Some(Ok(ev))) => {
                if is_relevant(&ev) {
                    paths.extend(ev.paths);
                }
            }
            Ok(Some(Err(err))) => warn!(error = %err, "watch error"),
            Ok(None) | Err(_) => break,
        }
    }
    Some(paths)
}

/// Prints the tree, then refreshes and reprints it after every burst of
/// filesystem changes under the scan roots until interrupted.
pub async fn watch_roots<C>(
    mut browser: AssetBrowser<FsMetadataProvider, C>,
    debounce: Duration,
    json: bool,
) -> Result<()>
where
    C: Clock + 'static,
{
    let (tx, mut rx) = unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )?;
    let roots: Vec<PathBuf> = browser.provider().root_paths().map(PathBuf::from).collect();
    for root in &roots {
        watcher
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("watching {}", root.display()))?;
    }

    println!("{}", render::render_view(&browser, json)?.trim_end());
    println!("Watching {} path(s)...", roots.len());

    loop {
        tokio::select! {
            batch = next_batch(&mut rx, debounce) => {
                let Some(paths) = batch else { break };
                debug!(changed = paths.len(), "filesystem changed");
                browser = tokio::task::spawn_blocking(move || {
                    browser.refresh();
                    browser
                })
                .await
                .context("refresh task failed")?;
                println!("{}", render::render_view(&browser, json)?.trim_end());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
