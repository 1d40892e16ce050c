// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::glob::relative_str;
use crate::watch::bindings::WatchBinding;
use crate::watch::session::SessionEvent;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher that observes the project `root` recursively
/// and sends one [`SessionEvent::Matched`] per binding a changed path
/// matches, in arrival order.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    bindings: Vec<WatchBinding>,
    session_tx: mpsc::Sender<SessionEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

    let bindings = Arc::new(bindings);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        {
            let event_tx = event_tx.clone();
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        // Can't log via tracing inside the notify callback
                        // reliably; fall back to stderr.
                        eprintln!("assetpipe: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("assetpipe: file watch error: {err}");
                }
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    // Async task that matches notify events against bindings and forwards
    // reactions to the session loop.
    let async_root = root.clone();
    let async_bindings = Arc::clone(&bindings);
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            for path in &event.paths {
                let Some(rel) = relative_str(&async_root, path) else {
                    warn!(
                        "could not relativize path {:?} against root {:?}",
                        path, async_root
                    );
                    continue;
                };

                for binding in async_bindings.iter() {
                    if !binding.matches(&rel) {
                        continue;
                    }
                    debug!(path = %rel, tasks = ?binding.tasks, reload = binding.reload, "watch match");
                    let sent = session_tx
                        .send(SessionEvent::Matched {
                            path: rel.clone(),
                            tasks: binding.tasks.clone(),
                            reload: binding.reload,
                        })
                        .await;
                    if let Err(err) = sent {
                        warn!("failed to send session event: {err}");
                        // Session loop is gone; no point keeping this
                        // forwarder alive.
                        return;
                    }
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}
