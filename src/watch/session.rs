// src/watch/session.rs

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::serve::ReloadHub;
use crate::task::{Registry, Runner, TaskContext};

/// Events consumed by the session loop.
///
/// Watchers send `Matched`; the Ctrl-C handler sends `Shutdown`.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Matched {
        /// Root-relative changed path, for logging.
        path: String,
        /// Tasks to re-run (may be empty).
        tasks: Vec<String>,
        /// Whether to push a reload notification afterwards.
        reload: bool,
    },
    Shutdown,
}

/// The watch-session reaction loop.
///
/// One reaction is processed at a time in arrival order: re-run the bound
/// tasks, then (after the configured delay, giving writes time to reach
/// disk) push the reload notification. Task failures are logged and the
/// session keeps watching; the dev loop is best-effort. Shutdown is
/// honoured between reactions; a reaction in progress completes.
///
/// Reloads for compiled assets arrive via the staging-tree bindings, so the
/// rebuild's output write has already happened by the time the notification
/// fires. The remaining window between that write and the event being
/// observed is covered by the reload delay.
pub async fn run_session(
    registry: &Registry,
    ctx: &mut TaskContext,
    mut events_rx: mpsc::Receiver<SessionEvent>,
    hub: ReloadHub,
) -> Result<()> {
    let reload_delay = Duration::from_millis(ctx.config.serve.reload_delay_ms);
    let runner = Runner::new(registry);

    info!("watch session started");

    while let Some(event) = events_rx.recv().await {
        match event {
            SessionEvent::Matched {
                path,
                tasks,
                reload,
            } => {
                debug!(path = %path, "reacting to change");

                if !tasks.is_empty() {
                    if let Err(err) = runner.run(&tasks, ctx) {
                        error!(path = %path, "watch task failed: {err}");
                    }
                }

                if reload {
                    sleep(reload_delay).await;
                    hub.notify();
                }
            }
            SessionEvent::Shutdown => {
                info!("shutdown requested, ending watch session");
                break;
            }
        }
    }

    info!("watch session ended");
    Ok(())
}
