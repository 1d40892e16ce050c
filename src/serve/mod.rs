// src/serve/mod.rs

//! Development HTTP server and live-reload delivery.
//!
//! The HTTP server resolves requests against an ordered list of base
//! directories (first match wins) and injects the reload client script into
//! served HTML. The [`ReloadHub`] accepts WebSocket clients and pushes a
//! reload message to all of them when the watch session asks it to.

pub mod mime;
pub mod reload;
pub mod server;

pub use reload::ReloadHub;
pub use server::{spawn_server, ServerHandle};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::task::{Registry, TaskContext};
use crate::watch::{default_bindings, run_session, spawn_watcher, SessionEvent};

/// Run the dev-serve session until Ctrl-C.
///
/// Assumes the serve prerequisites (dev compiles, validation, lint) have
/// already run, so the staging tree is populated.
pub async fn session(registry: &Registry, ctx: &mut TaskContext) -> Result<()> {
    let serve_cfg = ctx.config.serve.clone();

    let hub = ReloadHub::start(serve_cfg.ws_port)?;
    let http = spawn_server(ctx.root.clone(), serve_cfg.clone())?;

    let url = format!("http://127.0.0.1:{}", serve_cfg.port);
    info!(url = %url, "dev server ready");
    ctx.browser.launch(&url);

    let bindings = default_bindings(&ctx.config)?;
    let (session_tx, session_rx) = mpsc::channel::<SessionEvent>(64);

    let _watcher = spawn_watcher(ctx.root.clone(), bindings, session_tx.clone())?;

    // Ctrl-C → graceful teardown between reactions.
    {
        let tx = session_tx.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {err}");
                return;
            }
            let _ = tx.send(SessionEvent::Shutdown).await;
        });
    }

    let result = run_session(registry, ctx, session_rx, hub).await;

    http.shutdown();
    if let Err(ref err) = result {
        warn!("watch session exited with error: {err}");
    }
    result
}
