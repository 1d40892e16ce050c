// src/serve/server.rs

//! Static file server for the dev session.
//!
//! Requests are resolved against the configured ordered list of base
//! directories; the first root containing the requested path wins.
//! Directory requests (and `/`) fall through to `index.html`. Served HTML
//! gets the reload client script injected before `</body>`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Result};
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{debug, info, warn};

use crate::config::ServeSection;
use crate::serve::mime;

/// Handle to the running HTTP server thread.
pub struct ServerHandle {
    server: Arc<Server>,
}

impl ServerHandle {
    /// Unblock the accept loop so the server thread can exit.
    pub fn shutdown(&self) {
        self.server.unblock();
    }
}

/// Bind the dev server port and start answering requests on a background
/// thread.
pub fn spawn_server(root: PathBuf, cfg: ServeSection) -> Result<ServerHandle> {
    let server = Server::http(("127.0.0.1", cfg.port))
        .map_err(|e| anyhow!("binding dev server on port {}: {e}", cfg.port))?;
    let server = Arc::new(server);

    info!(port = cfg.port, roots = ?cfg.roots, "dev server listening");

    let loop_server = Arc::clone(&server);
    thread::spawn(move || {
        for request in loop_server.incoming_requests() {
            if let Err(err) = handle_request(request, &root, &cfg) {
                warn!("request error: {err}");
            }
        }
        debug!("dev server request loop ended");
    });

    Ok(ServerHandle { server })
}

fn handle_request(request: Request, root: &Path, cfg: &ServeSection) -> Result<()> {
    let url = request.url();
    let rel = url.split('?').next().unwrap_or(url).trim_start_matches('/');

    // Reject traversal out of the served roots.
    if rel.split('/').any(|c| c == "..") {
        return respond(request, 404, mime::PLAIN, b"404 Not Found".to_vec());
    }

    match resolve(root, &cfg.roots, rel) {
        Some(path) => {
            let content_type = mime::from_path(&path);
            let body = fs::read(&path)?;
            let body = if content_type == mime::HTML {
                inject_reload_script(body, cfg.ws_port)
            } else {
                body
            };
            debug!(url = %url, path = %path.display(), "serving file");
            respond(request, 200, content_type, body)
        }
        None => {
            debug!(url = %url, "not found in any root");
            respond(request, 404, mime::PLAIN, b"404 Not Found".to_vec())
        }
    }
}

/// First root containing the requested path wins; directories resolve to
/// their `index.html`.
fn resolve(root: &Path, roots: &[PathBuf], rel: &str) -> Option<PathBuf> {
    for base in roots {
        let mut candidate = root.join(base);
        if !rel.is_empty() {
            candidate = candidate.join(rel);
        }
        if candidate.is_dir() {
            candidate = candidate.join("index.html");
        }
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Inject the reload client before the closing `</body>` tag, or append it
/// when the page has none.
fn inject_reload_script(content: Vec<u8>, ws_port: u16) -> Vec<u8> {
    let script = format!(
        "<script>(function(){{var ws=new WebSocket(\"ws://127.0.0.1:{ws_port}\");\
ws.onmessage=function(){{location.reload();}};}})();</script>"
    );
    let script_bytes = script.as_bytes();

    const PATTERN: &[u8] = b"</body>";

    if let Some(pos) = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        let mut result = Vec::with_capacity(content.len() + script_bytes.len());
        result.extend_from_slice(&content[..pos]);
        result.extend_from_slice(script_bytes);
        result.extend_from_slice(&content[pos..]);
        result
    } else {
        let mut result = content;
        result.extend_from_slice(script_bytes);
        result
    }
}

fn respond(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).expect("static header")
}
