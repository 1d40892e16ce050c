// src/serve/reload.rs

//! WebSocket reload delivery.
//!
//! A plain TCP accept loop upgrades connections with `tungstenite` and keeps
//! them in a shared client list. [`ReloadHub::notify`] pushes a `reload`
//! text message to every connected client, dropping the ones that have gone
//! away. The browser side is the small script injected into served HTML by
//! `serve::server`.

use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use tungstenite::protocol::Message;
use tungstenite::WebSocket;

/// Handle to the reload WebSocket hub. Cloneable; all clones share the same
/// client list.
#[derive(Clone)]
pub struct ReloadHub {
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
}

impl ReloadHub {
    /// Bind the WebSocket port and start accepting clients on a background
    /// thread.
    pub fn start(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .with_context(|| format!("binding reload websocket on port {port}"))?;

        let clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>> = Arc::new(Mutex::new(Vec::new()));
        let accept_clients = Arc::clone(&clients);

        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => match tungstenite::accept(stream) {
                        Ok(ws) => {
                            let Ok(mut list) = accept_clients.lock() else {
                                return;
                            };
                            debug!(total = list.len() + 1, "reload client connected");
                            list.push(ws);
                        }
                        Err(err) => {
                            warn!("reload websocket handshake failed: {err}");
                        }
                    },
                    Err(err) => {
                        warn!("reload listener accept failed: {err}");
                    }
                }
            }
        });

        debug!(port, "reload websocket hub started");
        Ok(Self { clients })
    }

    /// Push a reload message to every connected client.
    pub fn notify(&self) {
        let Ok(mut clients) = self.clients.lock() else {
            return;
        };
        let count = clients.len();
        if count == 0 {
            debug!("reload: no clients connected");
            return;
        }

        clients.retain_mut(
            |client| match client.send(Message::Text("reload".into())) {
                Ok(_) => true,
                Err(err) => {
                    debug!("reload client disconnected: {err}");
                    false
                }
            },
        );
        debug!(clients = count, "reload pushed");
    }

    /// Number of currently connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.lock().map(|c| c.len()).unwrap_or(0)
    }
}
