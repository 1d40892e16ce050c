// src/watch/mod.rs

//! File watching and the dev-session reaction loop.
//!
//! - [`bindings`] associates compiled pattern sets with reactions (re-run
//!   tasks, push a reload notification, or both).
//! - [`watcher`] wires a cross-platform filesystem watcher (`notify`) that
//!   turns change events into session events, in arrival order.
//! - [`session`] is the single control-flow loop that processes reactions
//!   one at a time and tears down on Ctrl-C.
//!
//! This module knows nothing about HTTP; reload delivery is behind the
//! [`crate::serve::ReloadHub`] handle it is given.

pub mod bindings;
pub mod session;
pub mod watcher;

pub use bindings::{default_bindings, WatchBinding};
pub use session::{run_session, SessionEvent};
pub use watcher::{spawn_watcher, WatcherHandle};
