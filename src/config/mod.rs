// src/config/mod.rs

//! Configuration loading for assetpipe.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//!
//! Unlike the task graph (validated in `task::registry`), the config carries
//! no cross-field invariants; every section has a usable default so the tool
//! runs in a project with no config file at all.

pub mod loader;
pub mod model;

pub use loader::{load_from_path, load_or_default};
pub use model::{CleanSection, Config, LintSection, PathsSection, ServeSection};
