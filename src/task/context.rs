// src/task/context.rs

use std::path::{Path, PathBuf};

use crate::browser::BrowserSelection;
use crate::config::Config;

/// Mutable state for one invocation of the tool.
///
/// The browser selection lives here rather than in process-wide state: the
/// selector tasks write it, the serve task reads it, and it dies with the
/// invocation.
#[derive(Debug)]
pub struct TaskContext {
    /// Project root all config paths and glob patterns are resolved against.
    pub root: PathBuf,
    pub config: Config,
    pub browser: BrowserSelection,
    /// Set by the `serve` task; the entry point starts the watch/serve
    /// session after the task list has run.
    pub serve_requested: bool,
}

impl TaskContext {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            browser: BrowserSelection::default(),
            serve_requested: false,
        }
    }

    /// Source tree under the project root.
    pub fn source_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.source)
    }

    /// Production output tree under the project root.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.output)
    }

    /// Development staging tree under the project root.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.staging)
    }

    /// A config-relative path as a root-relative glob prefix with forward
    /// slashes (e.g. `src` or `temp`).
    pub fn rel(&self, path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }
}
