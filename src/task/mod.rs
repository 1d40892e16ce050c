// src/task/mod.rs

//! Task registry and pipeline runner.
//!
//! - [`registry`] holds the named tasks and validates the prerequisite graph
//!   (unknown references, cycles) when registration finishes.
//! - [`runner`] invokes tasks in caller order, running each task's
//!   prerequisite closure first, memoized per invocation.
//! - [`context`] is the mutable state threaded through one invocation of the
//!   tool (config, project root, browser selection).

pub mod context;
pub mod registry;
pub mod runner;

pub use context::TaskContext;
pub use registry::Registry;
pub use runner::Runner;

/// What a task does when invoked. Tasks are data; the runner interprets the
/// kind and dispatches into the `ops` modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Overwrite the browser selection with one identifier.
    SelectBrowser(&'static str),
    /// Select the full known browser set.
    SelectAllBrowsers,
    ValidateHtml,
    CompressHtml,
    CompileCssDev,
    CompileCssProd,
    CompileJsDev,
    CompileJsProd,
    /// Report lint diagnostics without failing.
    LintJs,
    /// Fail the pipeline on any lint diagnostic.
    LintJsStrict,
    CompressImages,
    CopyAssets,
    /// Composite task: prerequisites only, no body of its own.
    Group,
    /// Request the dev-serve session; the session itself is started by the
    /// entry point after the task list has run (it outlives the runner).
    Serve,
    Clean,
    /// Print the available task names.
    ListTasks,
}

/// A named, invocable unit of build work. Immutable after registration.
#[derive(Debug, Clone)]
pub struct Task {
    pub name: String,
    pub kind: TaskKind,
    /// Prerequisite task names, run (in order) before this task's body.
    pub after: Vec<String>,
    /// One-line description shown by the `default` task.
    pub help: &'static str,
}

impl Task {
    pub fn new(name: impl Into<String>, kind: TaskKind, help: &'static str) -> Self {
        Self {
            name: name.into(),
            kind,
            after: Vec::new(),
            help,
        }
    }

    pub fn after<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after = deps.into_iter().map(Into::into).collect();
        self
    }
}
