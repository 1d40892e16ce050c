// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! Transformation failures carry the name of the external tool that produced
//! them plus its message (including line/column context when the tool supplies
//! it). `FilesystemAccess` is only produced by the cleanup sweep, where it is
//! logged and never propagated.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A task name was requested (or listed as a prerequisite) that is not
    /// in the registry.
    #[error("no task named '{name}' is registered")]
    TaskNotFound { name: String },

    /// The prerequisite graph contains a cycle. Detected at registry
    /// validation time, before anything runs.
    #[error("cycle detected in task prerequisites involving '{name}'")]
    CyclicDependency { name: String },

    /// An external transformation tool rejected its input.
    #[error("{tool}: {message}")]
    Transformation { tool: &'static str, message: String },

    /// The fail-fast lint gate found violations.
    #[error("{count} lint violation(s) in source scripts")]
    LintViolation { count: usize },

    /// A directory could not be inspected or removed during cleanup.
    #[error("cannot access {path:?}: {source}")]
    FilesystemAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A failure wrapped with the name of the task it originated in.
    #[error("task '{name}' failed")]
    Task {
        name: String,
        #[source]
        source: Box<PipelineError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn transformation(tool: &'static str, message: impl Into<String>) -> Self {
        PipelineError::Transformation {
            tool,
            message: message.into(),
        }
    }

    /// The name of the innermost task a failure originated in, if any.
    pub fn origin_task(&self) -> Option<&str> {
        match self {
            PipelineError::Task { name, source } => {
                Some(source.origin_task().unwrap_or(name.as_str()))
            }
            _ => None,
        }
    }

    /// Unwrap `Task` layers down to the underlying failure.
    pub fn root_cause(&self) -> &PipelineError {
        match self {
            PipelineError::Task { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
