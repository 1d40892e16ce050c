// src/lib.rs

pub mod browser;
pub mod cli;
pub mod config;
pub mod errors;
pub mod glob;
pub mod logging;
pub mod ops;
pub mod serve;
pub mod task;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::load_or_default;
use crate::task::{Registry, Runner, TaskContext};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the built-in task registry (validated at startup)
/// - the task runner for the requested tasks
/// - the watch/serve session when a `serve` task was among them
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let config = load_or_default(&config_path)?;
    let root = config_root_dir(&config_path);

    let registry = Registry::builtin()?;
    let mut ctx = TaskContext::new(root, config);

    if args.list {
        Runner::new(&registry).run(&["default".to_string()], &mut ctx)?;
        return Ok(());
    }

    let tasks = if args.tasks.is_empty() {
        debug!("no tasks given; running `default`");
        vec!["default".to_string()]
    } else {
        args.tasks.clone()
    };

    let runner = Runner::new(&registry);
    runner.run(&tasks, &mut ctx)?;

    if ctx.serve_requested {
        serve::session(&registry, &mut ctx).await?;
    }

    Ok(())
}

/// Figure out the project root all paths are resolved against.
/// Currently: directory containing the config file, or `.`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(p) if p != Path::new("") => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
