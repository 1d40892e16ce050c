// src/task/runner.rs

use std::collections::HashSet;

use tracing::{debug, info};

use crate::errors::PipelineError;
use crate::ops;
use crate::task::registry::Registry;
use crate::task::{Task, TaskContext, TaskKind};

/// Invokes tasks from the registry in caller order.
///
/// Each task's prerequisites run first, in their declared order, memoized per
/// [`Runner::run`] invocation so a shared prerequisite executes once. The
/// first failure stops scheduling and is propagated wrapped with the
/// originating task's name. The runner performs no I/O itself; all side
/// effects live in the task bodies.
pub struct Runner<'r> {
    registry: &'r Registry,
}

impl<'r> Runner<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Run the named tasks in order.
    pub fn run(&self, names: &[String], ctx: &mut TaskContext) -> Result<(), PipelineError> {
        let mut done: HashSet<String> = HashSet::new();
        for name in names {
            self.invoke(name, ctx, &mut done)?;
        }
        Ok(())
    }

    fn invoke(
        &self,
        name: &str,
        ctx: &mut TaskContext,
        done: &mut HashSet<String>,
    ) -> Result<(), PipelineError> {
        if done.contains(name) {
            debug!(task = name, "already ran in this invocation; skipping");
            return Ok(());
        }

        let task = self.registry.get(name)?;

        // The registry validated acyclicity, so this recursion terminates.
        for dep in task.after.clone() {
            self.invoke(&dep, ctx, done)?;
        }

        done.insert(name.to_string());
        info!(task = name, "running task");

        self.execute(task, ctx).map_err(|source| PipelineError::Task {
            name: name.to_string(),
            source: Box::new(source),
        })
    }

    fn execute(&self, task: &Task, ctx: &mut TaskContext) -> Result<(), PipelineError> {
        match &task.kind {
            TaskKind::SelectBrowser(id) => {
                ctx.browser.select(*id);
                Ok(())
            }
            TaskKind::SelectAllBrowsers => {
                ctx.browser.select_all();
                Ok(())
            }
            TaskKind::ValidateHtml => ops::html::validate(ctx),
            TaskKind::CompressHtml => ops::html::compress(ctx),
            TaskKind::CompileCssDev => ops::styles::compile_dev(ctx),
            TaskKind::CompileCssProd => ops::styles::compile_prod(ctx),
            TaskKind::CompileJsDev => ops::scripts::compile_dev(ctx),
            TaskKind::CompileJsProd => ops::scripts::compile_prod(ctx),
            TaskKind::LintJs => ops::lint::report(ctx),
            TaskKind::LintJsStrict => ops::lint::gate(ctx),
            TaskKind::CompressImages => ops::images::compress(ctx),
            TaskKind::CopyAssets => ops::assets::copy_unprocessed(ctx),
            TaskKind::Group => Ok(()),
            TaskKind::Serve => {
                ctx.serve_requested = true;
                Ok(())
            }
            TaskKind::Clean => ops::clean::sweep(ctx),
            TaskKind::ListTasks => {
                self.list_tasks();
                Ok(())
            }
        }
    }

    fn list_tasks(&self) {
        println!("available tasks:");
        for task in self.registry.tasks() {
            if task.after.is_empty() {
                println!("  {:<36} {}", task.name, task.help);
            } else {
                println!(
                    "  {:<36} {} (after: {})",
                    task.name,
                    task.help,
                    task.after.join(", ")
                );
            }
        }
    }
}
