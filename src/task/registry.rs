// src/task/registry.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::PipelineError;
use crate::task::{Task, TaskKind};

/// Named task registry.
///
/// Tasks are registered once at startup and immutable afterwards. The
/// prerequisite graph is validated when registration finishes: every `after`
/// reference must name a registered task, and the graph must be acyclic.
/// Run-time lookups can therefore assume a well-formed graph.
#[derive(Debug, Default)]
pub struct Registry {
    tasks: BTreeMap<String, Task>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a task. Last registration wins for duplicate names.
    pub fn register(&mut self, task: Task) {
        self.tasks.insert(task.name.clone(), task);
    }

    /// Validate prerequisite references and acyclicity.
    pub fn validate(&self) -> Result<(), PipelineError> {
        for (name, task) in self.tasks.iter() {
            for dep in task.after.iter() {
                if !self.tasks.contains_key(dep) {
                    return Err(PipelineError::TaskNotFound { name: dep.clone() });
                }
                if dep == name {
                    return Err(PipelineError::CyclicDependency { name: name.clone() });
                }
            }
        }

        // Edge direction: dep -> task. A topological sort fails on a cycle.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for name in self.tasks.keys() {
            graph.add_node(name.as_str());
        }
        for (name, task) in self.tasks.iter() {
            for dep in task.after.iter() {
                graph.add_edge(dep.as_str(), name.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => Err(PipelineError::CyclicDependency {
                name: cycle.node_id().to_string(),
            }),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Task, PipelineError> {
        self.tasks.get(name).ok_or_else(|| PipelineError::TaskNotFound {
            name: name.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(|s| s.as_str())
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// The built-in task surface, validated.
    pub fn builtin() -> Result<Self, PipelineError> {
        let mut reg = Self::new();

        for (name, id) in [
            ("safari", "safari"),
            ("firefox", "firefox"),
            ("chrome", "google chrome"),
            ("opera", "opera"),
            ("edge", "microsoft-edge"),
        ] {
            reg.register(Task::new(
                name,
                TaskKind::SelectBrowser(id),
                "Select this browser for the serve preview",
            ));
        }
        reg.register(Task::new(
            "allBrowsers",
            TaskKind::SelectAllBrowsers,
            "Select every supported browser for the serve preview",
        ));

        reg.register(Task::new(
            "validateHTML",
            TaskKind::ValidateHtml,
            "Validate source HTML; reports issues, writes nothing",
        ));
        reg.register(Task::new(
            "compressHTML",
            TaskKind::CompressHtml,
            "Strip comments/whitespace from HTML into the production folder",
        ));
        reg.register(Task::new(
            "compileCSSForDev",
            TaskKind::CompileCssDev,
            "Compile the stylesheet entry into the staging folder",
        ));
        reg.register(Task::new(
            "compileCSSForProd",
            TaskKind::CompileCssProd,
            "Compile, prefix and minify CSS into the production folder",
        ));
        reg.register(Task::new(
            "compileJSForDev",
            TaskKind::CompileJsDev,
            "Concatenate scripts into the staging folder",
        ));
        reg.register(Task::new(
            "compileJSForProd",
            TaskKind::CompileJsProd,
            "Concatenate and minify scripts into the production folder",
        ));
        reg.register(Task::new(
            "lintJS",
            TaskKind::LintJs,
            "Report script diagnostics without failing",
        ));
        reg.register(Task::new(
            "lintJsAndFail",
            TaskKind::LintJsStrict,
            "Lint scripts; any violation aborts the pipeline",
        ));
        reg.register(Task::new(
            "compressThenCopyImagesToProdFolder",
            TaskKind::CompressImages,
            "Recompress images into the production folder",
        ));
        reg.register(Task::new(
            "copyUnprocessedAssetsToProdFolder",
            TaskKind::CopyAssets,
            "Copy assets not handled by other tasks to the production folder",
        ));

        // Ordered so that a failure leaves the output tree untouched by any
        // later step: validation and lint gate first, then the compiles that
        // only write on success, then the copies.
        reg.register(
            Task::new("build", TaskKind::Group, "Full production build").after([
                "validateHTML",
                "lintJsAndFail",
                "compileCSSForProd",
                "compileJSForProd",
                "compressHTML",
                "compressThenCopyImagesToProdFolder",
                "copyUnprocessedAssetsToProdFolder",
            ]),
        );

        reg.register(
            Task::new(
                "serve",
                TaskKind::Serve,
                "Dev compiles, then watch + local server with live reload",
            )
            .after([
                "compileCSSForDev",
                "compileJSForDev",
                "validateHTML",
                "lintJS",
            ]),
        );

        reg.register(Task::new(
            "clean",
            TaskKind::Clean,
            "Delete the expendable staging and production folders",
        ));
        reg.register(Task::new(
            "default",
            TaskKind::ListTasks,
            "List the available tasks",
        ));

        reg.validate()?;
        Ok(reg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_validates() {
        let reg = Registry::builtin().expect("builtin graph is well-formed");
        assert!(reg.get("build").is_ok());
        assert!(reg.get("serve").is_ok());
    }

    #[test]
    fn unknown_name_is_task_not_found() {
        let reg = Registry::builtin().expect("builtin graph is well-formed");
        let err = reg.get("deploy").unwrap_err();
        assert!(matches!(err, PipelineError::TaskNotFound { name } if name == "deploy"));
    }

    #[test]
    fn unknown_prerequisite_rejected_at_validation() {
        let mut reg = Registry::new();
        reg.register(Task::new("a", TaskKind::Group, "").after(["missing"]));
        let err = reg.validate().unwrap_err();
        assert!(matches!(err, PipelineError::TaskNotFound { name } if name == "missing"));
    }

    #[test]
    fn cycle_rejected_at_validation() {
        let mut reg = Registry::new();
        reg.register(Task::new("a", TaskKind::Group, "").after(["b"]));
        reg.register(Task::new("b", TaskKind::Group, "").after(["a"]));
        let err = reg.validate().unwrap_err();
        assert!(matches!(err, PipelineError::CyclicDependency { .. }));
    }

    #[test]
    fn self_dependency_rejected() {
        let mut reg = Registry::new();
        reg.register(Task::new("a", TaskKind::Group, "").after(["a"]));
        let err = reg.validate().unwrap_err();
        assert!(matches!(err, PipelineError::CyclicDependency { name } if name == "a"));
    }
}
