// src/watch/bindings.rs

use anyhow::Result;

use crate::config::Config;
use crate::glob::{PatternSet, PatternSetBuilder};

/// A (pattern set, reaction) pair for the watch session.
///
/// `tasks` and `reload` cover the three reaction shapes: run tasks only,
/// notify reload only, or both.
#[derive(Debug, Clone)]
pub struct WatchBinding {
    patterns: PatternSet,
    pub tasks: Vec<String>,
    pub reload: bool,
}

impl WatchBinding {
    pub fn new(patterns: PatternSet, tasks: Vec<String>, reload: bool) -> Self {
        Self {
            patterns,
            tasks,
            reload,
        }
    }

    /// Whether a root-relative changed path concerns this binding.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.patterns.is_match(rel_path)
    }
}

/// The standard dev-session bindings.
///
/// Compiled assets use a two-stage relay: the source watch re-runs the dev
/// compile (which writes into the staging tree), and a separate staging
/// watch fires the reload only once that write has landed. Passively-served
/// assets (images) reload directly. HTML re-validates and reloads in one
/// binding.
pub fn default_bindings(config: &Config) -> Result<Vec<WatchBinding>> {
    let src = config.paths.source.to_string_lossy().replace('\\', "/");
    let staging = config.paths.staging.to_string_lossy().replace('\\', "/");

    let mut bindings = Vec::new();

    bindings.push(WatchBinding::new(
        PatternSetBuilder::new()
            .include(format!("{src}/assets/scripts/*.js"))
            .build()?,
        vec!["compileJSForDev".to_string(), "lintJS".to_string()],
        false,
    ));
    bindings.push(WatchBinding::new(
        PatternSetBuilder::new()
            .include(format!("{staging}/assets/scripts/*.js"))
            .build()?,
        Vec::new(),
        true,
    ));

    bindings.push(WatchBinding::new(
        PatternSetBuilder::new()
            .include(format!("{src}/assets/styles/**/*.scss"))
            .build()?,
        vec!["compileCSSForDev".to_string()],
        false,
    ));
    bindings.push(WatchBinding::new(
        PatternSetBuilder::new()
            .include(format!("{staging}/assets/styles/**/*.css"))
            .build()?,
        Vec::new(),
        true,
    ));

    bindings.push(WatchBinding::new(
        PatternSetBuilder::new()
            .include(format!("{src}/html/*.html"))
            .include(format!("{src}/html/**/*.html"))
            .build()?,
        vec!["validateHTML".to_string()],
        true,
    ));

    bindings.push(WatchBinding::new(
        PatternSetBuilder::new()
            .include(format!("{src}/assets/img/**"))
            .build()?,
        Vec::new(),
        true,
    ));

    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_source_change_runs_tasks_without_reload() {
        let bindings = default_bindings(&Config::default()).expect("default bindings compile");
        let hit: Vec<&WatchBinding> = bindings
            .iter()
            .filter(|b| b.matches("src/assets/scripts/app.js"))
            .collect();
        assert_eq!(hit.len(), 1);
        assert!(!hit[0].reload);
        assert_eq!(hit[0].tasks, ["compileJSForDev", "lintJS"]);
    }

    #[test]
    fn staging_script_change_reloads_without_tasks() {
        let bindings = default_bindings(&Config::default()).expect("default bindings compile");
        let hit: Vec<&WatchBinding> = bindings
            .iter()
            .filter(|b| b.matches("temp/assets/scripts/main.js"))
            .collect();
        assert_eq!(hit.len(), 1);
        assert!(hit[0].reload);
        assert!(hit[0].tasks.is_empty());
    }

    #[test]
    fn html_change_validates_and_reloads() {
        let bindings = default_bindings(&Config::default()).expect("default bindings compile");
        let hit: Vec<&WatchBinding> = bindings
            .iter()
            .filter(|b| b.matches("src/html/nested/about.html"))
            .collect();
        assert_eq!(hit.len(), 1);
        assert!(hit[0].reload);
        assert_eq!(hit[0].tasks, ["validateHTML"]);
    }

    #[test]
    fn image_change_reloads_directly() {
        let bindings = default_bindings(&Config::default()).expect("default bindings compile");
        assert!(bindings
            .iter()
            .any(|b| b.matches("src/assets/img/logo.png") && b.reload && b.tasks.is_empty()));
    }
}
