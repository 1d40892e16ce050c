// src/glob.rs

//! Ordered glob pattern sets resolved against a project tree.
//!
//! A [`PatternSet`] is an ordered list of inclusion and exclusion patterns.
//! For a given path, entries are applied in listed order and the last
//! matching entry wins: an exclusion suppresses matches from inclusions
//! listed before it, and a later inclusion can re-add a path an earlier
//! exclusion removed. Resolution walks the filesystem on demand; results are
//! never cached across invocations.
//!
//! `*` does not cross directory separators; `**` does. Paths with a dotfile
//! component are skipped unless the set was built with
//! [`PatternSetBuilder::with_dotfiles`].

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use jwalk::WalkDir;

#[derive(Clone)]
struct PatternEntry {
    pattern: String,
    matcher: GlobMatcher,
    exclude: bool,
}

/// Ordered set of inclusion/exclusion glob patterns.
#[derive(Clone)]
pub struct PatternSet {
    entries: Vec<PatternEntry>,
    include_dotfiles: bool,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns: Vec<String> = self
            .entries
            .iter()
            .map(|e| {
                if e.exclude {
                    format!("!{}", e.pattern)
                } else {
                    e.pattern.clone()
                }
            })
            .collect();
        f.debug_struct("PatternSet")
            .field("patterns", &patterns)
            .field("include_dotfiles", &self.include_dotfiles)
            .finish()
    }
}

/// Builder collecting patterns in order.
#[derive(Debug, Default)]
pub struct PatternSetBuilder {
    patterns: Vec<(String, bool)>,
    include_dotfiles: bool,
}

impl PatternSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inclusion pattern.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push((pattern.into(), false));
        self
    }

    /// Add an exclusion pattern. Only suppresses paths matched by inclusions
    /// listed before it.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push((pattern.into(), true));
        self
    }

    /// Match paths with dotfile components as well (off by default).
    pub fn with_dotfiles(mut self, yes: bool) -> Self {
        self.include_dotfiles = yes;
        self
    }

    pub fn build(self) -> Result<PatternSet> {
        let mut entries = Vec::with_capacity(self.patterns.len());
        for (pattern, exclude) in self.patterns {
            let matcher = GlobBuilder::new(&pattern)
                .literal_separator(true)
                .build()
                .with_context(|| format!("invalid glob pattern: {pattern}"))?
                .compile_matcher();
            entries.push(PatternEntry {
                pattern,
                matcher,
                exclude,
            });
        }
        Ok(PatternSet {
            entries,
            include_dotfiles: self.include_dotfiles,
        })
    }
}

impl PatternSet {
    /// Whether a root-relative path (forward slashes) is selected by this
    /// set, applying entries in listed order with last-match-wins.
    pub fn is_match(&self, rel_path: &str) -> bool {
        if !self.include_dotfiles && has_dot_component(rel_path) {
            return false;
        }

        let mut selected = false;
        for entry in &self.entries {
            if entry.matcher.is_match(rel_path) {
                selected = !entry.exclude;
            }
        }
        selected
    }

    /// Walk `root` and return every file the set selects, sorted by path.
    ///
    /// Paths are returned joined back onto `root`.
    pub fn resolve(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut selected = Vec::new();

        // jwalk skips hidden entries by default; dotfile policy is decided
        // by `is_match`, so the walker must surface everything.
        for entry in WalkDir::new(root)
            .skip_hidden(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(rel) = relative_str(root, &path) else {
                continue;
            };
            if self.is_match(&rel) {
                selected.push(path);
            }
        }

        selected.sort();
        Ok(selected)
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be relativized.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}

fn has_dot_component(rel_path: &str) -> bool {
    rel_path
        .split('/')
        .any(|c| c.starts_with('.') && c != "." && c != "..")
}
