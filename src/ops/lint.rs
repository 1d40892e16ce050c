// src/ops/lint.rs

//! Script linting.
//!
//! Diagnostics come from two sources: oxc parse errors, and the configured
//! `[lint] forbid` regexes matched per line. `report` logs them and never
//! fails; `gate` aborts the pipeline on any diagnostic.

use std::fs;

use oxc::allocator::Allocator;
use oxc::parser::Parser;
use oxc::span::SourceType;
use regex::Regex;
use tracing::{info, warn};

use crate::errors::PipelineError;
use crate::ops::scripts;
use crate::task::TaskContext;

/// One lint finding, formatted `file:line message`.
pub type Violation = String;

/// Lint every source script and return the findings.
pub fn lint_sources(ctx: &TaskContext) -> Result<Vec<Violation>, PipelineError> {
    let forbid: Vec<Regex> = ctx
        .config
        .lint
        .forbid
        .iter()
        .filter_map(|pat| match Regex::new(pat) {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(pattern = %pat, error = %err, "invalid [lint] forbid regex; ignoring");
                None
            }
        })
        .collect();

    let mut violations = Vec::new();

    for file in scripts::sources(ctx)? {
        let source = fs::read_to_string(&file)?;
        let name = file.display().to_string();

        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &source, SourceType::mjs()).parse();
        for err in &ret.errors {
            violations.push(format!("{name}: {err}"));
        }

        for (idx, line) in source.lines().enumerate() {
            for re in &forbid {
                if re.is_match(line) {
                    violations.push(format!(
                        "{name}:{}: forbidden pattern `{}`",
                        idx + 1,
                        re.as_str()
                    ));
                }
            }
        }
    }

    Ok(violations)
}

/// Log findings; always succeeds.
pub fn report(ctx: &TaskContext) -> Result<(), PipelineError> {
    let violations = lint_sources(ctx)?;
    if violations.is_empty() {
        info!("lint: no problems found");
    } else {
        for v in &violations {
            warn!("lint: {v}");
        }
    }
    Ok(())
}

/// Fail-fast gate: any finding aborts with `LintViolation`.
pub fn gate(ctx: &TaskContext) -> Result<(), PipelineError> {
    let violations = lint_sources(ctx)?;
    if violations.is_empty() {
        return Ok(());
    }
    for v in &violations {
        warn!("lint: {v}");
    }
    Err(PipelineError::LintViolation {
        count: violations.len(),
    })
}
