// src/ops/scripts.rs

//! Script bundling.
//!
//! Source scripts are concatenated in filename-sort order into a single
//! `main.js`. The production variant is minified with oxc; the development
//! variant stays readable and carries a sourcemap next to the staging
//! bundle.

use std::fs;
use std::path::{Path, PathBuf};

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use tracing::{debug, info, warn};

use crate::errors::PipelineError;
use crate::glob::PatternSetBuilder;
use crate::ops::write_output;
use crate::task::TaskContext;

const OUTPUT_NAME: &str = "main.js";
const MAP_NAME: &str = "main.js.map";

/// Source scripts in filename-sort order (one directory level, like the
/// staging/production bundles they feed).
pub fn sources(ctx: &TaskContext) -> Result<Vec<PathBuf>, PipelineError> {
    let prefix = ctx.rel(&ctx.config.paths.source);
    let set = PatternSetBuilder::new()
        .include(format!("{prefix}/assets/scripts/*.js"))
        .build()?;
    Ok(set.resolve(&ctx.root)?)
}

/// Concatenate sources into the staging bundle, sourcemap alongside. Parse
/// problems are logged and the raw concatenation is written instead (no map);
/// the strict gate lives in `ops::lint`.
pub fn compile_dev(ctx: &TaskContext) -> Result<(), PipelineError> {
    let files = sources(ctx)?;
    if files.is_empty() {
        debug!("no source scripts; skipping dev bundle");
        return Ok(());
    }

    let bundle = concat(&files)?;
    let dest_dir = ctx.staging_dir().join("assets/scripts");
    let dest = dest_dir.join(OUTPUT_NAME);

    match render_dev(&bundle, &dest) {
        Ok((mut code, map)) => {
            if let Some(map) = map {
                write_output(&dest_dir.join(MAP_NAME), map.as_bytes())?;
                code.push_str(&format!("\n//# sourceMappingURL={MAP_NAME}\n"));
            }
            write_output(&dest, code.as_bytes())?;
        }
        Err(diagnostics) => {
            warn!("script bundle has parse diagnostics:\n{diagnostics}");
            write_output(&dest, bundle.as_bytes())?;
        }
    }

    info!(dest = %dest.display(), files = files.len(), "bundled scripts for development");
    Ok(())
}

/// Concatenate and minify sources into the production bundle. Parse errors
/// are fatal and nothing is written.
pub fn compile_prod(ctx: &TaskContext) -> Result<(), PipelineError> {
    let files = sources(ctx)?;
    if files.is_empty() {
        debug!("no source scripts; skipping production bundle");
        return Ok(());
    }

    let bundle = concat(&files)?;
    let minified = minify(&bundle)?;

    let dest = ctx.output_dir().join("assets/scripts").join(OUTPUT_NAME);
    write_output(&dest, minified.as_bytes())?;
    info!(dest = %dest.display(), files = files.len(), "bundled scripts for production");
    Ok(())
}

fn concat(files: &[PathBuf]) -> Result<String, PipelineError> {
    let mut bundle = String::new();
    for file in files {
        let source = fs::read_to_string(file)?;
        bundle.push_str(&source);
        if !bundle.ends_with('\n') {
            bundle.push('\n');
        }
    }
    Ok(bundle)
}

/// Re-print the bundle through the code generator so a sourcemap can be
/// emitted alongside it. Returns the joined parse diagnostics on failure.
fn render_dev(source: &str, dest: &Path) -> Result<(String, Option<String>), String> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if !parsed.errors.is_empty() {
        return Err(join_diagnostics(&parsed.errors));
    }

    let ret = Codegen::new()
        .with_options(CodegenOptions {
            source_map_path: Some(dest.to_path_buf()),
            ..CodegenOptions::default()
        })
        .build(&parsed.program);
    Ok((ret.code, ret.map.map(|m| m.to_json_string())))
}

/// Minify a JavaScript bundle with oxc.
fn minify(source: &str) -> Result<String, PipelineError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if !ret.errors.is_empty() {
        return Err(PipelineError::transformation(
            "oxc",
            join_diagnostics(&ret.errors),
        ));
    }

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

pub(crate) fn join_diagnostics<T: std::fmt::Display>(errors: &[T]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
