// src/ops/styles.rs

//! Stylesheet compilation.
//!
//! `grass` compiles the SCSS entry point; `lightningcss` applies
//! browser-targeted vendor prefixes and, for production, minification. The
//! development compile writes a sourcemap next to the staging bundle and
//! logs transformation errors (with the compiler's line/column context)
//! instead of failing; production compiles propagate them and emit no map.

use std::path::PathBuf;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;
use tracing::{debug, error, info};

use crate::errors::PipelineError;
use crate::ops::write_output;
use crate::task::TaskContext;

/// Stylesheet entry point relative to the source tree.
const ENTRY: &str = "assets/styles/main.scss";
const OUTPUT_NAME: &str = "main.css";
const MAP_NAME: &str = "main.css.map";

struct CssOutput {
    code: String,
    map: Option<String>,
}

/// Compile the entry expanded (readable) into the staging tree, sourcemap
/// alongside. Errors are logged, never fatal: the dev loop keeps serving the
/// last good output.
pub fn compile_dev(ctx: &TaskContext) -> Result<(), PipelineError> {
    let dest_dir = ctx.staging_dir().join("assets/styles");

    let compiled = match compile_inner(ctx, grass::OutputStyle::Expanded, false, true) {
        Ok(out) => out,
        Err(PipelineError::Transformation { tool, message }) => {
            error!(tool, "stylesheet compile failed:\n{message}");
            return Ok(());
        }
        Err(other) => return Err(other),
    };
    let Some(mut out) = compiled else {
        return Ok(());
    };

    if let Some(map) = out.map {
        write_output(&dest_dir.join(MAP_NAME), map.as_bytes())?;
        out.code
            .push_str(&format!("\n/*# sourceMappingURL={MAP_NAME} */\n"));
    }
    let dest = dest_dir.join(OUTPUT_NAME);
    write_output(&dest, out.code.as_bytes())?;
    info!(dest = %dest.display(), "compiled stylesheet for development");
    Ok(())
}

/// Compile the entry compressed and minified into the production tree.
/// Transformation errors are fatal and nothing is written.
pub fn compile_prod(ctx: &TaskContext) -> Result<(), PipelineError> {
    let dest = ctx.output_dir().join("assets/styles").join(OUTPUT_NAME);

    match compile_inner(ctx, grass::OutputStyle::Compressed, true, false)? {
        Some(out) => {
            write_output(&dest, out.code.as_bytes())?;
            info!(dest = %dest.display(), "compiled stylesheet for production");
            Ok(())
        }
        None => Ok(()),
    }
}

fn compile_inner(
    ctx: &TaskContext,
    style: grass::OutputStyle,
    minify: bool,
    with_map: bool,
) -> Result<Option<CssOutput>, PipelineError> {
    let entry: PathBuf = ctx.source_dir().join(ENTRY);
    if !entry.is_file() {
        debug!(entry = %entry.display(), "no stylesheet entry; skipping");
        return Ok(None);
    }

    let options = grass::Options::default().style(style);
    let css = grass::from_path(&entry, &options)
        .map_err(|e| PipelineError::transformation("grass", e.to_string()))?;

    let targets = browser_targets();
    let parser_options = ParserOptions {
        filename: entry.display().to_string(),
        ..ParserOptions::default()
    };
    let mut sheet = StyleSheet::parse(&css, parser_options)
        .map_err(|e| PipelineError::transformation("lightningcss", e.to_string()))?;
    sheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| PipelineError::transformation("lightningcss", e.to_string()))?;

    let mut source_map = with_map.then(|| SourceMap::new("/"));
    let out = sheet
        .to_css(PrinterOptions {
            minify,
            targets,
            source_map: source_map.as_mut(),
            ..PrinterOptions::default()
        })
        .map_err(|e| PipelineError::transformation("lightningcss", e.to_string()))?;

    let map = match source_map {
        Some(mut sm) => Some(
            sm.to_json(None)
                .map_err(|e| PipelineError::transformation("lightningcss", e.to_string()))?,
        ),
        None => None,
    };

    Ok(Some(CssOutput {
        code: out.code,
        map,
    }))
}

/// Prefixing targets: roughly "two versions behind current" for the browsers
/// the selector tasks know about. Versions are encoded major << 16.
fn browser_targets() -> Targets {
    Targets::from(Browsers {
        safari: Some(15 << 16),
        firefox: Some(100 << 16),
        chrome: Some(100 << 16),
        opera: Some(85 << 16),
        edge: Some(100 << 16),
        ..Browsers::default()
    })
}
