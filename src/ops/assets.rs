// src/ops/assets.rs

//! Copy unprocessed assets to the production tree.
//!
//! Everything under the source tree that is not handled by a dedicated task
//! is copied verbatim: HTML is compressed by `ops::html`, images by
//! `ops::images`, scripts and styles by their compile tasks. Dotfiles (e.g.
//! `.htaccess`) are included.

use std::fs;

use tracing::info;

use crate::errors::PipelineError;
use crate::glob::{relative_str, PatternSetBuilder};
use crate::task::TaskContext;

pub fn copy_unprocessed(ctx: &TaskContext) -> Result<(), PipelineError> {
    let prefix = ctx.rel(&ctx.config.paths.source);
    let set = PatternSetBuilder::new()
        .include(format!("{prefix}/**"))
        .exclude(format!("{prefix}/html/**"))
        .exclude(format!("{prefix}/assets/img/**"))
        .exclude(format!("{prefix}/assets/**/*.js"))
        .exclude(format!("{prefix}/assets/styles/**"))
        .with_dotfiles(true)
        .build()?;

    let src_root = ctx.source_dir();
    let out_root = ctx.output_dir();
    let mut copied = 0usize;

    for file in set.resolve(&ctx.root)? {
        let Some(rel) = relative_str(&src_root, &file) else {
            continue;
        };
        let dest = out_root.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&file, &dest)?;
        copied += 1;
    }

    info!(copied, dest = %out_root.display(), "unprocessed assets copied to production");
    Ok(())
}
