// src/ops/mod.rs

//! Task bodies: the actual transformations the runner dispatches into.
//!
//! Every meaningful transformation is delegated to an external crate (`grass`
//! and `lightningcss` for styles, `oxc` for scripts, `image` for images,
//! `tl` for HTML parsing); these modules sequence the calls and wire glob
//! pattern sets to destination folders.

pub mod assets;
pub mod clean;
pub mod html;
pub mod images;
pub mod lint;
pub mod scripts;
pub mod styles;

use std::fs;
use std::path::Path;

use crate::errors::PipelineError;

/// Write `contents` to `dest`, creating parent directories as needed.
pub(crate) fn write_output(dest: &Path, contents: &[u8]) -> Result<(), PipelineError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, contents)?;
    Ok(())
}
