// src/ops/clean.rs

//! Cleanup of expendable output directories.
//!
//! Fire-and-forget: each configured directory is checked and removed if
//! present. Absence and inaccessibility are reported identically, and a
//! failed removal is logged without aborting the sweep; the directories are
//! regenerated by `build` and `serve` anyway.

use std::fs;

use tracing::error;

use crate::errors::PipelineError;
use crate::task::TaskContext;

pub fn sweep(ctx: &TaskContext) -> Result<(), PipelineError> {
    for dir in &ctx.config.clean.dirs {
        let path = ctx.root.join(dir);
        let name = dir.display();

        match fs::metadata(&path) {
            Ok(_) => {
                println!("\tThe {name} directory was found and will be deleted.");
                if let Err(err) = fs::remove_dir_all(&path) {
                    let failure = PipelineError::FilesystemAccess {
                        path: path.clone(),
                        source: err,
                    };
                    error!("clean: {failure}");
                }
            }
            Err(_) => {
                println!("\tThe {name} directory does not exist or is not accessible.");
            }
        }
    }
    Ok(())
}
