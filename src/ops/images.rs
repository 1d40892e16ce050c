// src/ops/images.rs

//! Image recompression into the production tree.
//!
//! PNG and JPEG files are decoded and re-encoded with the `image` crate;
//! every other format is copied verbatim. A blake3 content hash per source
//! file is kept in `.assetpipe/imgcache` so unchanged images are not
//! recompressed on subsequent builds.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;
use image::ImageFormat;
use tracing::{debug, info};

use crate::errors::PipelineError;
use crate::glob::{relative_str, PatternSetBuilder};
use crate::task::TaskContext;

/// Cache file path relative to the project root. Line format:
/// `hex_hash <space> relative_path`, sorted by path so reruns rewrite the
/// file byte-identically.
const CACHE_FILE: &str = ".assetpipe/imgcache";

const JPEG_QUALITY: u8 = 80;

/// Recompress `assets/img/**` into the production tree.
pub fn compress(ctx: &TaskContext) -> Result<(), PipelineError> {
    let prefix = ctx.rel(&ctx.config.paths.source);
    let set = PatternSetBuilder::new()
        .include(format!("{prefix}/assets/img/**"))
        .build()?;
    let files = set.resolve(&ctx.root)?;

    let img_root = ctx.source_dir().join("assets/img");
    let out_root = ctx.output_dir().join("assets/img");
    let cache_path = ctx.root.join(CACHE_FILE);

    let mut cache = load_cache(&cache_path)?;
    let mut processed = 0usize;
    let mut skipped = 0usize;

    for file in &files {
        let Some(rel) = relative_str(&img_root, file) else {
            continue;
        };
        let dest = out_root.join(&rel);

        let hash = hash_file(file)?;
        if cache.get(&rel).is_some_and(|h| *h == hash) && dest.is_file() {
            debug!(file = %rel, "unchanged since last run; skipping");
            skipped += 1;
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        recompress_one(file, &dest)?;
        cache.insert(rel, hash);
        processed += 1;
    }

    save_cache(&cache_path, &cache)?;
    info!(processed, skipped, dest = %out_root.display(), "images copied to production");
    Ok(())
}

/// Re-encode one image, or copy it verbatim for formats we don't recompress.
fn recompress_one(src: &Path, dest: &Path) -> Result<(), PipelineError> {
    let ext = src
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => {
            let img = image::open(src)
                .map_err(|e| PipelineError::transformation("image", e.to_string()))?;
            img.save_with_format(dest, ImageFormat::Png)
                .map_err(|e| PipelineError::transformation("image", e.to_string()))?;
        }
        Some("jpg") | Some("jpeg") => {
            let img = image::open(src)
                .map_err(|e| PipelineError::transformation("image", e.to_string()))?;
            let file = File::create(dest)?;
            let mut writer = BufWriter::new(file);
            let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
            img.write_with_encoder(encoder)
                .map_err(|e| PipelineError::transformation("image", e.to_string()))?;
            writer.flush()?;
        }
        // SVG, GIF and anything else pass through untouched.
        _ => {
            fs::copy(src, dest)?;
        }
    }
    Ok(())
}

/// blake3 hash of one file's contents, hex encoded.
fn hash_file(path: &Path) -> Result<String, PipelineError> {
    let mut hasher = blake3::Hasher::new();
    let mut file =
        File::open(path).with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

fn load_cache(path: &Path) -> Result<BTreeMap<String, String>, PipelineError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let file = File::open(path).with_context(|| format!("opening image cache at {:?}", path))?;
    let reader = BufReader::new(file);

    let mut map = BTreeMap::new();
    for line_res in reader.lines() {
        let line = line_res?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // Hash first: relative paths may contain spaces.
        if let Some((hash, rel)) = trimmed.split_once(' ') {
            map.insert(rel.to_string(), hash.to_string());
        }
    }
    Ok(map)
}

fn save_cache(path: &Path, map: &BTreeMap<String, String>) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating cache directory at {:?}", parent))?;
    }

    let file = File::create(path).with_context(|| format!("creating image cache at {:?}", path))?;
    let mut writer = BufWriter::new(file);
    for (rel, hash) in map.iter() {
        writeln!(writer, "{hash} {rel}")?;
    }
    writer.flush()?;
    Ok(())
}
