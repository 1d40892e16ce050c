// src/ops/html.rs

//! HTML validation and compression.
//!
//! Validation parses each source page with `tl` and reports structural
//! issues (missing doctype, missing/empty title, `img` without `alt`,
//! duplicate `id`s) with file context. It never writes files and never fails
//! the pipeline. Compression strips comments and collapses whitespace into
//! the production tree.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::errors::PipelineError;
use crate::glob::{relative_str, PatternSetBuilder};
use crate::ops::write_output;
use crate::task::TaskContext;

/// Source pages: the html tree root and everything nested below it.
pub fn sources(ctx: &TaskContext) -> Result<Vec<PathBuf>, PipelineError> {
    let prefix = ctx.rel(&ctx.config.paths.source);
    let set = PatternSetBuilder::new()
        .include(format!("{prefix}/html/*.html"))
        .include(format!("{prefix}/html/**/*.html"))
        .build()?;
    Ok(set.resolve(&ctx.root)?)
}

/// Parse and check every source page, logging findings.
pub fn validate(ctx: &TaskContext) -> Result<(), PipelineError> {
    let mut total = 0usize;

    for file in sources(ctx)? {
        let source = fs::read_to_string(&file)?;
        let findings = check_page(&source);
        total += findings.len();
        for finding in findings {
            warn!(file = %file.display(), "html: {finding}");
        }
    }

    if total == 0 {
        info!("html validation: no problems found");
    } else {
        warn!(problems = total, "html validation finished with problems");
    }
    Ok(())
}

/// Strip comments and collapse whitespace from every source page into the
/// production tree, preserving paths relative to the html tree.
pub fn compress(ctx: &TaskContext) -> Result<(), PipelineError> {
    let html_root = ctx.source_dir().join("html");
    let out_root = ctx.output_dir();
    let mut written = 0usize;

    for file in sources(ctx)? {
        let Some(rel) = relative_str(&html_root, &file) else {
            continue;
        };
        let source = fs::read_to_string(&file)?;
        let compressed = minify_html(&source);
        write_output(&out_root.join(rel), compressed.as_bytes())?;
        written += 1;
    }

    info!(pages = written, dest = %out_root.display(), "compressed html");
    Ok(())
}

/// Structural checks for one page. Returns human-readable findings.
fn check_page(source: &str) -> Vec<String> {
    let mut findings = Vec::new();

    if !source
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("<!doctype")
    {
        findings.push("missing doctype declaration".to_string());
    }

    let Ok(dom) = tl::parse(source, tl::ParserOptions::default()) else {
        findings.push("page could not be parsed".to_string());
        return findings;
    };

    let parser = dom.parser();
    let mut has_title = false;
    let mut seen_ids: HashSet<String> = HashSet::new();

    for node in dom.nodes() {
        let Some(tag) = node.as_tag() else { continue };
        let name = tag.name().as_utf8_str().to_lowercase();

        if name == "title" {
            has_title = true;
            if tag.inner_text(parser).trim().is_empty() {
                findings.push("empty <title>".to_string());
            }
        }

        if name == "img" {
            let has_alt = tag
                .attributes()
                .iter()
                .any(|(key, _)| key.as_ref() == "alt");
            if !has_alt {
                findings.push("<img> without alt attribute".to_string());
            }
        }

        if let Some((_, Some(id))) = tag
            .attributes()
            .iter()
            .find(|(key, _)| key.as_ref() == "id")
        {
            let id = id.to_string();
            if !seen_ids.insert(id.clone()) {
                findings.push(format!("duplicate id \"{id}\""));
            }
        }
    }

    if !has_title {
        findings.push("missing <title>".to_string());
    }

    findings
}

/// Remove comments, then collapse whitespace runs and inter-tag gaps.
///
/// `pre`, `textarea`, `script` and `style` elements are whitespace-sensitive
/// and pass through untouched.
fn minify_html(source: &str) -> String {
    static PROTECTED: OnceLock<Regex> = OnceLock::new();
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    static RUNS: OnceLock<Regex> = OnceLock::new();
    static BETWEEN_TAGS: OnceLock<Regex> = OnceLock::new();

    let protected = PROTECTED.get_or_init(|| {
        Regex::new(
            r"(?is)<pre\b.*?</pre\s*>|<textarea\b.*?</textarea\s*>|<script\b.*?</script\s*>|<style\b.*?</style\s*>",
        )
        .expect("static regex")
    });
    let comment = COMMENT.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("static regex"));
    let runs = RUNS.get_or_init(|| Regex::new(r"\s{2,}").expect("static regex"));
    let between = BETWEEN_TAGS.get_or_init(|| Regex::new(r">\s+<").expect("static regex"));

    // Swap whitespace-sensitive blocks out for control-character markers the
    // collapse passes cannot touch, and restore them at the end.
    let mut blocks: Vec<String> = Vec::new();
    let masked = protected.replace_all(source, |caps: &regex::Captures| {
        blocks.push(caps[0].to_string());
        format!("\u{1}{}\u{1}", blocks.len() - 1)
    });

    let out = comment.replace_all(&masked, "");
    let out = runs.replace_all(&out, " ");
    let out = between.replace_all(&out, "><");
    let mut out = out.trim().to_string();

    for (idx, block) in blocks.iter().enumerate() {
        out = out.replace(&format!("\u{1}{idx}\u{1}"), block);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minify_strips_comments_and_collapses_whitespace() {
        let page = "<!doctype html>\n<html>\n  <body>\n    <!-- note -->\n    <p>hi   there</p>\n  </body>\n</html>\n";
        let out = minify_html(page);
        assert!(!out.contains("note"));
        assert!(!out.contains('\n'));
        assert!(out.contains("<p>hi there</p>"));
    }

    #[test]
    fn minify_leaves_whitespace_sensitive_elements_alone() {
        let page = "<!doctype html>\n<html><body>\n  <pre>line one\n    line two</pre>\n  <script>\nconst x  =  1;\n</script>\n  <p>a   b</p>\n</body></html>";
        let out = minify_html(page);
        assert!(out.contains("line one\n    line two"));
        assert!(out.contains("\nconst x  =  1;\n"));
        assert!(out.contains("<p>a b</p>"));
    }

    #[test]
    fn check_page_flags_missing_doctype_and_alt() {
        let page = "<html><head><title>t</title></head><body><img src=\"a.png\"></body></html>";
        let findings = check_page(page);
        assert!(findings.iter().any(|f| f.contains("doctype")));
        assert!(findings.iter().any(|f| f.contains("alt")));
    }

    #[test]
    fn check_page_flags_duplicate_ids() {
        let page =
            "<!doctype html><html><head><title>t</title></head><body><p id=\"x\"></p><p id=\"x\"></p></body></html>";
        let findings = check_page(page);
        assert!(findings.iter().any(|f| f.contains("duplicate id")));
    }

    #[test]
    fn clean_page_has_no_findings() {
        let page = "<!doctype html><html><head><title>ok</title></head><body><img src=\"a.png\" alt=\"a\"></body></html>";
        assert!(check_page(page).is_empty());
    }
}
