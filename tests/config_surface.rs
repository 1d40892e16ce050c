use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use assetpipe::config::{load_from_path, load_or_default, Config};
use assetpipe::task::TaskContext;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn missing_config_file_falls_back_to_defaults() -> TestResult {
    let dir = tempdir()?;
    let cfg = load_or_default(dir.path().join("Assetpipe.toml"))?;

    assert_eq!(cfg.paths.source, PathBuf::from("src"));
    assert_eq!(cfg.paths.output, PathBuf::from("public"));
    assert_eq!(cfg.paths.staging, PathBuf::from("temp"));
    assert_eq!(cfg.serve.port, 9000);
    assert_eq!(cfg.serve.ws_port, 35729);
    assert_eq!(cfg.lint.forbid, [r"\bdebugger\b".to_string()]);
    assert_eq!(
        cfg.clean.dirs,
        [PathBuf::from("temp"), PathBuf::from("public")]
    );
    Ok(())
}

#[test]
fn partial_config_overrides_only_named_fields() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Assetpipe.toml");
    fs::write(
        &path,
        r#"
[paths]
output = "dist"

[serve]
port = 8080

[lint]
forbid = ["\\bconsole\\.log\\b", "\\bdebugger\\b"]
"#,
    )?;

    let cfg = load_from_path(&path)?;
    assert_eq!(cfg.paths.output, PathBuf::from("dist"));
    assert_eq!(cfg.paths.source, PathBuf::from("src"), "untouched default");
    assert_eq!(cfg.serve.port, 8080);
    assert_eq!(cfg.serve.ws_port, 35729, "untouched default");
    assert_eq!(cfg.lint.forbid.len(), 2);
    Ok(())
}

#[test]
fn malformed_config_file_is_an_error() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Assetpipe.toml");
    fs::write(&path, "[paths\noutput = ")?;

    assert!(load_from_path(&path).is_err());
    // load_or_default only tolerates absence, not corruption.
    assert!(load_or_default(&path).is_err());
    Ok(())
}

#[test]
fn context_resolves_trees_against_the_project_root() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    let ctx = TaskContext::new(root, Config::default());

    assert_eq!(ctx.source_dir(), root.join("src"));
    assert_eq!(ctx.output_dir(), root.join("public"));
    assert_eq!(ctx.staging_dir(), root.join("temp"));
    Ok(())
}
