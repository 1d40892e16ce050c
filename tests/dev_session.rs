use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use assetpipe::config::Config;
use assetpipe::errors::PipelineError;
use assetpipe::task::{Registry, Runner, TaskContext};

type TestResult = Result<(), Box<dyn Error>>;

fn write(root: &Path, rel: &str, contents: &str) -> TestResult {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn run_tasks(root: &Path, names: &[&str]) -> Result<TaskContext, PipelineError> {
    let registry = Registry::builtin()?;
    let mut ctx = TaskContext::new(root, Config::default());
    let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    Runner::new(&registry).run(&names, &mut ctx)?;
    Ok(ctx)
}

#[test]
fn serve_prerequisites_populate_the_staging_tree() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write(
        root,
        "src/html/index.html",
        "<!doctype html><html><head><title>t</title></head><body></body></html>",
    )?;
    write(root, "src/assets/styles/main.scss", "body { margin: 0; }\n")?;
    write(root, "src/assets/scripts/app.js", "console.log(\"hi\");\n")?;

    let ctx = run_tasks(root, &["serve"])?;

    assert!(ctx.serve_requested, "serve task marks the session request");
    assert!(root.join("temp/assets/styles/main.css").is_file());
    assert!(root.join("temp/assets/scripts/main.js").is_file());
    // Dev compiles never write to the production tree.
    assert!(!root.join("public").exists());
    Ok(())
}

#[test]
fn dev_bundles_carry_sourcemaps() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write(root, "src/assets/styles/main.scss", "body { margin: 0; }\n")?;
    write(root, "src/assets/scripts/app.js", "console.log(\"hi\");\n")?;

    run_tasks(root, &["compileCSSForDev", "compileJSForDev"])?;

    let css = fs::read_to_string(root.join("temp/assets/styles/main.css"))?;
    assert!(css.contains("sourceMappingURL=main.css.map"));
    let css_map = fs::read_to_string(root.join("temp/assets/styles/main.css.map"))?;
    assert!(css_map.contains("\"mappings\""));

    let js = fs::read_to_string(root.join("temp/assets/scripts/main.js"))?;
    assert!(js.contains("sourceMappingURL=main.js.map"));
    let js_map = fs::read_to_string(root.join("temp/assets/scripts/main.js.map"))?;
    assert!(js_map.contains("\"mappings\""));
    Ok(())
}

#[test]
fn production_bundles_have_no_sourcemaps() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write(root, "src/assets/styles/main.scss", "body { margin: 0; }\n")?;
    write(root, "src/assets/scripts/app.js", "console.log(\"hi\");\n")?;

    run_tasks(root, &["compileCSSForProd", "compileJSForProd"])?;

    let css = fs::read_to_string(root.join("public/assets/styles/main.css"))?;
    assert!(!css.contains("sourceMappingURL"));
    assert!(!root.join("public/assets/styles/main.css.map").exists());
    assert!(!root.join("public/assets/scripts/main.js.map").exists());
    Ok(())
}

#[test]
fn browser_tasks_thread_the_selection_into_the_context() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();

    let ctx = run_tasks(root, &["chrome"])?;
    assert_eq!(ctx.browser.current(), ["google chrome".to_string()]);

    // Later selector tasks overwrite earlier ones.
    let ctx = run_tasks(root, &["chrome", "firefox"])?;
    assert_eq!(ctx.browser.current(), ["firefox".to_string()]);

    let ctx = run_tasks(root, &["allBrowsers"])?;
    assert_eq!(ctx.browser.current().len(), 5);

    let ctx = run_tasks(root, &[])?;
    assert!(ctx.browser.is_default());
    Ok(())
}

#[test]
fn repeated_task_names_run_once_per_invocation() -> TestResult {
    let dir = tempdir()?;

    // The second `chrome` is memoized away, so the later distinct selection
    // stands.
    let ctx = run_tasks(dir.path(), &["chrome", "firefox", "chrome"])?;
    assert_eq!(ctx.browser.current(), ["firefox".to_string()]);
    Ok(())
}

#[test]
fn dev_stylesheet_errors_are_not_fatal_and_write_nothing() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write(root, "src/assets/styles/main.scss", "body { color: $missing; }\n")?;

    run_tasks(root, &["compileCSSForDev"])?;

    assert!(!root.join("temp/assets/styles/main.css").exists());
    Ok(())
}

#[test]
fn dev_script_bundle_is_written_despite_parse_diagnostics() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write(root, "src/assets/scripts/bad.js", "function (  {\n")?;

    run_tasks(root, &["compileJSForDev"])?;
    // Non-strict lint also tolerates the broken source.
    run_tasks(root, &["lintJS"])?;

    assert!(root.join("temp/assets/scripts/main.js").is_file());
    // A broken bundle is written raw, without a sourcemap.
    assert!(!root.join("temp/assets/scripts/main.js.map").exists());
    Ok(())
}

#[test]
fn clean_removes_expendable_trees_and_is_idempotent() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write(root, "temp/assets/styles/main.css", "body{margin:0}")?;
    write(root, "public/index.html", "<html></html>")?;
    write(root, "src/html/index.html", "<!doctype html><html></html>")?;

    run_tasks(root, &["clean"])?;
    assert!(!root.join("temp").exists());
    assert!(!root.join("public").exists());
    // The source tree is never part of the sweep.
    assert!(root.join("src/html/index.html").is_file());

    // A second sweep over missing directories still succeeds.
    run_tasks(root, &["clean"])?;
    Ok(())
}
