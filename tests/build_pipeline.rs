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

/// A small but complete source tree: pages, styles, scripts, an image that
/// passes through untouched, a font, and a dotfile.
fn write_project(root: &Path) -> TestResult {
    write(
        root,
        "src/html/index.html",
        "<!doctype html>\n<html>\n  <head><title>Home</title></head>\n  <body>\n    <!-- header -->\n    <h1>Hello</h1>\n  </body>\n</html>\n",
    )?;
    write(
        root,
        "src/html/about/team.html",
        "<!doctype html><html><head><title>Team</title></head><body><p>us</p></body></html>",
    )?;
    write(
        root,
        "src/assets/styles/main.scss",
        "$ink: #222;\nbody {\n  color: $ink;\n}\n",
    )?;
    write(root, "src/assets/scripts/a.js", "console.log(\"alpha\");\n")?;
    write(root, "src/assets/scripts/b.js", "console.log(\"beta\");\n")?;
    write(root, "src/assets/img/logo.svg", "<svg></svg>")?;
    write(root, "src/assets/img/icons/arrow.svg", "<svg><path/></svg>")?;
    write(root, "src/assets/fonts/body.woff2", "not-a-real-font")?;
    write(root, "src/.htaccess", "Options -Indexes\n")?;
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
fn build_produces_full_production_tree() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write_project(root)?;

    run_tasks(root, &["build"])?;

    // Pages land relative to the html tree root, compressed.
    let index = fs::read_to_string(root.join("public/index.html"))?;
    assert!(!index.contains("header"), "comments stripped");
    assert!(!index.contains('\n'), "whitespace collapsed");
    assert!(index.contains("<h1>Hello</h1>"));
    assert!(root.join("public/about/team.html").is_file());

    // Stylesheet compiled and minified into a single bundle.
    let css = fs::read_to_string(root.join("public/assets/styles/main.css"))?;
    assert!(css.contains("#222"));
    assert!(!css.contains("$ink"));

    // Scripts concatenated in filename order, then minified.
    let js = fs::read_to_string(root.join("public/assets/scripts/main.js"))?;
    let alpha = js.find("alpha").expect("a.js content present");
    let beta = js.find("beta").expect("b.js content present");
    assert!(alpha < beta, "bundle keeps filename-sort order");

    // Image passed through, other assets copied, dotfiles included.
    assert_eq!(
        fs::read_to_string(root.join("public/assets/img/logo.svg"))?,
        "<svg></svg>"
    );
    assert!(root.join("public/assets/img/icons/arrow.svg").is_file());
    assert!(root.join("public/assets/fonts/body.woff2").is_file());
    assert!(root.join("public/.htaccess").is_file());

    // Handled subtrees are not copied verbatim.
    assert!(!root.join("public/html").exists());
    assert!(!root.join("public/assets/styles/main.scss").exists());
    assert!(!root.join("public/assets/scripts/a.js").exists());

    // The image cache survives the build for the next run.
    assert!(root.join(".assetpipe/imgcache").is_file());

    Ok(())
}

#[test]
fn second_build_reuses_image_cache() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write_project(root)?;

    run_tasks(root, &["build"])?;
    let cache_before = fs::read_to_string(root.join(".assetpipe/imgcache"))?;
    run_tasks(root, &["build"])?;
    let cache_after = fs::read_to_string(root.join(".assetpipe/imgcache"))?;

    // Several entries, written in a stable order: reruns are byte-identical.
    assert!(cache_before.lines().count() >= 2);
    assert_eq!(cache_before, cache_after);
    assert!(root.join("public/assets/img/logo.svg").is_file());
    Ok(())
}

#[test]
fn invalid_stylesheet_halts_build_before_output_is_written() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write_project(root)?;
    write(root, "src/assets/styles/main.scss", "body { color: $undefined; }\n")?;

    let err = run_tasks(root, &["build"]).expect_err("build must fail");
    assert_eq!(err.origin_task(), Some("compileCSSForProd"));
    match err.root_cause() {
        PipelineError::Transformation { tool, message } => {
            assert_eq!(*tool, "grass");
            // The compiler's line:column context must survive into the error.
            let location = regex::Regex::new(r"\d+:\d+")?;
            assert!(
                location.is_match(message),
                "no line/column in message: {message}"
            );
        }
        other => panic!("unexpected failure kind: {other}"),
    }

    // Compiles come before any copy step, so nothing reached the output tree.
    assert!(!root.join("public").exists());
    Ok(())
}

#[test]
fn lint_gate_stops_build_on_forbidden_pattern() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write_project(root)?;
    write(
        root,
        "src/assets/scripts/b.js",
        "debugger;\nconsole.log(\"beta\");\n",
    )?;

    let err = run_tasks(root, &["build"]).expect_err("gate must fail");
    assert_eq!(err.origin_task(), Some("lintJsAndFail"));
    assert!(matches!(
        err.root_cause(),
        PipelineError::LintViolation { count: 1 }
    ));
    assert!(!root.join("public").exists());
    Ok(())
}

#[test]
fn unknown_task_fails_without_touching_the_tree() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    write_project(root)?;

    let err = run_tasks(root, &["deploy"]).expect_err("unknown task must fail");
    assert!(matches!(
        err,
        PipelineError::TaskNotFound { ref name } if name == "deploy"
    ));
    assert!(!root.join("public").exists());
    assert!(!root.join("temp").exists());
    Ok(())
}
