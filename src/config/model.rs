// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from `Assetpipe.toml`.
///
/// ```toml
/// [paths]
/// source = "src"
/// output = "public"
/// staging = "temp"
///
/// [serve]
/// port = 9000
/// roots = ["temp", "src", "src/html"]
///
/// [lint]
/// forbid = ["debugger"]
/// ```
///
/// All sections are optional and have defaults matching the conventional
/// `src` / `public` / `temp` project layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Source, production output, and development staging trees.
    #[serde(default)]
    pub paths: PathsSection,

    /// Development server settings from `[serve]`.
    #[serde(default)]
    pub serve: ServeSection,

    /// Script lint settings from `[lint]`.
    #[serde(default)]
    pub lint: LintSection,

    /// Expendable directories removed by the `clean` task.
    #[serde(default)]
    pub clean: CleanSection,
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Source tree, containing `html`, `assets/styles`, `assets/scripts`
    /// and `assets/img` subtrees.
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Production output tree, mirroring the source layout.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Staging tree for development-only compiled intermediates.
    #[serde(default = "default_staging")]
    pub staging: PathBuf,
}

fn default_source() -> PathBuf {
    PathBuf::from("src")
}

fn default_output() -> PathBuf {
    PathBuf::from("public")
}

fn default_staging() -> PathBuf {
    PathBuf::from("temp")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
            staging: default_staging(),
        }
    }
}

/// `[serve]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServeSection {
    /// Fixed TCP port for the development HTTP server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Port for the WebSocket reload channel.
    #[serde(default = "default_ws_port")]
    pub ws_port: u16,

    /// Delay between a reload-triggering change and the notification being
    /// pushed, giving staging writes time to land on disk.
    #[serde(default = "default_reload_delay_ms")]
    pub reload_delay_ms: u64,

    /// Ordered candidate base directories the server resolves requests
    /// against; first match wins.
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,
}

fn default_port() -> u16 {
    9000
}

fn default_ws_port() -> u16 {
    35729
}

fn default_reload_delay_ms() -> u64 {
    100
}

fn default_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from("temp"),
        PathBuf::from("src"),
        PathBuf::from("src/html"),
    ]
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            ws_port: default_ws_port(),
            reload_delay_ms: default_reload_delay_ms(),
            roots: default_roots(),
        }
    }
}

/// `[lint]` section.
///
/// `forbid` entries are regexes matched per source line, in addition to the
/// parse diagnostics the script parser reports.
#[derive(Debug, Clone, Deserialize)]
pub struct LintSection {
    #[serde(default = "default_forbid")]
    pub forbid: Vec<String>,
}

fn default_forbid() -> Vec<String> {
    vec![r"\bdebugger\b".to_string()]
}

impl Default for LintSection {
    fn default() -> Self {
        Self {
            forbid: default_forbid(),
        }
    }
}

/// `[clean]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanSection {
    /// Directories the `clean` task removes. Both are regenerated by the
    /// `build` and `serve` tasks.
    #[serde(default = "default_clean_dirs")]
    pub dirs: Vec<PathBuf>,
}

fn default_clean_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("temp"), PathBuf::from("public")]
}

impl Default for CleanSection {
    fn default() -> Self {
        Self {
            dirs: default_clean_dirs(),
        }
    }
}
