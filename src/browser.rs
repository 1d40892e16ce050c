// src/browser.rs

//! Browser selection for the dev-serve session.
//!
//! The selection is an explicit value carried in the invocation context: the
//! browser tasks (`safari`, `chrome`, ...) overwrite it and the `serve` task
//! reads it when launching the preview. An empty selection means "system
//! default browser".
//!
//! Choices are not validated against the known set; an unrecognised value is
//! passed straight to the launcher, which logs the launch failure at its own
//! boundary.

use std::process::Command;

use tracing::{info, warn};

/// Identifiers the `allBrowsers` task selects.
pub const KNOWN_BROWSERS: [&str; 5] = [
    "safari",
    "firefox",
    "google chrome",
    "opera",
    "microsoft-edge",
];

/// The browser(s) the serve task should open. Empty = system default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserSelection {
    choices: Vec<String>,
}

impl BrowserSelection {
    /// Overwrite the selection with a single choice.
    pub fn select(&mut self, choice: impl Into<String>) {
        self.choices = vec![choice.into()];
    }

    /// Select the full known set.
    pub fn select_all(&mut self) {
        self.choices = KNOWN_BROWSERS.iter().map(|s| s.to_string()).collect();
    }

    /// The selected identifiers; empty means the system default browser.
    pub fn current(&self) -> &[String] {
        &self.choices
    }

    pub fn is_default(&self) -> bool {
        self.choices.is_empty()
    }

    /// Open `url` in every selected browser (or the system default).
    ///
    /// Launch failures are logged and never abort the serve session.
    pub fn launch(&self, url: &str) {
        if self.is_default() {
            info!(url, "opening system default browser");
            if let Err(err) = open_default(url) {
                warn!(error = %err, "could not open default browser");
            }
            return;
        }

        for choice in &self.choices {
            info!(browser = %choice, url, "opening browser");
            if let Err(err) = open_named(choice, url) {
                warn!(browser = %choice, error = %err, "could not open browser");
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn open_default(url: &str) -> anyhow::Result<()> {
    Command::new("open").arg(url).spawn()?;
    Ok(())
}

#[cfg(target_os = "windows")]
fn open_default(url: &str) -> anyhow::Result<()> {
    Command::new("cmd").args(["/C", "start", "", url]).spawn()?;
    Ok(())
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_default(url: &str) -> anyhow::Result<()> {
    let opener = which::which("xdg-open")?;
    Command::new(opener).arg(url).spawn()?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn open_named(choice: &str, url: &str) -> anyhow::Result<()> {
    let app = match choice {
        "safari" => "Safari",
        "firefox" => "Firefox",
        "google chrome" => "Google Chrome",
        "opera" => "Opera",
        "microsoft-edge" => "Microsoft Edge",
        other => other,
    };
    Command::new("open").args(["-a", app, url]).spawn()?;
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn open_named(choice: &str, url: &str) -> anyhow::Result<()> {
    let binary = match choice {
        "firefox" => "firefox",
        "google chrome" => "google-chrome",
        "opera" => "opera",
        "microsoft-edge" => "microsoft-edge",
        other => other,
    };
    let resolved = which::which(binary)?;
    Command::new(resolved).arg(url).spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection_is_empty() {
        let sel = BrowserSelection::default();
        assert!(sel.is_default());
        assert!(sel.current().is_empty());
    }

    #[test]
    fn select_overwrites_previous_choice() {
        let mut sel = BrowserSelection::default();
        sel.select("firefox");
        sel.select("opera");
        assert_eq!(sel.current(), ["opera".to_string()]);
    }

    #[test]
    fn select_all_yields_known_set() {
        let mut sel = BrowserSelection::default();
        sel.select_all();
        assert_eq!(sel.current().len(), KNOWN_BROWSERS.len());
        assert!(sel.current().iter().any(|c| c == "microsoft-edge"));
    }
}
