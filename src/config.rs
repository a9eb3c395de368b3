use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Artifact suffixes recognised when none are configured.
pub const DEFAULT_SUFFIXES: &[&str] = &[".pkg.tar.xz", ".pkg.tar.zst"];

/// Environment variable holding a comma-separated suffix list.
pub const SUFFIXES_ENV: &str = "PKGDEPS_SUFFIXES";

/// Resolution settings shared by the manager and the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding one subdirectory per package group.
    pub repo_root: PathBuf,
    /// File name suffixes that mark a built artifact.
    pub artifact_suffixes: Vec<String>,
}

impl Config {
    /// Build a config, filling unset values from the environment.
    ///
    /// `repo_root` defaults to the current directory. Suffixes fall back to
    /// `PKGDEPS_SUFFIXES`, then to [`DEFAULT_SUFFIXES`].
    pub fn new<R: Runtime>(
        runtime: &R,
        repo_root: Option<PathBuf>,
        suffixes: Vec<String>,
    ) -> Result<Self> {
        let repo_root = match repo_root {
            Some(root) => root,
            None => runtime.current_dir()?,
        };

        let artifact_suffixes = if !suffixes.is_empty() {
            suffixes
        } else if let Ok(value) = runtime.env_var(SUFFIXES_ENV) {
            debug!("Using artifact suffixes from {}: {}", SUFFIXES_ENV, value);
            parse_suffix_list(&value)
        } else {
            Vec::new()
        };

        let artifact_suffixes = if artifact_suffixes.is_empty() {
            DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect()
        } else {
            artifact_suffixes
        };

        Ok(Self {
            repo_root,
            artifact_suffixes,
        })
    }

    /// Config rooted at `repo_root` with the default suffixes.
    pub fn with_root(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            artifact_suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Default location of the module declaration file.
    pub fn modules_file(&self) -> PathBuf {
        self.repo_root.join("modules.json")
    }
}

fn parse_suffix_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
