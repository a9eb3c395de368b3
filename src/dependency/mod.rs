//! Dependency identities and their on-disk artifacts.
//!
//! A [`Dependency`] names a package and the group directory its artifacts
//! are built into. [`Dependency::resolve`] finds the artifact that currently
//! represents the package, scanning the directory at most once.

mod manager;
mod reference;

use anyhow::{Context, Result};
use log::{debug, warn};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use crate::pkgname::PkgNameInfo;
use crate::runtime::{Runtime, is_not_found};

pub use manager::DependencyManager;
pub use reference::DependencyRef;

/// Canonical identity of a package within one repository.
///
/// Two dependencies are equal when their package names are equal; the group
/// directory is metadata only.
#[derive(Debug)]
pub struct Dependency {
    group_dir: PathBuf,
    pkgname: String,
    suffixes: Arc<[String]>,
    /// `None` until resolved, then the memoized outcome.
    resolved: Mutex<Option<Option<PathBuf>>>,
}

impl Dependency {
    pub fn new(group_dir: PathBuf, pkgname: impl Into<String>, suffixes: Arc<[String]>) -> Self {
        Self {
            group_dir,
            pkgname: pkgname.into(),
            suffixes,
            resolved: Mutex::new(None),
        }
    }

    /// Directory where artifacts for this package's group are built.
    pub fn group_dir(&self) -> &Path {
        &self.group_dir
    }

    pub fn pkgname(&self) -> &str {
        &self.pkgname
    }

    /// Whether [`resolve`](Self::resolve) has already produced an outcome.
    pub fn is_resolved(&self) -> bool {
        self.resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Find the built artifact for this package.
    ///
    /// Returns `Ok(None)` when nothing has been built yet, including when
    /// the group directory does not exist. The outcome is computed once and
    /// memoized; failures other than a missing directory are returned and
    /// not memoized.
    pub fn resolve<R: Runtime>(&self, runtime: &R) -> Result<Option<PathBuf>> {
        let mut resolved = self
            .resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(outcome) = resolved.as_ref() {
            return Ok(outcome.clone());
        }

        let outcome = self.find_local_package(runtime)?;

        match &outcome {
            Some(path) => debug!("Resolved {} to {:?}", self.pkgname, path),
            None => debug!("No built artifact for {}", self.pkgname),
        }
        *resolved = Some(outcome.clone());
        Ok(outcome)
    }

    fn find_local_package<R: Runtime>(&self, runtime: &R) -> Result<Option<PathBuf>> {
        let entries = match runtime.read_dir(&self.group_dir) {
            Ok(entries) => entries,
            Err(e) if is_not_found(&e) => {
                debug!("Group directory {:?} does not exist", self.group_dir);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let mut candidates = Vec::new();
        for path in entries {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !self.suffixes.iter().any(|s| file_name.ends_with(s.as_str())) {
                continue;
            }
            match PkgNameInfo::parse_filename(file_name, &self.suffixes) {
                Ok(info) if info.name == self.pkgname => candidates.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping unparsable artifact {:?}: {}", path, e),
            }
        }

        if candidates.len() <= 1 {
            return Ok(candidates.pop());
        }

        debug!(
            "{} artifacts for {}, picking the most recent",
            candidates.len(),
            self.pkgname
        );
        let mut stamped: Vec<(SystemTime, PathBuf)> = candidates
            .into_iter()
            .map(|path| {
                let mtime = runtime
                    .modified(&path)
                    .with_context(|| format!("Failed to stat artifact {:?}", path))?;
                Ok((mtime, path))
            })
            .collect::<Result<_>>()?;
        // Stable sort, newest first
        stamped.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(stamped.into_iter().next().map(|(_, path)| path))
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.pkgname == other.pkgname
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pkgname.hash(state);
    }
}
