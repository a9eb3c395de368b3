use anyhow::Result;
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::Config;
use crate::runtime::Runtime;

use super::{Dependency, DependencyRef};

/// Registry of [`Dependency`] values for one repository.
///
/// Each package name maps to exactly one shared `Dependency` for as long as
/// the manager lives, so its resolution outcome is computed at most once.
/// Entries are never replaced: the first group registered for a package
/// name wins.
pub struct DependencyManager<'a, R: Runtime> {
    runtime: &'a R,
    repo_root: PathBuf,
    suffixes: Arc<[String]>,
    cache: Mutex<HashMap<String, Arc<Dependency>>>,
}

impl<'a, R: Runtime> DependencyManager<'a, R> {
    pub fn new(runtime: &'a R, config: &Config) -> Self {
        Self {
            runtime,
            repo_root: config.repo_root.clone(),
            suffixes: config.artifact_suffixes.iter().cloned().collect(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Get the shared dependency for a reference, creating it on first use.
    pub fn get(&self, reference: &DependencyRef) -> Arc<Dependency> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = cache.get(reference.pkgname()) {
            return Arc::clone(existing);
        }

        let group_dir = self.repo_root.join(reference.group());
        debug!(
            "Registering dependency {} in {:?}",
            reference.pkgname(),
            group_dir
        );
        let dependency = Arc::new(Dependency::new(
            group_dir,
            reference.pkgname(),
            Arc::clone(&self.suffixes),
        ));
        cache.insert(reference.pkgname().to_string(), Arc::clone(&dependency));
        dependency
    }

    /// Get the dependency for a reference and resolve its artifact.
    pub fn resolve(&self, reference: &DependencyRef) -> Result<Option<PathBuf>> {
        self.get(reference).resolve(self.runtime)
    }

    /// Number of registered package names.
    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
