//! Build module declarations.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::dependency::DependencyRef;
use crate::runtime::Runtime;

/// Anything that can declare the packages it needs at build time.
pub trait BuildModule {
    /// Declared dependencies, in declaration order. Empty by default.
    fn dependencies(&self) -> &[DependencyRef] {
        &[]
    }
}

/// A module declaration as stored in the modules file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpec {
    #[serde(default)]
    pub depends: Vec<DependencyRef>,
}

impl ModuleSpec {
    pub fn new(depends: impl IntoIterator<Item = DependencyRef>) -> Self {
        Self {
            depends: depends.into_iter().collect(),
        }
    }
}

impl BuildModule for ModuleSpec {
    fn dependencies(&self) -> &[DependencyRef] {
        &self.depends
    }
}

/// Module declarations keyed by module name.
///
/// File format: `{"name": {"depends": ["pkg", ["group", "pkg"]]}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleSet {
    modules: BTreeMap<String, ModuleSpec>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load module declarations from a JSON file.
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read module declarations from {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse module declarations in {:?}", path))
    }

    pub fn insert(&mut self, name: impl Into<String>, module: ModuleSpec) {
        self.modules.insert(name.into(), module);
    }

    pub fn get(&self, name: &str) -> Option<&ModuleSpec> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ModuleSpec)> {
        self.modules.iter()
    }
}

impl<'a> IntoIterator for &'a ModuleSet {
    type Item = (&'a String, &'a ModuleSpec);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ModuleSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, ModuleSpec)> for ModuleSet {
    fn from_iter<T: IntoIterator<Item = (S, ModuleSpec)>>(iter: T) -> Self {
        Self {
            modules: iter
                .into_iter()
                .map(|(name, module)| (name.into(), module))
                .collect(),
        }
    }
}
