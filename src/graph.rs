//! Per-module dependency maps for rebuild planning.
//!
//! [`get_dependency_map`] seeds each module with the package names it
//! declares, then runs a single propagation pass: when module `m` is itself
//! depended upon as a package, every module depending on `m` also receives
//! `m`'s direct dependencies. This is one pass, not a fixed point, so chains
//! longer than two hops are not flattened.

use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use crate::dependency::DependencyManager;
use crate::module::BuildModule;
use crate::runtime::Runtime;

/// Module name to the package names it depends on.
pub type DependencyMap = BTreeMap<String, BTreeSet<String>>;

/// Package name to the modules declaring it directly.
type ReverseMap = BTreeMap<String, BTreeSet<String>>;

/// Compute the propagated dependency map for a set of modules.
///
/// References are normalized through `manager`, so grouped and bare
/// references to the same package name are the same edge. Modules without
/// dependencies get no entry, and no key outside `modules` is ever produced.
/// Nothing is resolved on disk.
pub fn get_dependency_map<'m, R, M, I>(
    manager: &DependencyManager<'_, R>,
    modules: I,
) -> DependencyMap
where
    R: Runtime,
    M: BuildModule + 'm,
    I: IntoIterator<Item = (&'m String, &'m M)>,
{
    let mut map = DependencyMap::new();
    let mut rmap = ReverseMap::new();

    for (name, module) in modules {
        let direct: BTreeSet<String> = module
            .dependencies()
            .iter()
            .map(|reference| manager.get(reference).pkgname().to_string())
            .collect();

        for pkgname in &direct {
            rmap.entry(pkgname.clone()).or_default().insert(name.clone());
        }
        if !direct.is_empty() {
            map.insert(name.clone(), direct);
        }
    }

    let seeded = map.clone();
    for (name, ds) in &seeded {
        let Some(dependers) = rmap.get(name) else {
            continue;
        };
        for depender in dependers {
            debug!("{} inherits dependencies of {}", depender, name);
            map.entry(depender.clone())
                .or_default()
                .extend(ds.iter().cloned());
        }
    }

    map
}
