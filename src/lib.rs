pub mod config;
pub mod dependency;
pub mod graph;
pub mod module;
pub mod pkgname;
pub mod runtime;

pub use config::Config;
pub use dependency::{Dependency, DependencyManager, DependencyRef};
pub use graph::{DependencyMap, get_dependency_map};
pub use module::{BuildModule, ModuleSet, ModuleSpec};
