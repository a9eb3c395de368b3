//! Runtime abstraction for system operations.
//!
//! Everything that touches the filesystem or the process environment goes
//! through the [`Runtime`] trait so resolution logic can be exercised with
//! mocks and its filesystem access counted.
//!
//! # Structure
//!
//! - `env` - Environment variables and working directory
//! - `fs` - File system operations (read, list, metadata)

mod env;
mod fs;

use anyhow::Result;
use std::env as std_env;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;
    fn current_dir(&self) -> Result<PathBuf>;

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// List the entries directly inside `path`.
    ///
    /// A missing directory must surface as an error whose chain contains an
    /// [`io::Error`] of kind [`io::ErrorKind::NotFound`].
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Last modification time of `path`.
    fn modified(&self, path: &Path) -> Result<SystemTime>;
}

/// Returns true if any error in the chain is an I/O "not found" error.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
    })
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        self.modified_impl(path)
    }
}
