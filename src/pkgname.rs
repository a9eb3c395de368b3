//! Built package filename parsing.
//!
//! Artifacts are named `<name>-<version>-<release>[-<arch>]<suffix>`, e.g.
//! `foo-1.2.3-1-x86_64.pkg.tar.xz`. Package names may themselves contain
//! dashes, so fields are split off from the right. The trailing field is the
//! architecture when it is not a release number and the field before it is.

use anyhow::{Result, bail};
use std::fmt;

/// Structured fields of a built package filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkgNameInfo {
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: Option<String>,
}

impl PkgNameInfo {
    /// Parse an artifact file name carrying one of `suffixes`.
    pub fn parse_filename(file_name: &str, suffixes: &[String]) -> Result<Self> {
        let Some(stem) = suffixes
            .iter()
            .find_map(|suffix| file_name.strip_suffix(suffix.as_str()))
        else {
            bail!("{:?} does not end with a known artifact suffix", file_name);
        };

        let fields: Vec<&str> = stem.rsplitn(4, '-').collect();
        let info = match fields.as_slice() {
            [arch, release, version, name] if !is_release(arch) && is_release(release) => Self {
                name: name.to_string(),
                version: version.to_string(),
                release: release.to_string(),
                arch: Some(arch.to_string()),
            },
            [release, version, rest @ ..] if !rest.is_empty() => {
                // No arch: the name may have been split at its own dashes.
                let mut name_parts: Vec<&str> = rest.to_vec();
                name_parts.reverse();
                Self {
                    name: name_parts.join("-"),
                    version: version.to_string(),
                    release: release.to_string(),
                    arch: None,
                }
            }
            _ => bail!("{:?} is not a valid package file name", file_name),
        };

        if info.name.is_empty() || info.version.is_empty() || info.release.is_empty() {
            bail!("{:?} has an empty name, version or release", file_name);
        }
        Ok(info)
    }

    /// Format back into a file name with the given suffix.
    pub fn to_filename(&self, suffix: &str) -> String {
        match &self.arch {
            Some(arch) => format!(
                "{}-{}-{}-{}{}",
                self.name, self.version, self.release, arch, suffix
            ),
            None => format!("{}-{}-{}{}", self.name, self.version, self.release, suffix),
        }
    }
}

/// Release numbers are digits with optional dots (`1`, `2.1`).
fn is_release(field: &str) -> bool {
    field.starts_with(|c: char| c.is_ascii_digit())
        && field.chars().all(|c| c.is_ascii_digit() || c == '.')
}

impl fmt::Display for PkgNameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.name, self.version, self.release)
    }
}
