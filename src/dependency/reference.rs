use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

/// A module's declaration that it needs a package.
///
/// Serialized either as a bare package name (`"foo"`) or as a
/// `["group", "name"]` pair when the package is built under another group
/// directory. Both the group and the name must be a single plain path
/// component, so a reference never points outside the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDependencyRef", into = "RawDependencyRef")]
pub struct DependencyRef {
    group: Option<String>,
    name: String,
}

/// On-disk shape of a [`DependencyRef`], before validation.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawDependencyRef {
    Name(String),
    Grouped(String, String),
}

impl DependencyRef {
    /// Reference to a package built in the group of the same name.
    pub fn name(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_component("package name", &name)?;
        Ok(Self { group: None, name })
    }

    /// Reference to package `name` built under group directory `group`.
    pub fn grouped(group: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let group = group.into();
        let name = name.into();
        check_component("group", &group)?;
        check_component("package name", &name)?;
        Ok(Self {
            group: Some(group),
            name,
        })
    }

    /// Group directory name. Defaults to the package name.
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.name)
    }

    pub fn pkgname(&self) -> &str {
        &self.name
    }
}

fn check_component(kind: &str, value: &str) -> Result<()> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == OsStr::new(value) && !value.contains('\\') => {
            Ok(())
        }
        _ => bail!(
            "Invalid {} {:?}: expected a single non-empty path component",
            kind,
            value
        ),
    }
}

impl TryFrom<RawDependencyRef> for DependencyRef {
    type Error = anyhow::Error;

    fn try_from(raw: RawDependencyRef) -> Result<Self> {
        match raw {
            RawDependencyRef::Name(name) => DependencyRef::name(name),
            RawDependencyRef::Grouped(group, name) => DependencyRef::grouped(group, name),
        }
    }
}

impl From<DependencyRef> for RawDependencyRef {
    fn from(reference: DependencyRef) -> Self {
        match reference.group {
            Some(group) => RawDependencyRef::Grouped(group, reference.name),
            None => RawDependencyRef::Name(reference.name),
        }
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            None => write!(f, "{}", self.name),
            Some(group) => write!(f, "{}/{}", group, self.name),
        }
    }
}

impl FromStr for DependencyRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            None => DependencyRef::name(s),
            Some((group, name)) => DependencyRef::grouped(group, name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_defaults_group() {
        let r = DependencyRef::name("foo").unwrap();
        assert_eq!(r.group(), "foo");
        assert_eq!(r.pkgname(), "foo");
        assert_eq!(r.to_string(), "foo");
    }

    #[test]
    fn test_grouped_reference() {
        let r = DependencyRef::grouped("python-stuff", "python-foo").unwrap();
        assert_eq!(r.group(), "python-stuff");
        assert_eq!(r.pkgname(), "python-foo");
        assert_eq!(r.to_string(), "python-stuff/python-foo");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "foo".parse::<DependencyRef>().unwrap(),
            DependencyRef::name("foo").unwrap()
        );
        assert_eq!(
            "grp/foo".parse::<DependencyRef>().unwrap(),
            DependencyRef::grouped("grp", "foo").unwrap()
        );
    }

    #[test]
    fn test_from_str_invalid() {
        for input in ["", "/foo", "grp/", "a/b/c", "..", ".", "../up", "grp/.."] {
            assert!(
                input.parse::<DependencyRef>().is_err(),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_constructors_reject_escaping_components() {
        assert!(DependencyRef::name("").is_err());
        assert!(DependencyRef::name("a/b").is_err());
        assert!(DependencyRef::grouped("/etc", "x").is_err());
        assert!(DependencyRef::grouped("..", "x").is_err());
        assert!(DependencyRef::grouped("a/../b", "x").is_err());
        assert!(DependencyRef::grouped("grp", "").is_err());
        assert!(DependencyRef::grouped("grp/", "x").is_err());
    }

    #[test]
    fn test_deserialize_both_forms() {
        let refs: Vec<DependencyRef> =
            serde_json::from_str(r#"["foo", ["grp", "bar"]]"#).unwrap();
        assert_eq!(
            refs,
            vec![
                DependencyRef::name("foo").unwrap(),
                DependencyRef::grouped("grp", "bar").unwrap()
            ]
        );
    }

    #[test]
    fn test_deserialize_validates() {
        for input in [r#"["/etc", "x"]"#, r#""../up""#, r#""""#, r#""a/b""#] {
            let result: Result<DependencyRef, _> = serde_json::from_str(input);
            assert!(result.is_err(), "{} should be rejected", input);
        }
    }

    #[test]
    fn test_deserialize_rejects_wrong_arity() {
        let result: Result<DependencyRef, _> = serde_json::from_str(r#"["a", "b", "c"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_keeps_declared_form() {
        let refs = vec![
            DependencyRef::name("foo").unwrap(),
            DependencyRef::grouped("grp", "bar").unwrap(),
        ];
        assert_eq!(
            serde_json::to_string(&refs).unwrap(),
            r#"["foo",["grp","bar"]]"#
        );
    }
}
