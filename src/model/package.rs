use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A lockfile entry. Only `resolved` matters to the URL policy; the other
/// fields are carried for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

impl PackageEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry with only a resolved URL set.
    pub fn resolved(url: impl Into<String>) -> Self {
        Self {
            resolved: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_integrity(mut self, integrity: impl Into<String>) -> Self {
        self.integrity = Some(integrity.into());
        self
    }

    /// Reads the known string fields out of a loosely typed JSON value.
    /// Anything that is not an object, and any field that is not a string,
    /// is treated as absent.
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            version: field("version"),
            resolved: field("resolved"),
            integrity: field("integrity"),
        }
    }
}

/// Lockfile entries keyed by package name, in the order they were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packages {
    entries: Vec<(String, PackageEntry)>,
    // name -> position in `entries`
    index: HashMap<String, usize>,
}

impl Packages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. Returns `false` and keeps the existing entry if the
    /// name is already present.
    pub fn insert(&mut self, name: impl Into<String>, entry: PackageEntry) -> bool {
        let name = name.into();
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, entry));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PackageEntry> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    /// Drops every entry whose name fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|(name, _)| keep(name));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, (name, _))| (name.clone(), pos))
            .collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackageEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, PackageEntry)> for Packages {
    fn from_iter<I: IntoIterator<Item = (N, PackageEntry)>>(iter: I) -> Self {
        let mut packages = Packages::new();
        for (name, entry) in iter {
            packages.insert(name, entry);
        }
        packages
    }
}
