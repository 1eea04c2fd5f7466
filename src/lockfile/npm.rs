use super::LockfileError;
use crate::model::{PackageEntry, Packages};
use anyhow::Result;
use serde_json::{Map, Value};

const NODE_MODULES: &str = "node_modules/";

/// Parses an npm `package-lock.json`.
///
/// Lockfile v2/v3 are read from the flat `packages` object; v1 falls back to
/// walking the nested `dependencies` tree.
pub fn parse_npm(content: &str) -> Result<Packages> {
    let root: Value = serde_json::from_str(content)?;
    let root = root.as_object().ok_or(LockfileError::NotAnObject)?;

    let mut packages = Packages::new();

    if let Some(entries) = root.get("packages").and_then(Value::as_object) {
        for (path, metadata) in entries {
            // The root project itself.
            if path.is_empty() {
                continue;
            }
            let name = name_from_install_path(path, metadata);
            insert(&mut packages, name, path, metadata);
        }
    } else if let Some(dependencies) = root.get("dependencies").and_then(Value::as_object) {
        collect_dependencies(dependencies, "", &mut packages);
    }

    Ok(packages)
}

/// Walks the v1 tree, building the same `node_modules/...` install paths the
/// v2 format records.
fn collect_dependencies(dependencies: &Map<String, Value>, parent: &str, packages: &mut Packages) {
    for (name, metadata) in dependencies {
        let path = format!("{}{}{}", parent, NODE_MODULES, name);
        insert(packages, name, &path, metadata);

        if let Some(nested) = metadata.get("dependencies").and_then(Value::as_object) {
            collect_dependencies(nested, &format!("{}/", path), packages);
        }
    }
}

/// `node_modules/a/node_modules/@scope/b` -> `@scope/b`. Workspace links
/// outside `node_modules` use their declared name when present.
fn name_from_install_path<'a>(path: &'a str, metadata: &'a Value) -> &'a str {
    match path.rfind(NODE_MODULES) {
        Some(idx) => &path[idx + NODE_MODULES.len()..],
        None => metadata
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(path),
    }
}

/// Keys entries as `name@version`. A second copy of the same name and
/// version that resolves somewhere else is kept under its install path so it
/// still gets validated.
fn insert(packages: &mut Packages, name: &str, install_path: &str, metadata: &Value) {
    let entry = PackageEntry::from_json(metadata);
    let key = match &entry.version {
        Some(version) => format!("{}@{}", name, version),
        None => name.to_string(),
    };

    let same_source = packages
        .get(&key)
        .map(|existing| existing.resolved == entry.resolved);

    match same_source {
        Some(true) => {}
        Some(false) => {
            tracing::debug!(key = %key, install_path, "same version resolved elsewhere");
            packages.insert(install_path, entry);
        }
        None => {
            packages.insert(key, entry);
        }
    }
}
