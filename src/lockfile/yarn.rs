use super::LockfileError;
use crate::model::{PackageEntry, Packages};
use anyhow::Result;

/// A package block being read: the descriptors in its header and the
/// fields seen so far.
struct Block {
    descriptors: Vec<String>,
    entry: PackageEntry,
}

impl Block {
    /// Every descriptor becomes its own entry, so a range that resolves
    /// somewhere unexpected is reported under the range that pulled it in.
    fn finish(self, packages: &mut Packages) {
        for descriptor in self.descriptors {
            packages.insert(descriptor, self.entry.clone());
        }
    }
}

/// Parses a yarn v1 `yarn.lock`, keyed by descriptor (`lodash@^4.17.0`).
///
/// Each block starts with an unindented header listing one or more
/// descriptors and ending in `:`. Two-space indented lines hold
/// `key "value"` fields; deeper lines (dependency lists) are ignored.
pub fn parse_yarn(content: &str) -> Result<Packages> {
    let mut packages = Packages::new();
    let mut current: Option<Block> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let indent = line.len() - line.trim_start().len();

        if indent == 0 {
            if let Some(block) = current.take() {
                block.finish(&mut packages);
            }

            let header = trimmed.strip_suffix(':').ok_or_else(|| LockfileError::Yarn {
                line: line_no,
                reason: "expected a package header ending in ':'".to_string(),
            })?;

            current = Some(Block {
                descriptors: descriptors(header).map(str::to_string).collect(),
                entry: PackageEntry::new(),
            });
            continue;
        }

        let block = current.as_mut().ok_or_else(|| LockfileError::Yarn {
            line: line_no,
            reason: "field outside of a package block".to_string(),
        })?;

        if indent > 2 {
            continue;
        }

        let (key, value) = match trimmed.split_once(char::is_whitespace) {
            Some((key, value)) => (key, unquote(value)),
            // Section headers such as `dependencies:`.
            None => continue,
        };

        match key {
            "version" => block.entry.version = Some(value.to_string()),
            "resolved" => block.entry.resolved = Some(value.to_string()),
            "integrity" => block.entry.integrity = Some(value.to_string()),
            _ => {}
        }
    }

    if let Some(block) = current.take() {
        block.finish(&mut packages);
    }

    Ok(packages)
}

/// Descriptors listed in a header, e.g.
/// `"@babel/core@^7.0.0", "@babel/core@^7.1.0"`.
fn descriptors(header: &str) -> impl Iterator<Item = &str> {
    header
        .split(',')
        .map(unquote)
        .filter(|descriptor| !descriptor.is_empty())
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
