//! Cache File
//!
//! Plain text, four sections, each introduced by a marker line:
//!
//! ```text
//! [instance ids]
//! i-0abc
//! [instance tag keys]
//! env
//! [instance tag values]
//! prod
//! [bucket names]
//! my-logs
//! ```
//!
//! Sections are always written in that order. On read, markers may appear
//! in any order or be missing; lines before the first marker belong to
//! instance ids. Blank lines are ignored.

use super::{Category, ResourceSet};
use crate::error::{ResourceError, Result};
use std::path::Path;

/// Parse cache file text
pub fn parse(text: &str) -> ResourceSet {
    let mut set = ResourceSet::new();
    let mut section = Category::InstanceIds;

    for line in text.split('\n') {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(category) = Category::from_marker_line(line) {
            section = category;
            continue;
        }

        let entry = line.to_string();
        match section {
            Category::InstanceIds => set.instance_ids.push(entry),
            Category::InstanceTagKeys => {
                set.instance_tag_keys.insert(entry);
            }
            Category::InstanceTagValues => {
                set.instance_tag_values.insert(entry);
            }
            Category::BucketNames => set.bucket_names.push(entry),
        }
    }

    set
}

/// Render a resource set as cache file text
pub fn render(set: &ResourceSet) -> String {
    let mut out = String::new();

    for category in Category::ALL {
        out.push_str(category.marker());
        out.push('\n');
        for entry in set.values(category) {
            out.push_str(entry);
            out.push('\n');
        }
    }

    out
}

/// Read and parse the cache file
///
/// The whole file is read before parsing, so a failed read never yields a
/// partial set.
pub fn load(path: &Path) -> Result<ResourceSet> {
    let text = std::fs::read_to_string(path).map_err(|e| ResourceError::cache_io(path, e))?;
    let set = parse(&text);

    tracing::debug!(
        "Parsed cache {:?}: {} ids, {} tag keys, {} tag values, {} buckets",
        path,
        set.instance_ids.len(),
        set.instance_tag_keys.len(),
        set.instance_tag_values.len(),
        set.bucket_names.len()
    );

    Ok(set)
}

/// Write the cache file, creating its directory if needed
pub fn save(path: &Path, set: &ResourceSet) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ResourceError::cache_io(parent, e))?;
        }
    }

    std::fs::write(path, render(set)).map_err(|e| ResourceError::cache_io(path, e))?;

    tracing::debug!("Wrote cache {:?}", path);

    Ok(())
}
