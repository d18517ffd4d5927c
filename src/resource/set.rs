//! In-memory resource collections and refresh flags.

use super::Category;
use serde::Serialize;
use std::collections::BTreeSet;

/// The four cached resource collections
///
/// Instance ids and bucket names keep provider output order. Tag keys and
/// values are deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceSet {
    pub instance_ids: Vec<String>,
    pub instance_tag_keys: BTreeSet<String>,
    pub instance_tag_values: BTreeSet<String>,
    pub bucket_names: Vec<String>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of one category, in sequence order for ids/buckets
    pub fn values(&self, category: Category) -> Vec<&str> {
        match category {
            Category::InstanceIds => self.instance_ids.iter().map(String::as_str).collect(),
            Category::InstanceTagKeys => {
                self.instance_tag_keys.iter().map(String::as_str).collect()
            }
            Category::InstanceTagValues => {
                self.instance_tag_values.iter().map(String::as_str).collect()
            }
            Category::BucketNames => self.bucket_names.iter().map(String::as_str).collect(),
        }
    }

    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::InstanceIds => self.instance_ids.len(),
            Category::InstanceTagKeys => self.instance_tag_keys.len(),
            Category::InstanceTagValues => self.instance_tag_values.len(),
            Category::BucketNames => self.bucket_names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.len(*c) == 0)
    }

    /// Entries of `category` starting with `prefix`
    pub fn completions(&self, category: Category, prefix: &str) -> Vec<&str> {
        self.values(category)
            .into_iter()
            .filter(|v| v.starts_with(prefix))
            .collect()
    }
}

/// Which categories may be queried live
///
/// Tag keys and tag values share one flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshFlags {
    pub instance_ids: bool,
    pub instance_tags: bool,
    pub bucket_names: bool,
}

impl Default for RefreshFlags {
    fn default() -> Self {
        Self {
            instance_ids: true,
            instance_tags: true,
            bucket_names: true,
        }
    }
}

impl RefreshFlags {
    pub fn allows(&self, category: Category) -> bool {
        match category {
            Category::InstanceIds => self.instance_ids,
            Category::InstanceTagKeys | Category::InstanceTagValues => self.instance_tags,
            Category::BucketNames => self.bucket_names,
        }
    }
}
