//! Resource categories
//!
//! One variant per cache section. The same enum drives the cache file
//! section cursor and the order provider queries run in.

use std::fmt;
use std::str::FromStr;

/// A kind of resource cached for completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    InstanceIds,
    InstanceTagKeys,
    InstanceTagValues,
    BucketNames,
}

impl Category {
    /// Cache section order, also the live query order
    pub const ALL: [Category; 4] = [
        Category::InstanceIds,
        Category::InstanceTagKeys,
        Category::InstanceTagValues,
        Category::BucketNames,
    ];

    /// Marker line introducing this category's section in the cache file
    pub fn marker(&self) -> &'static str {
        match self {
            Self::InstanceIds => "[instance ids]",
            Self::InstanceTagKeys => "[instance tag keys]",
            Self::InstanceTagValues => "[instance tag values]",
            Self::BucketNames => "[bucket names]",
        }
    }

    /// Category whose marker appears in `line`, if any
    pub fn from_marker_line(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| line.contains(c.marker()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InstanceIds => "instance ids",
            Self::InstanceTagKeys => "instance tag keys",
            Self::InstanceTagValues => "instance tag values",
            Self::BucketNames => "bucket names",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ids" | "instance-ids" => Ok(Self::InstanceIds),
            "tag-keys" | "instance-tag-keys" => Ok(Self::InstanceTagKeys),
            "tag-values" | "instance-tag-values" => Ok(Self::InstanceTagValues),
            "buckets" | "bucket-names" => Ok(Self::BucketNames),
            other => Err(format!(
                "unknown category '{}' (expected ids, tag-keys, tag-values or buckets)",
                other
            )),
        }
    }
}
