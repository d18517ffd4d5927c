//! Error types for resource refresh and the cache file.

use crate::resource::Category;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResourceError {
    /// Provider command did not produce usable output
    #[error("Failed to query {category}: {message}")]
    Query { category: Category, message: String },

    /// Cache file could not be opened, read or written
    #[error("Cache file {path:?}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResourceError {
    pub fn query(category: Category, err: &anyhow::Error) -> Self {
        Self::Query {
            category,
            message: format!("{:#}", err),
        }
    }

    pub fn cache_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheIo {
            path: path.into(),
            source,
        }
    }

    /// True when the cache file simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CacheIo { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, ResourceError>;
