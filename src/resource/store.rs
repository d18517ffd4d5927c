//! Resource Store
//!
//! Owns the cached resource collections and decides, on each refresh,
//! whether to read the cache file or query the provider.

use super::{cache, parse, Category, RefreshFlags, ResourceSet};
use crate::error::{ResourceError, Result};
use crate::provider::ResourceProvider;
use std::path::{Path, PathBuf};

/// Where the resources of a refresh came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSource {
    /// Cache file was read, provider not queried
    Cache,
    /// Provider was queried for every enabled category
    Live,
}

/// Outcome of [`ResourceStore::refresh`]
#[derive(Debug)]
pub struct RefreshReport {
    pub source: RefreshSource,
    /// Categories whose query failed and kept their previous value
    pub failures: Vec<ResourceError>,
    /// Save error, if the cache file could not be written
    pub save_error: Option<ResourceError>,
}

impl RefreshReport {
    pub fn saved(&self) -> bool {
        self.save_error.is_none()
    }

    pub fn failed(&self, category: Category) -> bool {
        self.failures
            .iter()
            .any(|e| matches!(e, ResourceError::Query { category: c, .. } if *c == category))
    }
}

/// Cached AWS resources backing completion
pub struct ResourceStore<P> {
    provider: P,
    resources: ResourceSet,
    flags: RefreshFlags,
    cache_path: PathBuf,
    /// Print status lines to the console
    echo: bool,
}

impl<P: ResourceProvider> ResourceStore<P> {
    pub fn new(provider: P, cache_path: impl Into<PathBuf>, flags: RefreshFlags) -> Self {
        Self {
            provider,
            resources: ResourceSet::new(),
            flags,
            cache_path: cache_path.into(),
            echo: true,
        }
    }

    /// Silence console status lines (tracing events are still emitted)
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Refresh resources and write them back to the cache file
    ///
    /// Unless `force_refresh` is set, the cache file is tried first and the
    /// provider is only queried when it cannot be read. Each enabled category
    /// is queried on its own; a failed query keeps that category's previous
    /// value. The cache file is always rewritten at the end. Nothing here is
    /// fatal: failures are logged and collected in the returned report.
    pub async fn refresh(&mut self, force_refresh: bool) -> RefreshReport {
        let mut source = RefreshSource::Live;

        if !force_refresh {
            let path = self.cache_path.clone();
            match self.load_from_file(&path) {
                Ok(()) => {
                    self.status("Loaded resources from cache");
                    source = RefreshSource::Cache;
                }
                Err(e) => {
                    if !e.is_not_found() {
                        tracing::warn!("{}", e);
                    }
                    self.status("No resource cache found");
                }
            }
        }

        let mut failures = Vec::new();

        if source == RefreshSource::Live {
            self.status("Refreshing resources...");

            for category in Category::ALL {
                if !self.flags.allows(category) {
                    continue;
                }
                match category {
                    Category::InstanceIds => self.status("  Refreshing instance ids..."),
                    Category::InstanceTagKeys => self.status("  Refreshing instance tags..."),
                    Category::InstanceTagValues => {}
                    Category::BucketNames => self.status("  Refreshing bucket names..."),
                }
                let result = self.query(category).await;
                self.record(result, &mut failures);
            }

            self.status("Done refreshing");
        }

        let path = self.cache_path.clone();
        let save_error = match self.save_to_file(&path) {
            Ok(()) => None,
            Err(e) => {
                self.error_line(&e);
                Some(e)
            }
        };

        RefreshReport {
            source,
            failures,
            save_error,
        }
    }

    /// Query and replace instance ids, returning how many were stored
    pub async fn query_instance_ids(&mut self) -> Result<usize> {
        let output = self.fetch(Category::InstanceIds).await?;
        self.resources.instance_ids = parse::instance_ids(&output);
        Ok(self.resources.instance_ids.len())
    }

    /// Query and replace instance tag keys
    pub async fn query_instance_tag_keys(&mut self) -> Result<usize> {
        let output = self.fetch(Category::InstanceTagKeys).await?;
        self.resources.instance_tag_keys = parse::tag_values(&output);
        Ok(self.resources.instance_tag_keys.len())
    }

    /// Query and replace instance tag values
    pub async fn query_instance_tag_values(&mut self) -> Result<usize> {
        let output = self.fetch(Category::InstanceTagValues).await?;
        self.resources.instance_tag_values = parse::tag_values(&output);
        Ok(self.resources.instance_tag_values.len())
    }

    /// Query and rebuild bucket names
    ///
    /// A listing that runs to completion always replaces the list, even with
    /// an empty one. A failed listing leaves it untouched.
    pub async fn query_bucket_names(&mut self) -> Result<usize> {
        let output = self.fetch(Category::BucketNames).await?;
        self.resources.bucket_names = parse::bucket_names(&output);
        Ok(self.resources.bucket_names.len())
    }

    async fn query(&mut self, category: Category) -> Result<usize> {
        match category {
            Category::InstanceIds => self.query_instance_ids().await,
            Category::InstanceTagKeys => self.query_instance_tag_keys().await,
            Category::InstanceTagValues => self.query_instance_tag_values().await,
            Category::BucketNames => self.query_bucket_names().await,
        }
    }

    /// Replace all four collections with the cache file's content
    ///
    /// Refresh flags do not apply here.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        self.resources = cache::load(path)?;
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        cache::save(path, &self.resources)
    }

    async fn fetch(&self, category: Category) -> Result<String> {
        self.provider
            .query(category)
            .await
            .map_err(|e| ResourceError::query(category, &e))
    }

    fn record(&self, result: Result<usize>, failures: &mut Vec<ResourceError>) {
        match result {
            Ok(count) => tracing::debug!("Stored {} entries", count),
            Err(e) => {
                self.error_line(&e);
                failures.push(e);
            }
        }
    }

    fn status(&self, message: &str) {
        tracing::info!("{}", message.trim_start());
        if self.echo {
            println!("{}", message);
        }
    }

    fn error_line(&self, err: &ResourceError) {
        tracing::warn!("{}", err);
        if self.echo {
            eprintln!("{}", err);
        }
    }
}
