//! Integration tests for ResourceStore refresh behavior
//!
//! A stub provider stands in for the aws CLI so the cache/provider decision,
//! per-category failure isolation and cache rewrite can be checked end to
//! end against a temporary cache file.

use anyhow::{anyhow, Result};
use awsrc::provider::ResourceProvider;
use awsrc::resource::{Category, RefreshFlags, RefreshSource, ResourceStore};
use std::collections::BTreeSet;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

/// Provider returning canned output, or an error for `None`
#[derive(Default)]
struct StubProvider {
    ids: Option<String>,
    tag_keys: Option<String>,
    tag_values: Option<String>,
    buckets: Option<String>,
    calls: Mutex<Vec<Category>>,
}

impl StubProvider {
    fn healthy() -> Self {
        Self {
            ids: Some("i-1\ni-2\n".to_string()),
            tag_keys: Some("env\n".to_string()),
            tag_values: Some("prod\n".to_string()),
            buckets: Some("2024-01-01 00:00:00 bucket-a\n".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn answer(&self, category: Category, canned: &Option<String>) -> Result<String> {
        self.calls.lock().unwrap().push(category);
        canned
            .clone()
            .ok_or_else(|| anyhow!("stub failure for {}", category))
    }

    fn calls(&self) -> Vec<Category> {
        self.calls.lock().unwrap().clone()
    }
}

impl ResourceProvider for StubProvider {
    async fn instance_ids(&self) -> Result<String> {
        self.answer(Category::InstanceIds, &self.ids)
    }

    async fn instance_tag_keys(&self) -> Result<String> {
        self.answer(Category::InstanceTagKeys, &self.tag_keys)
    }

    async fn instance_tag_values(&self) -> Result<String> {
        self.answer(Category::InstanceTagValues, &self.tag_values)
    }

    async fn bucket_names(&self) -> Result<String> {
        self.answer(Category::BucketNames, &self.buckets)
    }
}

fn set_of(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

mod cold_start {
    use super::*;

    #[tokio::test]
    async fn test_no_cache_queries_everything_and_saves() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("RESOURCES.txt");

        let mut store =
            ResourceStore::new(StubProvider::healthy(), &path, RefreshFlags::default()).quiet();
        let report = store.refresh(false).await;

        assert_eq!(report.source, RefreshSource::Live);
        assert!(report.failures.is_empty());
        assert!(report.saved());

        let res = store.resources();
        assert_eq!(res.instance_ids, vec!["i-1", "i-2"]);
        assert_eq!(res.instance_tag_keys, set_of(&["env"]));
        assert_eq!(res.instance_tag_values, set_of(&["prod"]));
        assert_eq!(res.bucket_names, vec!["bucket-a"]);

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "[instance ids]\ni-1\ni-2\n\
             [instance tag keys]\nenv\n\
             [instance tag values]\nprod\n\
             [bucket names]\nbucket-a\n"
        );
    }

    #[tokio::test]
    async fn test_queries_run_in_fixed_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");

        let mut store =
            ResourceStore::new(StubProvider::healthy(), &path, RefreshFlags::default()).quiet();
        store.refresh(true).await;

        assert_eq!(store.provider().calls(), Category::ALL.to_vec());
    }
}

mod cache_hit {
    use super::*;

    #[tokio::test]
    async fn test_existing_cache_skips_provider() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");
        fs::write(&path, "[instance ids]\ni-cached\n[bucket names]\nb-old\n").unwrap();

        let mut store =
            ResourceStore::new(StubProvider::healthy(), &path, RefreshFlags::default()).quiet();
        let report = store.refresh(false).await;

        assert_eq!(report.source, RefreshSource::Cache);
        assert!(store.provider().calls().is_empty());
        assert_eq!(store.resources().instance_ids, vec!["i-cached"]);
        assert_eq!(store.resources().bucket_names, vec!["b-old"]);
        assert!(store.resources().instance_tag_keys.is_empty());

        // Rewritten with all four markers
        let written = fs::read_to_string(&path).unwrap();
        for category in Category::ALL {
            assert!(written.contains(category.marker()));
        }
    }

    #[tokio::test]
    async fn test_cache_load_ignores_disabled_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");
        fs::write(&path, "[bucket names]\nb-cached\n").unwrap();

        let flags = RefreshFlags {
            instance_ids: false,
            instance_tags: false,
            bucket_names: false,
        };
        let mut store = ResourceStore::new(StubProvider::healthy(), &path, flags).quiet();
        store.refresh(false).await;

        assert_eq!(store.resources().bucket_names, vec!["b-cached"]);
    }
}

mod force_refresh {
    use super::*;

    #[tokio::test]
    async fn test_force_replaces_rather_than_merges() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");
        fs::write(&path, "[bucket names]\nb-old\n").unwrap();

        let provider = StubProvider {
            buckets: Some("2024-05-01 12:00:00 b-new\n".to_string()),
            ..StubProvider::healthy()
        };
        let mut store = ResourceStore::new(provider, &path, RefreshFlags::default()).quiet();
        let report = store.refresh(true).await;

        assert_eq!(report.source, RefreshSource::Live);
        assert_eq!(store.resources().bucket_names, vec!["b-new"]);
        assert!(!fs::read_to_string(&path).unwrap().contains("b-old"));
    }

    #[tokio::test]
    async fn test_disabled_category_keeps_loaded_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");
        fs::write(&path, "[instance ids]\ni-cached\n[bucket names]\nb-cached\n").unwrap();

        let flags = RefreshFlags {
            bucket_names: false,
            ..Default::default()
        };
        let mut store = ResourceStore::new(StubProvider::healthy(), &path, flags).quiet();

        store.refresh(false).await;
        store.refresh(true).await;

        assert!(!store.provider().calls().contains(&Category::BucketNames));
        assert_eq!(store.resources().instance_ids, vec!["i-1", "i-2"]);
        assert_eq!(store.resources().bucket_names, vec!["b-cached"]);
    }

    #[tokio::test]
    async fn test_disabled_tags_skip_both_tag_queries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");

        let flags = RefreshFlags {
            instance_tags: false,
            ..Default::default()
        };
        let mut store = ResourceStore::new(StubProvider::healthy(), &path, flags).quiet();
        store.refresh(true).await;

        assert_eq!(
            store.provider().calls(),
            vec![Category::InstanceIds, Category::BucketNames]
        );
        assert!(store.resources().instance_tag_keys.is_empty());
        assert!(store.resources().instance_tag_values.is_empty());
    }

    #[tokio::test]
    async fn test_only_enabled_tags_are_queried() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");

        let flags = RefreshFlags {
            instance_ids: false,
            instance_tags: true,
            bucket_names: false,
        };
        let mut store = ResourceStore::new(StubProvider::healthy(), &path, flags).quiet();
        store.refresh(true).await;

        assert_eq!(
            store.provider().calls(),
            vec![Category::InstanceTagKeys, Category::InstanceTagValues]
        );
        assert!(store.resources().instance_ids.is_empty());
        assert_eq!(store.resources().instance_tag_keys, set_of(&["env"]));
        assert!(store.resources().bucket_names.is_empty());
    }
}

mod failure_isolation {
    use super::*;

    #[tokio::test]
    async fn test_failed_tag_keys_do_not_stop_siblings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");

        let provider = StubProvider {
            tag_keys: None,
            ..StubProvider::healthy()
        };
        let mut store = ResourceStore::new(provider, &path, RefreshFlags::default()).quiet();
        let report = store.refresh(true).await;

        assert_eq!(report.failures.len(), 1);
        assert!(report.failed(Category::InstanceTagKeys));
        assert!(!report.failed(Category::InstanceIds));

        let res = store.resources();
        assert_eq!(res.instance_ids, vec!["i-1", "i-2"]);
        assert!(res.instance_tag_keys.is_empty());
        assert_eq!(res.instance_tag_values, set_of(&["prod"]));
        assert_eq!(res.bucket_names, vec!["bucket-a"]);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("[instance ids]\ni-1\ni-2\n[instance tag keys]\n[instance tag values]\n"));
        assert!(written.ends_with("[bucket names]\nbucket-a\n"));
    }

    #[tokio::test]
    async fn test_failed_query_keeps_previous_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");
        fs::write(&path, "[instance ids]\ni-old\n[bucket names]\nb-old\n").unwrap();

        let provider = StubProvider {
            ids: None,
            buckets: None,
            ..StubProvider::healthy()
        };
        let mut store = ResourceStore::new(provider, &path, RefreshFlags::default()).quiet();

        store.refresh(false).await;
        let report = store.refresh(true).await;

        assert_eq!(report.failures.len(), 2);
        assert_eq!(store.resources().instance_ids, vec!["i-old"]);
        assert_eq!(store.resources().bucket_names, vec!["b-old"]);
    }

    #[tokio::test]
    async fn test_empty_bucket_listing_clears_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");
        fs::write(&path, "[bucket names]\nb-old\n").unwrap();

        let provider = StubProvider {
            buckets: Some(String::new()),
            ..StubProvider::healthy()
        };
        let mut store = ResourceStore::new(provider, &path, RefreshFlags::default()).quiet();

        store.refresh(false).await;
        assert_eq!(store.resources().bucket_names, vec!["b-old"]);

        store.refresh(true).await;
        assert!(store.resources().bucket_names.is_empty());
    }

    #[tokio::test]
    async fn test_query_error_names_category() {
        let dir = tempdir().unwrap();
        let provider = StubProvider {
            tag_values: None,
            ..StubProvider::healthy()
        };
        let mut store =
            ResourceStore::new(provider, dir.path().join("r.txt"), RefreshFlags::default())
                .quiet();

        let err = store.query_instance_tag_values().await.unwrap_err();
        assert!(err.to_string().contains("instance tag values"));
        assert!(err.to_string().contains("stub failure"));
    }
}

mod cache_io {
    use super::*;

    #[tokio::test]
    async fn test_unwritable_cache_keeps_memory_state() {
        let dir = tempdir().unwrap();
        // A regular file where the cache directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("RESOURCES.txt");

        let mut store =
            ResourceStore::new(StubProvider::healthy(), &path, RefreshFlags::default()).quiet();
        let report = store.refresh(false).await;

        assert!(!report.saved());
        assert_eq!(report.source, RefreshSource::Live);
        assert_eq!(store.resources().bucket_names, vec!["bucket-a"]);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let mut store = ResourceStore::new(
            StubProvider::healthy(),
            dir.path().join("RESOURCES.txt"),
            RefreshFlags::default(),
        )
        .quiet();

        let err = store
            .load_from_file(&dir.path().join("missing.txt"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.resources().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RESOURCES.txt");

        let mut store =
            ResourceStore::new(StubProvider::healthy(), &path, RefreshFlags::default()).quiet();
        store.refresh(true).await;
        let before = store.resources().clone();

        let mut reloaded =
            ResourceStore::new(StubProvider::default(), &path, RefreshFlags::default()).quiet();
        reloaded.load_from_file(&path).unwrap();

        assert_eq!(reloaded.resources(), &before);
    }
}
