//! Section loading with cache and supersede semantics
//!
//! A page that navigates quickly can have two fetches of the same section
//! in flight; only the newest may apply. Every load takes a generation
//! ticket first, and a fetch whose ticket is no longer current discards
//! its result instead of caching it.

use crate::cache::SectionCache;
use crate::error::Result;
use crate::traits::ContentSource;
use sanctum_client::{section_key, ContentRecord};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// What a load produced
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// Fetched from the source and cached
    Fresh(Vec<ContentRecord>),
    /// Served from cache without touching the source
    Cached(Vec<ContentRecord>),
    /// A newer load started before this one finished; result discarded
    Superseded,
}

impl LoadOutcome {
    /// The records, unless this load was superseded
    pub fn records(&self) -> Option<&[ContentRecord]> {
        match self {
            LoadOutcome::Fresh(records) | LoadOutcome::Cached(records) => Some(records),
            LoadOutcome::Superseded => None,
        }
    }

    pub fn into_records(self) -> Option<Vec<ContentRecord>> {
        match self {
            LoadOutcome::Fresh(records) | LoadOutcome::Cached(records) => Some(records),
            LoadOutcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, LoadOutcome::Superseded)
    }
}

/// Loads sections through the cache with supersede protection
pub struct SectionLoader {
    source: Arc<dyn ContentSource>,
    cache: Arc<SectionCache>,
    generation: AtomicU64,
}

impl SectionLoader {
    pub fn new(source: Arc<dyn ContentSource>, cache: Arc<SectionCache>) -> Self {
        Self {
            source,
            cache,
            generation: AtomicU64::new(0),
        }
    }

    /// Load a section, serving from cache when fresh.
    ///
    /// Starting a load supersedes every load still in flight, whichever
    /// section they target.
    pub async fn load(
        &self,
        section: &str,
        subsection: Option<&str>,
    ) -> Result<LoadOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let key = section_key(section, subsection);

        if let Some(records) = self.cache.get(&key) {
            return Ok(LoadOutcome::Cached(records));
        }

        let records = self.source.fetch_section(section, subsection).await?;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(key = %key, "Discarding superseded fetch");
            return Ok(LoadOutcome::Superseded);
        }

        self.cache.insert(&key, records.clone());
        Ok(LoadOutcome::Fresh(records))
    }

    /// Drop the cached entry and load live
    pub async fn refresh(
        &self,
        section: &str,
        subsection: Option<&str>,
    ) -> Result<LoadOutcome> {
        self.cache.invalidate(&section_key(section, subsection));
        self.load(section, subsection).await
    }

    /// Discard every load currently in flight
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use async_trait::async_trait;
    use sanctum_client::{CreateRecordInput, ReorderItem, UpdateRecordInput};
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn record(id: &str, section: &str, content: &str) -> ContentRecord {
        ContentRecord {
            id: id.to_string(),
            section: section.to_string(),
            subsection: None,
            content_type: "text".to_string(),
            content: content.to_string(),
            metadata: None,
            order_index: 0,
            is_active: true,
            user: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// Source whose first fetch can be held open by the test
    struct FakeSource {
        records: StdMutex<Vec<ContentRecord>>,
        calls: AtomicU64,
        gate_first: AtomicBool,
        gate: Notify,
    }

    impl FakeSource {
        fn new(records: Vec<ContentRecord>) -> Self {
            Self {
                records: StdMutex::new(records),
                calls: AtomicU64::new(0),
                gate_first: AtomicBool::new(false),
                gate: Notify::new(),
            }
        }

        fn set_records(&self, records: Vec<ContentRecord>) {
            *self.records.lock().unwrap() = records;
        }
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn fetch_section(
            &self,
            _section: &str,
            _subsection: Option<&str>,
        ) -> Result<Vec<ContentRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.gate_first.swap(false, Ordering::SeqCst) {
                self.gate.notified().await;
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create_record(&self, _input: &CreateRecordInput) -> Result<ContentRecord> {
            unimplemented!()
        }

        async fn update_record(&self, _id: &str, _patch: &UpdateRecordInput) -> Result<()> {
            unimplemented!()
        }

        async fn delete_record(&self, _id: &str) -> Result<bool> {
            unimplemented!()
        }

        async fn reorder(&self, _items: Vec<ReorderItem>) -> Result<()> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn fresh_cache_skips_the_source() {
        let source = Arc::new(FakeSource::new(vec![record("r1", "hero", "a")]));
        let cache = Arc::new(SectionCache::with_defaults());
        let loader = SectionLoader::new(source.clone(), cache);

        let first = loader.load("hero", None).await.unwrap();
        assert!(matches!(first, LoadOutcome::Fresh(_)));

        let second = loader.load("hero", None).await.unwrap();
        assert!(matches!(second, LoadOutcome::Cached(_)));
        assert_eq!(second.records().unwrap().len(), 1);

        // Exactly one source call across both loads
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_cache_fetches_exactly_once_per_load() {
        let source = Arc::new(FakeSource::new(vec![record("r1", "hero", "a")]));
        let cache = Arc::new(SectionCache::new(CacheConfig { ttl: Duration::ZERO }));
        let loader = SectionLoader::new(source.clone(), cache);

        let first = loader.load("hero", None).await.unwrap();
        let second = loader.load("hero", None).await.unwrap();

        assert!(matches!(first, LoadOutcome::Fresh(_)));
        assert!(matches!(second, LoadOutcome::Fresh(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn superseded_fetch_is_discarded() {
        let source = Arc::new(FakeSource::new(vec![record("r1", "hero", "old")]));
        source.gate_first.store(true, Ordering::SeqCst);

        let cache = Arc::new(SectionCache::with_defaults());
        let loader = Arc::new(SectionLoader::new(source.clone(), cache.clone()));

        // First load parks inside the source
        let slow = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load("hero", None).await }
        });
        while source.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // Newer load completes while the first is parked
        source.set_records(vec![record("r2", "hero", "new")]);
        let fast = loader.load("hero", None).await.unwrap();
        assert_eq!(fast.records().unwrap()[0].content, "new");

        // The parked fetch resumes and must not overwrite the newer state
        source.gate.notify_one();
        let outcome = slow.await.unwrap().unwrap();
        assert!(outcome.is_superseded());
        assert!(outcome.records().is_none());

        let cached = cache.get("hero").unwrap();
        assert_eq!(cached[0].content, "new");
    }

    #[tokio::test]
    async fn cancel_discards_inflight_load() {
        let source = Arc::new(FakeSource::new(vec![record("r1", "hero", "a")]));
        source.gate_first.store(true, Ordering::SeqCst);

        let cache = Arc::new(SectionCache::with_defaults());
        let loader = Arc::new(SectionLoader::new(source.clone(), cache.clone()));

        let inflight = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load("hero", None).await }
        });
        while source.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        loader.cancel();
        source.gate.notify_one();

        let outcome = inflight.await.unwrap().unwrap();
        assert!(outcome.is_superseded());
        assert!(cache.get("hero").is_none());
    }

    #[tokio::test]
    async fn refresh_bypasses_the_cache() {
        let source = Arc::new(FakeSource::new(vec![record("r1", "hero", "old")]));
        let cache = Arc::new(SectionCache::with_defaults());
        let loader = SectionLoader::new(source.clone(), cache);

        loader.load("hero", None).await.unwrap();
        source.set_records(vec![record("r1", "hero", "edited")]);

        let refreshed = loader.refresh("hero", None).await.unwrap();
        assert_eq!(refreshed.records().unwrap()[0].content, "edited");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
