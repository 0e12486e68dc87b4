//! Caching primitives
//!
//! [`SectionCache`] holds fetched section record lists under a TTL;
//! [`DraftBuffer`] holds pending edits keyed by record id until a batch save.

mod drafts;
mod section_cache;

pub use drafts::DraftBuffer;
pub use section_cache::{spawn_cleanup_task, CacheConfig, CacheStats, SectionCache};
