//! Sanctum SDK - Retreat Center Content Toolkit
//!
//! SDK for building editors and renderers over a sanctum-store content
//! repository.
//!
//! # Architecture
//!
//! Content lives in (section, subsection)-addressed ordered records served
//! by the sanctum-store HTTP API. On top of the raw client this SDK adds:
//! - **Loader**: TTL-cached section fetches with stale-fetch supersession
//! - **Shapes**: classification of a record list into statistic pairs,
//!   social toggles, board members, dynamic lists, and generic fields
//! - **Editor**: draft staging, batch save, and the shape-specific write
//!   flows, all keeping the cache coherent
//!
//! # Example
//!
//! ```rust,ignore
//! use sanctum_sdk::{classify_section, EditorSession, SectionCache, SectionLoader};
//! use std::sync::Arc;
//!
//! let source = Arc::new(ContentClient::new(ClientConfig::default()));
//! let cache = Arc::new(SectionCache::with_defaults());
//!
//! // Load and render
//! let loader = SectionLoader::new(source.clone(), cache.clone());
//! let outcome = loader.load("hero", None).await?;
//! let shapes = classify_section(outcome.records());
//!
//! // Edit and save
//! let editor = EditorSession::new(source, cache);
//! editor.stage_content("rec-1", "Welcome back").await;
//! editor.save_all().await?;
//! ```

// Repository seam the loader and editor work against
pub mod traits;

// Caching primitives (section TTL cache, draft buffer)
pub mod cache;

// Section fetching with supersession
pub mod loader;

// Shape classification of section records
pub mod sections;

// Editing session and batch save
pub mod editor;

// Error types
pub mod error;

// Re-export the repository trait
pub use traits::ContentSource;

// Re-export cache types
pub use cache::{spawn_cleanup_task, CacheConfig, CacheStats, DraftBuffer, SectionCache};

// Re-export loader types
pub use loader::{LoadOutcome, SectionLoader};

// Re-export shape types
pub use sections::{classify_section, BoardMember, SectionShape, SocialToggle, StatPair};

// Re-export editor types
pub use editor::{BoardMemberEdits, EditorSession, MoveDirection};

// Re-export error types
pub use error::{Result, SdkError};

// Re-export from the underlying client crate
pub use sanctum_client::{
    section_key, ClientConfig, ContentClient, ContentRecord, CreateRecordInput, FetchOptions,
    RecordMeta, ReorderItem, UpdateRecordInput,
};
