//! Core traits for content access
//!
//! The repository seam the SDK components work through. Production code
//! plugs in the HTTP client; tests plug in an in-memory source.

mod source;

pub use source::ContentSource;
