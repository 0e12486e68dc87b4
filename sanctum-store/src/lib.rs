//! Sanctum content store
//!
//! SQLite-backed store for the content records that drive the retreat-center
//! site, exposed over a small REST API. Records are addressed by a
//! (section, subsection) pair and carry an order among their siblings.

pub mod config;
pub mod db;
pub mod error;
pub mod http;

pub use config::Config;
pub use db::records::{
    BulkOutcome, CreateRecordInput, RecordQuery, RecordRow, ReorderItem, UpdateRecordInput,
};
pub use db::{ContentStore, StoreStats};
pub use error::StoreError;
pub use http::HttpServer;
