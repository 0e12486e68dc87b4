//! Rust client for the sanctum-store content API
//!
//! # Example
//!
//! ```rust,no_run
//! use sanctum_client::{ContentClient, ClientConfig, CreateRecordInput, FetchOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create client
//! let client = ContentClient::new(ClientConfig {
//!     base_url: "http://localhost:8085".into(),
//!     ..Default::default()
//! });
//!
//! // Read a section
//! let records = client.fetch_section("hero", FetchOptions::default()).await?;
//!
//! // Add a record at the end of its group
//! let created = client
//!     .create_record(&CreateRecordInput::text("hero", "hero-subtitle", "Rest. Renew."))
//!     .await?;
//! println!("created {} (order {})", created.id, created.order_index);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types
pub use client::ContentClient;
pub use error::{ClientError, Result};
pub use types::*;
