//! Repository seam over the content store

use crate::error::Result;
use async_trait::async_trait;
use sanctum_client::{
    ContentClient, ContentRecord, CreateRecordInput, FetchOptions, ReorderItem,
    UpdateRecordInput,
};

/// The operations the SDK needs from a content repository.
///
/// Implemented by [`ContentClient`] for production use; tests implement it
/// over an in-memory record list.
///
/// # Example
///
/// ```rust,ignore
/// use sanctum_sdk::{ContentSource, SectionLoader};
///
/// let source: Arc<dyn ContentSource> = Arc::new(ContentClient::new(config));
/// let loader = SectionLoader::new(source, cache);
/// let outcome = loader.load("hero", None).await?;
/// ```
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch all active records for a section, ordered ascending by `order`
    async fn fetch_section(
        &self,
        section: &str,
        subsection: Option<&str>,
    ) -> Result<Vec<ContentRecord>>;

    /// Create a record; the store assigns id, timestamps, and default order
    async fn create_record(&self, input: &CreateRecordInput) -> Result<ContentRecord>;

    /// Apply a partial update to a record
    async fn update_record(&self, id: &str, patch: &UpdateRecordInput) -> Result<()>;

    /// Delete a record. Returns false when the id was already gone.
    async fn delete_record(&self, id: &str) -> Result<bool>;

    /// Atomically replace order values for the given ids
    async fn reorder(&self, items: Vec<ReorderItem>) -> Result<()>;
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn fetch_section(
        &self,
        section: &str,
        subsection: Option<&str>,
    ) -> Result<Vec<ContentRecord>> {
        let options = FetchOptions {
            subsection: subsection.map(|s| s.to_string()),
            ..Default::default()
        };
        Ok(ContentClient::fetch_section(self, section, options).await?)
    }

    async fn create_record(&self, input: &CreateRecordInput) -> Result<ContentRecord> {
        Ok(ContentClient::create_record(self, input).await?)
    }

    async fn update_record(&self, id: &str, patch: &UpdateRecordInput) -> Result<()> {
        Ok(ContentClient::update_record(self, id, patch).await?)
    }

    async fn delete_record(&self, id: &str) -> Result<bool> {
        Ok(ContentClient::delete_record(self, id).await?)
    }

    async fn reorder(&self, items: Vec<ReorderItem>) -> Result<()> {
        Ok(ContentClient::reorder(self, items).await?)
    }
}
