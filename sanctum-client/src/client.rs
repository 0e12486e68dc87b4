//! HTTP client for the sanctum-store content API

use crate::error::{ClientError, Result};
use crate::types::*;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

/// HTTP client for the sanctum-store content API
///
/// # Example
///
/// ```rust,no_run
/// use sanctum_client::{ContentClient, ClientConfig, FetchOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ContentClient::new(ClientConfig {
///     base_url: "http://localhost:8085".into(),
///     ..Default::default()
/// });
///
/// // List the hero section
/// let records = client.fetch_section("hero", FetchOptions::default()).await?;
///
/// // Toggle a record off
/// let patch = sanctum_client::UpdateRecordInput {
///     is_active: Some(false),
///     ..Default::default()
/// };
/// client.update_record(&records[0].id, &patch).await?;
/// # Ok(())
/// # }
/// ```
pub struct ContentClient {
    config: ClientConfig,
    client: Client,
}

impl ContentClient {
    /// Create a new content client
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self { config, client }
    }

    /// List records for a section, ordered ascending by `order`
    pub async fn fetch_section(
        &self,
        section: &str,
        options: FetchOptions,
    ) -> Result<Vec<ContentRecord>> {
        let mut url = format!(
            "{}/content?section={}",
            self.config.base_url,
            urlencoding::encode(section)
        );

        if let Some(ref subsection) = options.subsection {
            url.push_str("&subsection=");
            url.push_str(&urlencoding::encode(subsection));
        }
        if options.include_inactive {
            url.push_str("&includeInactive=true");
        }

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Create a new record. The server assigns id and timestamps.
    pub async fn create_record(&self, input: &CreateRecordInput) -> Result<ContentRecord> {
        let url = format!("{}/content", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(input)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Apply a partial update to a record
    pub async fn update_record(&self, id: &str, patch: &UpdateRecordInput) -> Result<()> {
        let url = format!(
            "{}/content?id={}",
            self.config.base_url,
            urlencoding::encode(id)
        );

        let response = self
            .client
            .put(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(patch)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.to_string()));
        }

        let body: SuccessResponse = self.handle_response(response).await?;
        if !body.success {
            return Err(ClientError::InvalidResponse(
                "server did not report success".to_string(),
            ));
        }
        Ok(())
    }

    /// Delete a record. Returns false when the id was already gone.
    pub async fn delete_record(&self, id: &str) -> Result<bool> {
        let url = format!(
            "{}/content?id={}",
            self.config.base_url,
            urlencoding::encode(id)
        );

        let response = self.client.delete(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Server { status, message: body });
        }
        Ok(true)
    }

    /// Atomically replace order values for the given ids
    pub async fn reorder(&self, items: Vec<ReorderItem>) -> Result<()> {
        let url = format!("{}/content?action=reorder", self.config.base_url);

        let body = ReorderRequest { items };
        let response = self
            .client
            .put(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let body: SuccessResponse = self.handle_response(response).await?;
        if !body.success {
            return Err(ClientError::InvalidResponse(
                "server did not report success".to_string(),
            ));
        }
        Ok(())
    }

    /// Bulk create records (for seeding)
    pub async fn bulk_create(&self, items: Vec<CreateRecordInput>) -> Result<BulkOutcome> {
        let url = format!("{}/content/bulk", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&items)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get store statistics
    pub async fn stats(&self) -> Result<StoreStats> {
        let url = format!("{}/stats", self.config.base_url);

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Check store liveness
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.config.base_url);

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound("Resource not found".to_string()));
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status,
                message: body,
            });
        }

        let body = response.json().await?;
        Ok(body)
    }
}
