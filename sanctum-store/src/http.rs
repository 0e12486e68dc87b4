//! HTTP API for the content store
//!
//! Provides REST endpoints for reading and editing content records:
//!
//! - `GET /content?section=<s>[&subsection=<sub>][&includeInactive=<bool>]` - List records
//! - `POST /content` - Create a record
//! - `POST /content/bulk` - Seed many records, skipping existing named fields
//! - `PUT /content?id=<id>` - Partially update a record
//! - `PUT /content?action=reorder` - Atomically replace order values
//! - `DELETE /content?id=<id>` - Delete a record
//! - `GET /health` - Liveness check
//! - `GET /stats` - Record counts
//!
//! ## Example Usage
//!
//! ```bash
//! # List the hero section as the public site sees it
//! curl 'http://localhost:8085/content?section=hero'
//!
//! # Create a record
//! curl -X POST -H "Content-Type: application/json" \
//!      -d '{"section": "hero", "subsection": "hero-title", "content": "Welcome"}' \
//!      http://localhost:8085/content
//!
//! # Reorder two records in one step
//! curl -X PUT -H "Content-Type: application/json" \
//!      -d '{"items": [{"id": "a", "order": 1}, {"id": "b", "order": 0}]}' \
//!      'http://localhost:8085/content?action=reorder'
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::db::records::{CreateRecordInput, RecordQuery, ReorderItem, UpdateRecordInput};
use crate::db::ContentStore;
use crate::error::StoreError;

/// Body of the reorder action
#[derive(Debug, serde::Deserialize)]
struct ReorderRequest {
    items: Vec<ReorderItem>,
}

/// HTTP server state
pub struct HttpServer {
    store: Arc<ContentStore>,
    bind_addr: SocketAddr,
}

impl HttpServer {
    pub fn new(store: Arc<ContentStore>, bind_addr: SocketAddr) -> Self {
        Self { store, bind_addr }
    }

    /// Run the HTTP server
    pub async fn run(self: Arc<Self>) -> Result<(), StoreError> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        info!(addr = %self.bind_addr, "HTTP server listening");

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let server = self.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let server = server.clone();
                    async move { server.handle_request(req).await }
                });

                if let Err(err) = http1::Builder::new()
                    .serve_connection(io, service)
                    .await
                {
                    warn!(addr = %remote_addr, error = %err, "Connection error");
                }
            });
        }
    }

    /// Route requests to handlers
    async fn handle_request(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let path = req.uri().path().to_string();
        let method = req.method().clone();
        let params = parse_query_params(req.uri().query().unwrap_or(""));

        debug!(method = %method, path = %path, "Incoming request");

        let result = match (method, path.as_str()) {
            (Method::GET, "/health") => self.handle_health(),

            (Method::GET, "/stats") => self.handle_stats(),

            (Method::GET, "/content") => self.handle_list(&params),

            (Method::POST, "/content") => self.handle_create(req).await,

            (Method::POST, "/content/bulk") => self.handle_bulk_create(req).await,

            // The reorder action carries its targets in the body, so it is
            // matched before the id-addressed update
            (Method::PUT, "/content") if params.get("action").map(String::as_str) == Some("reorder") => {
                self.handle_reorder(req).await
            }

            (Method::PUT, "/content") => self.handle_update(req, &params).await,

            (Method::DELETE, "/content") => self.handle_delete(&params),

            _ => Ok(error_response(StatusCode::NOT_FOUND, "Not found")),
        };

        match result {
            Ok(response) => Ok(response),
            Err(e) => {
                let status = error_status(&e);
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    error!(error = %e, "Request error");
                }
                Ok(error_response(status, &e.to_string()))
            }
        }
    }

    /// GET /health - Liveness check
    fn handle_health(&self) -> Result<Response<Full<Bytes>>, StoreError> {
        let body = serde_json::json!({
            "status": "ok",
            "service": "sanctum-store",
            "version": env!("CARGO_PKG_VERSION"),
        });
        Ok(json_response(StatusCode::OK, &body))
    }

    /// GET /stats - Record counts
    fn handle_stats(&self) -> Result<Response<Full<Bytes>>, StoreError> {
        let stats = self.store.stats()?;
        Ok(json_response(StatusCode::OK, &serde_json::to_value(&stats)?))
    }

    /// GET /content - List records for a section
    fn handle_list(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<Response<Full<Bytes>>, StoreError> {
        let section = params
            .get("section")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StoreError::InvalidInput("section query parameter is required".to_string()))?;

        let query = RecordQuery {
            section: section.clone(),
            subsection: params.get("subsection").cloned(),
            include_inactive: params
                .get("includeInactive")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        let records = self.store.list_records(&query)?;
        Ok(json_response(StatusCode::OK, &serde_json::to_value(&records)?))
    }

    /// POST /content - Create a record
    async fn handle_create(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, StoreError> {
        let input: CreateRecordInput = read_json_body(req).await?;
        let record = self.store.create_record(input)?;

        info!(id = %record.id, section = %record.section, "Created record");

        Ok(json_response(StatusCode::CREATED, &serde_json::to_value(&record)?))
    }

    /// POST /content/bulk - Seed many records
    async fn handle_bulk_create(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, StoreError> {
        let items: Vec<CreateRecordInput> = read_json_body(req).await?;
        let outcome = self.store.bulk_create_records(items)?;

        info!(
            inserted = outcome.inserted,
            skipped = outcome.skipped,
            errors = outcome.errors.len(),
            "Bulk create finished"
        );

        Ok(json_response(StatusCode::OK, &serde_json::to_value(&outcome)?))
    }

    /// PUT /content?id=... - Partial update
    async fn handle_update(
        &self,
        req: Request<Incoming>,
        params: &HashMap<String, String>,
    ) -> Result<Response<Full<Bytes>>, StoreError> {
        let id = params
            .get("id")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StoreError::InvalidInput("id query parameter is required".to_string()))?
            .clone();

        let patch: UpdateRecordInput = read_json_body(req).await?;
        if patch.is_empty() {
            return Err(StoreError::InvalidInput("update body has no fields".to_string()));
        }

        if !self.store.update_record(&id, &patch)? {
            return Err(StoreError::NotFound(id));
        }

        debug!(id = %id, "Updated record");

        Ok(json_response(StatusCode::OK, &serde_json::json!({"success": true})))
    }

    /// PUT /content?action=reorder - Atomic reorder
    async fn handle_reorder(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, StoreError> {
        let body: ReorderRequest = read_json_body(req).await?;
        let updated = self.store.reorder_records(&body.items)?;

        info!(updated = updated, "Reordered records");

        Ok(json_response(
            StatusCode::OK,
            &serde_json::json!({"success": true, "updated": updated}),
        ))
    }

    /// DELETE /content?id=... - Delete a record
    fn handle_delete(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<Response<Full<Bytes>>, StoreError> {
        let id = params
            .get("id")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StoreError::InvalidInput("id query parameter is required".to_string()))?;

        if !self.store.delete_record(id)? {
            return Err(StoreError::NotFound(id.clone()));
        }

        info!(id = %id, "Deleted record");

        Ok(json_response(StatusCode::OK, &serde_json::json!({"success": true})))
    }
}

/// Read and deserialize a JSON request body
async fn read_json_body<T: serde::de::DeserializeOwned>(
    req: Request<Incoming>,
) -> Result<T, StoreError> {
    let body = req
        .collect()
        .await
        .map_err(|e| StoreError::Internal(format!("Failed to read body: {}", e)))?;
    let data = body.to_bytes();

    serde_json::from_slice(&data)
        .map_err(|e| StoreError::InvalidInput(format!("Invalid JSON body: {}", e)))
}

/// Parse URL query parameters into a map
fn parse_query_params(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?.to_string();
            let raw = parts.next().unwrap_or("");
            let value = urlencoding::decode(raw)
                .map(|c| c.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            Some((key, value))
        })
        .collect()
}

fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({"error": message});
    json_response(status, &body)
}

/// Map store errors onto HTTP status codes
fn error_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_params() {
        let params = parse_query_params("section=hero&subsection=hero-title&includeInactive=true");
        assert_eq!(params.get("section").map(String::as_str), Some("hero"));
        assert_eq!(params.get("subsection").map(String::as_str), Some("hero-title"));
        assert_eq!(params.get("includeInactive").map(String::as_str), Some("true"));
    }

    #[test]
    fn decodes_encoded_values() {
        let params = parse_query_params("section=our%20team&id=a%2Fb");
        assert_eq!(params.get("section").map(String::as_str), Some("our team"));
        assert_eq!(params.get("id").map(String::as_str), Some("a/b"));
    }

    #[test]
    fn empty_query_yields_no_params() {
        assert!(parse_query_params("").is_empty());
    }

    #[test]
    fn maps_errors_to_statuses() {
        assert_eq!(
            error_status(&StoreError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&StoreError::InvalidInput("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&StoreError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
