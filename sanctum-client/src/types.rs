//! Types for the content store API

use serde::{Deserialize, Serialize};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the sanctum-store HTTP API
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8085".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Structured record metadata.
///
/// The well-known keys carry the composite-entity addressing
/// (`entity` + `entityId` + `field`) and the display `name`; anything
/// else the editor stores rides along in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RecordMeta {
    /// Metadata carrying just a display name
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Default::default() }
    }

    /// Metadata carrying a composite-entity key
    pub fn entity_field(
        entity: impl Into<String>,
        entity_id: i64,
        field: impl Into<String>,
    ) -> Self {
        Self {
            entity: Some(entity.into()),
            entity_id: Some(entity_id),
            field: Some(field.into()),
            ..Default::default()
        }
    }
}

/// A content record as served by sanctum-store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    pub section: String,
    pub subsection: Option<String>,
    pub content_type: String,
    pub content: String,
    pub metadata: Option<RecordMeta>,
    #[serde(rename = "order")]
    pub order_index: i64,
    pub is_active: bool,
    pub user: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ContentRecord {
    /// Cache/grouping key: `section` or `section-subsection`
    pub fn cache_key(&self) -> String {
        section_key(&self.section, self.subsection.as_deref())
    }

    /// Parse `json`-typed content into an array, falling back to empty
    /// when the payload is missing or malformed
    pub fn content_items(&self) -> Vec<serde_json::Value> {
        if self.content.is_empty() {
            return vec![];
        }
        match serde_json::from_str(&self.content) {
            Ok(serde_json::Value::Array(items)) => items,
            _ => vec![],
        }
    }
}

/// Derive the cache key for a (section, subsection) pair
pub fn section_key(section: &str, subsection: Option<&str>) -> String {
    match subsection {
        Some(sub) if !sub.is_empty() => format!("{}-{}", section, sub),
        _ => section.to_string(),
    }
}

/// Input for creating a record. The server assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordInput {
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection: Option<String>,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RecordMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl CreateRecordInput {
    /// A text record addressed by (section, subsection)
    pub fn text(section: impl Into<String>, subsection: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            subsection: Some(subsection.into()),
            content_type: "text".to_string(),
            content: content.into(),
            metadata: None,
            order: None,
            is_active: true,
            user: None,
        }
    }
}

fn default_content_type() -> String { "text".to_string() }
fn default_true() -> bool { true }

/// Partial update; absent fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RecordMeta>,
    #[serde(default, rename = "order", skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl UpdateRecordInput {
    /// Patch carrying only a new content value
    pub fn content(value: impl Into<String>) -> Self {
        Self { content: Some(value.into()), ..Default::default() }
    }

    /// Merge another patch into this one; fields present in `other` win
    pub fn merge(&mut self, other: UpdateRecordInput) {
        if other.section.is_some() { self.section = other.section; }
        if other.subsection.is_some() { self.subsection = other.subsection; }
        if other.content_type.is_some() { self.content_type = other.content_type; }
        if other.content.is_some() { self.content = other.content; }
        if other.metadata.is_some() { self.metadata = other.metadata; }
        if other.order.is_some() { self.order = other.order; }
        if other.is_active.is_some() { self.is_active = other.is_active; }
        if other.user.is_some() { self.user = other.user; }
    }
}

/// One entry of a reorder call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: String,
    pub order: i64,
}

/// Body of the reorder action
#[derive(Debug, Clone, Serialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

/// Options for fetching a section
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Restrict to one subsection
    pub subsection: Option<String>,
    /// Include records hidden from the public site
    pub include_inactive: bool,
}

/// Generic `{"success": true}` response
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Result of a bulk create
#[derive(Debug, Clone, Deserialize)]
pub struct BulkOutcome {
    pub inserted: u64,
    pub skipped: u64,
    pub errors: Vec<String>,
}

/// Store statistics
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_records: u64,
    pub active_records: u64,
    pub sections: u64,
    pub schema_version: i32,
}

/// Health check response
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
