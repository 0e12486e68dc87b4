//! Content record CRUD operations

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

/// Payload tags a record may carry
pub const CONTENT_TYPES: &[&str] = &["text", "html", "json", "link", "image", "video"];

/// Content record row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRow {
    pub id: String,
    pub section: String,
    pub subsection: Option<String>,
    pub content_type: String,
    pub content: String,
    /// Open key/value metadata, stored as JSON text
    pub metadata: Option<serde_json::Value>,
    #[serde(rename = "order")]
    pub order_index: i64,
    pub is_active: bool,
    pub user: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl RecordRow {
    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let metadata_text: Option<String> = row.get("metadata")?;
        Ok(Self {
            id: row.get("id")?,
            section: row.get("section")?,
            subsection: row.get("subsection")?,
            content_type: row.get("content_type")?,
            content: row.get("content")?,
            // Malformed metadata is treated as absent rather than failing the read
            metadata: metadata_text.and_then(|s| serde_json::from_str(&s).ok()),
            order_index: row.get("order_index")?,
            is_active: row.get("is_active")?,
            user: row.get("user")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Input for creating a record. The server assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordInput {
    pub section: String,
    #[serde(default)]
    pub subsection: Option<String>,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Defaults to max(order) + 1 within the (section, subsection) group
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub user: Option<String>,
}

fn default_content_type() -> String { "text".to_string() }
fn default_true() -> bool { true }

/// Partial update. Only present fields are written; updated_at always refreshes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRecordInput {
    pub section: Option<String>,
    pub subsection: Option<String>,
    pub content_type: Option<String>,
    pub content: Option<String>,
    pub metadata: Option<serde_json::Value>,
    #[serde(rename = "order")]
    pub order: Option<i64>,
    pub is_active: Option<bool>,
    pub user: Option<String>,
}

impl UpdateRecordInput {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.section.is_none()
            && self.subsection.is_none()
            && self.content_type.is_none()
            && self.content.is_none()
            && self.metadata.is_none()
            && self.order.is_none()
            && self.is_active.is_none()
            && self.user.is_none()
    }
}

/// One entry of a bulk reorder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: String,
    pub order: i64,
}

/// Query parameters for listing records
#[derive(Debug, Clone)]
pub struct RecordQuery {
    pub section: String,
    pub subsection: Option<String>,
    /// Admin reads include inactive records; public reads do not
    pub include_inactive: bool,
}

/// Validate a create input before it reaches the database
pub fn validate_create_input(input: &CreateRecordInput) -> Result<(), StoreError> {
    if input.section.trim().is_empty() {
        return Err(StoreError::InvalidInput("section is required".to_string()));
    }
    if !CONTENT_TYPES.contains(&input.content_type.as_str()) {
        return Err(StoreError::InvalidInput(format!(
            "unknown contentType '{}'",
            input.content_type
        )));
    }
    Ok(())
}

/// Validate a partial update
pub fn validate_update_input(patch: &UpdateRecordInput) -> Result<(), StoreError> {
    if let Some(ref section) = patch.section {
        if section.trim().is_empty() {
            return Err(StoreError::InvalidInput("section cannot be empty".to_string()));
        }
    }
    if let Some(ref ct) = patch.content_type {
        if !CONTENT_TYPES.contains(&ct.as_str()) {
            return Err(StoreError::InvalidInput(format!("unknown contentType '{}'", ct)));
        }
    }
    Ok(())
}

/// Get a record by ID
pub fn get_record(conn: &Connection, id: &str) -> Result<Option<RecordRow>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT * FROM content_records WHERE id = ?")
        .map_err(|e| StoreError::Internal(format!("Prepare failed: {}", e)))?;

    let mut rows = stmt
        .query(params![id])
        .map_err(|e| StoreError::Internal(format!("Query failed: {}", e)))?;

    if let Some(row) = rows.next().map_err(|e| StoreError::Internal(format!("Row fetch failed: {}", e)))? {
        let record = RecordRow::from_row(row)
            .map_err(|e| StoreError::Internal(format!("Row parse failed: {}", e)))?;
        Ok(Some(record))
    } else {
        Ok(None)
    }
}

/// List records for a section, ordered by order_index with insertion-order ties
pub fn list_records(conn: &Connection, query: &RecordQuery) -> Result<Vec<RecordRow>, StoreError> {
    let mut sql = String::from("SELECT * FROM content_records WHERE section = ?");
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(query.section.clone())];

    if let Some(ref subsection) = query.subsection {
        sql.push_str(" AND subsection = ?");
        params_vec.push(Box::new(subsection.clone()));
    }

    if !query.include_inactive {
        sql.push_str(" AND is_active = 1");
    }

    // rowid tie-break keeps repeated fetches stable when order values collide
    sql.push_str(" ORDER BY order_index ASC, rowid ASC");

    debug!("Executing query: {}", sql);

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| StoreError::Internal(format!("Prepare failed: {}", e)))?;

    let param_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

    let rows = stmt
        .query_map(param_refs.as_slice(), |row| RecordRow::from_row(row))
        .map_err(|e| StoreError::Internal(format!("Query failed: {}", e)))?;

    let mut results = vec![];
    for row_result in rows {
        let record = row_result
            .map_err(|e| StoreError::Internal(format!("Row parse failed: {}", e)))?;
        results.push(record);
    }

    Ok(results)
}

/// Create a single record. Assigns a fresh id; when no order is given the
/// record lands after its (section, subsection) siblings.
pub fn create_record(conn: &mut Connection, input: CreateRecordInput) -> Result<RecordRow, StoreError> {
    validate_create_input(&input)?;

    let id = uuid::Uuid::new_v4().to_string();
    let metadata_text = match input.metadata {
        Some(ref value) => Some(serde_json::to_string(value)?),
        None => None,
    };

    let tx = conn.transaction()
        .map_err(|e| StoreError::Internal(format!("Transaction failed: {}", e)))?;

    let order_index: i64 = match input.order {
        Some(order) => order,
        None => tx
            .query_row(
                "SELECT COALESCE(MAX(order_index) + 1, 0) FROM content_records
                 WHERE section = ? AND subsection IS ?",
                params![input.section, input.subsection],
                |row| row.get(0),
            )
            .map_err(|e| StoreError::Internal(format!("Order lookup failed: {}", e)))?,
    };

    tx.execute(
        r#"
        INSERT INTO content_records (
            id, section, subsection, content_type, content,
            metadata, order_index, is_active, user
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            id,
            input.section,
            input.subsection,
            input.content_type,
            input.content,
            metadata_text,
            order_index,
            input.is_active,
            input.user,
        ],
    ).map_err(|e| StoreError::Internal(format!("Insert failed: {}", e)))?;

    tx.commit()
        .map_err(|e| StoreError::Internal(format!("Commit failed: {}", e)))?;

    get_record(conn, &id)?
        .ok_or_else(|| StoreError::Internal("Record not found after insert".to_string()))
}

/// Apply a partial update to a record. Fields absent from the patch keep
/// their prior values; updated_at always refreshes.
pub fn update_record(conn: &Connection, id: &str, patch: &UpdateRecordInput) -> Result<bool, StoreError> {
    validate_update_input(patch)?;

    let mut sets: Vec<&str> = vec![];
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![];

    if let Some(ref section) = patch.section {
        sets.push("section = ?");
        params_vec.push(Box::new(section.clone()));
    }
    if let Some(ref subsection) = patch.subsection {
        sets.push("subsection = ?");
        params_vec.push(Box::new(subsection.clone()));
    }
    if let Some(ref ct) = patch.content_type {
        sets.push("content_type = ?");
        params_vec.push(Box::new(ct.clone()));
    }
    if let Some(ref content) = patch.content {
        sets.push("content = ?");
        params_vec.push(Box::new(content.clone()));
    }
    if let Some(ref metadata) = patch.metadata {
        sets.push("metadata = ?");
        params_vec.push(Box::new(serde_json::to_string(metadata)?));
    }
    if let Some(order) = patch.order {
        sets.push("order_index = ?");
        params_vec.push(Box::new(order));
    }
    if let Some(is_active) = patch.is_active {
        sets.push("is_active = ?");
        params_vec.push(Box::new(is_active));
    }
    if let Some(ref user) = patch.user {
        sets.push("user = ?");
        params_vec.push(Box::new(user.clone()));
    }

    sets.push("updated_at = datetime('now')");

    let sql = format!(
        "UPDATE content_records SET {} WHERE id = ?",
        sets.join(", ")
    );
    params_vec.push(Box::new(id.to_string()));

    let param_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

    let changes = conn
        .execute(&sql, param_refs.as_slice())
        .map_err(|e| StoreError::Internal(format!("Update failed: {}", e)))?;

    Ok(changes > 0)
}

/// Delete exactly one record. Composite-entity siblings are never cascaded;
/// callers remove each sibling explicitly.
pub fn delete_record(conn: &Connection, id: &str) -> Result<bool, StoreError> {
    let changes = conn
        .execute("DELETE FROM content_records WHERE id = ?", params![id])
        .map_err(|e| StoreError::Internal(format!("Delete failed: {}", e)))?;

    Ok(changes > 0)
}

/// Replace order values for the given ids in one transaction. Any unknown id
/// rolls the whole batch back so a partial reorder can never be observed.
pub fn reorder_records(conn: &mut Connection, items: &[ReorderItem]) -> Result<usize, StoreError> {
    if items.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()
        .map_err(|e| StoreError::Internal(format!("Transaction failed: {}", e)))?;

    let mut updated = 0usize;
    for item in items {
        let changes = tx
            .execute(
                "UPDATE content_records SET order_index = ?, updated_at = datetime('now') WHERE id = ?",
                params![item.order, item.id],
            )
            .map_err(|e| StoreError::Internal(format!("Reorder update failed: {}", e)))?;

        if changes == 0 {
            // Dropping the transaction rolls back the earlier updates
            return Err(StoreError::NotFound(item.id.clone()));
        }
        updated += changes;
    }

    tx.commit()
        .map_err(|e| StoreError::Internal(format!("Commit failed: {}", e)))?;

    Ok(updated)
}

/// Result of a bulk create
#[derive(Debug, Clone, Serialize)]
pub struct BulkOutcome {
    pub inserted: u64,
    pub skipped: u64,
    pub errors: Vec<String>,
}

/// Bulk create records (for seeding). A record whose (section, subsection,
/// metadata.name) triple already names an existing row is skipped so seeding
/// stays idempotent for named fields.
pub fn bulk_create_records(
    conn: &mut Connection,
    items: Vec<CreateRecordInput>,
) -> Result<BulkOutcome, StoreError> {
    let tx = conn.transaction()
        .map_err(|e| StoreError::Internal(format!("Transaction failed: {}", e)))?;

    let mut inserted = 0u64;
    let mut skipped = 0u64;
    let mut errors = vec![];

    for input in items {
        if let Err(e) = validate_create_input(&input) {
            errors.push(format!("{}/{:?}: {}", input.section, input.subsection, e));
            continue;
        }

        let name = input
            .metadata
            .as_ref()
            .and_then(|m| m.get("name"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        if let Some(ref name) = name {
            let exists: bool = tx
                .query_row(
                    "SELECT 1 FROM content_records
                     WHERE section = ? AND subsection IS ? AND json_extract(metadata, '$.name') = ?",
                    params![input.section, input.subsection, name],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            if exists {
                skipped += 1;
                continue;
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let metadata_text = input
            .metadata
            .as_ref()
            .and_then(|value| serde_json::to_string(value).ok());

        let order_index: i64 = match input.order {
            Some(order) => order,
            None => tx
                .query_row(
                    "SELECT COALESCE(MAX(order_index) + 1, 0) FROM content_records
                     WHERE section = ? AND subsection IS ?",
                    params![input.section, input.subsection],
                    |row| row.get(0),
                )
                .unwrap_or(0),
        };

        let result = tx.execute(
            r#"
            INSERT INTO content_records (
                id, section, subsection, content_type, content,
                metadata, order_index, is_active, user
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                id,
                input.section,
                input.subsection,
                input.content_type,
                input.content,
                metadata_text,
                order_index,
                input.is_active,
                input.user,
            ],
        );

        match result {
            Ok(_) => inserted += 1,
            Err(e) => errors.push(format!("{}/{:?}: {}", input.section, input.subsection, e)),
        }
    }

    tx.commit()
        .map_err(|e| StoreError::Internal(format!("Commit failed: {}", e)))?;

    Ok(BulkOutcome { inserted, skipped, errors })
}
