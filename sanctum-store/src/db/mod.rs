//! SQLite persistence for content records
//!
//! A single connection behind a mutex is plenty for the write rates a
//! content store sees; WAL mode keeps readers from blocking on writers.

pub mod records;
pub mod schema;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

use crate::error::StoreError;
use records::{
    BulkOutcome, CreateRecordInput, RecordQuery, RecordRow, ReorderItem, UpdateRecordInput,
};

/// Handle to the content database
pub struct ContentStore {
    conn: Mutex<Connection>,
}

/// Counts reported by the stats endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_records: u64,
    pub active_records: u64,
    pub sections: u64,
    pub schema_version: i32,
}

impl ContentStore {
    /// Open (or create) the database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| StoreError::Internal(format!("Failed to open database: {}", e)))?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| StoreError::Internal(format!("Failed to set pragmas: {}", e)))?;

        schema::init_schema(&conn)?;

        info!("Content store opened at {}", path.as_ref().display());

        Ok(Self { conn: Mutex::new(conn) })
    }

    /// In-memory store for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Internal(format!("Failed to open database: {}", e)))?;

        schema::init_schema(&conn)?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Run a closure against the connection
    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Internal("Database lock poisoned".to_string()))?;
        f(&conn)
    }

    /// Run a closure that needs a mutable connection (transactions)
    fn with_conn_mut<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Internal("Database lock poisoned".to_string()))?;
        f(&mut conn)
    }

    pub fn list_records(&self, query: &RecordQuery) -> Result<Vec<RecordRow>, StoreError> {
        self.with_conn(|conn| records::list_records(conn, query))
    }

    pub fn get_record(&self, id: &str) -> Result<Option<RecordRow>, StoreError> {
        self.with_conn(|conn| records::get_record(conn, id))
    }

    pub fn create_record(&self, input: CreateRecordInput) -> Result<RecordRow, StoreError> {
        self.with_conn_mut(|conn| records::create_record(conn, input))
    }

    pub fn update_record(&self, id: &str, patch: &UpdateRecordInput) -> Result<bool, StoreError> {
        self.with_conn(|conn| records::update_record(conn, id, patch))
    }

    pub fn delete_record(&self, id: &str) -> Result<bool, StoreError> {
        self.with_conn(|conn| records::delete_record(conn, id))
    }

    pub fn reorder_records(&self, items: &[ReorderItem]) -> Result<usize, StoreError> {
        self.with_conn_mut(|conn| records::reorder_records(conn, items))
    }

    pub fn bulk_create_records(
        &self,
        items: Vec<CreateRecordInput>,
    ) -> Result<BulkOutcome, StoreError> {
        self.with_conn_mut(|conn| records::bulk_create_records(conn, items))
    }

    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        self.with_conn(|conn| {
            let total_records: u64 = conn
                .query_row("SELECT COUNT(*) FROM content_records", [], |row| row.get(0))
                .map_err(|e| StoreError::Internal(format!("Count failed: {}", e)))?;

            let active_records: u64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM content_records WHERE is_active = 1",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| StoreError::Internal(format!("Count failed: {}", e)))?;

            let sections: u64 = conn
                .query_row(
                    "SELECT COUNT(DISTINCT section) FROM content_records",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| StoreError::Internal(format!("Count failed: {}", e)))?;

            Ok(StoreStats {
                total_records,
                active_records,
                sections,
                schema_version: schema::get_schema_version(conn)?,
            })
        })
    }
}
