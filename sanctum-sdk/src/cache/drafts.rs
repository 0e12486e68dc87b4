//! Draft buffer for pending edits
//!
//! Holds one partial update per record id until a batch save drains it.
//! Staging the same record again merges field-wise, last write wins, so
//! an editor can touch a record's content and its active flag in separate
//! gestures and still issue a single write.

use sanctum_client::UpdateRecordInput;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Pending edits keyed by record id
#[derive(Default)]
pub struct DraftBuffer {
    drafts: Mutex<HashMap<String, UpdateRecordInput>>,
}

impl DraftBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a partial update for a record, merging over any prior draft
    pub async fn stage(&self, id: impl Into<String>, patch: UpdateRecordInput) {
        let id = id.into();
        let mut drafts = self.drafts.lock().await;
        match drafts.get_mut(&id) {
            Some(existing) => existing.merge(patch),
            None => {
                drafts.insert(id, patch);
            }
        }
    }

    /// Discard the draft for one record. Returns true if one was staged.
    pub async fn discard(&self, id: &str) -> bool {
        let removed = self.drafts.lock().await.remove(id).is_some();
        if removed {
            debug!(id = id, "Draft discarded");
        }
        removed
    }

    /// Drain every staged draft for a batch save
    pub async fn take_all(&self) -> HashMap<String, UpdateRecordInput> {
        std::mem::take(&mut *self.drafts.lock().await)
    }

    /// Put drafts back, merging under anything staged since. Used to
    /// re-stage writes that failed so a later save retries them.
    pub async fn restore(&self, drafts: HashMap<String, UpdateRecordInput>) {
        let mut held = self.drafts.lock().await;
        for (id, patch) in drafts {
            match held.get_mut(&id) {
                // Edits staged after the failed save win over the retry
                Some(newer) => {
                    let mut merged = patch;
                    merged.merge(newer.clone());
                    *newer = merged;
                }
                None => {
                    held.insert(id, patch);
                }
            }
        }
    }

    /// Ids with a staged draft
    pub async fn staged_ids(&self) -> Vec<String> {
        self.drafts.lock().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.drafts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.lock().await.is_empty()
    }

    /// Drop every draft
    pub async fn clear(&self) {
        self.drafts.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn staging_merges_last_write_wins() {
        let buffer = DraftBuffer::new();

        buffer.stage("r1", UpdateRecordInput::content("first")).await;
        buffer
            .stage(
                "r1",
                UpdateRecordInput { is_active: Some(false), ..Default::default() },
            )
            .await;
        buffer.stage("r1", UpdateRecordInput::content("second")).await;

        assert_eq!(buffer.len().await, 1);

        let drafts = buffer.take_all().await;
        let draft = &drafts["r1"];
        assert_eq!(draft.content.as_deref(), Some("second"));
        assert_eq!(draft.is_active, Some(false));

        assert!(buffer.is_empty().await);
    }

    #[tokio::test]
    async fn discard_drops_one_draft() {
        let buffer = DraftBuffer::new();
        buffer.stage("r1", UpdateRecordInput::content("a")).await;
        buffer.stage("r2", UpdateRecordInput::content("b")).await;

        assert!(buffer.discard("r1").await);
        assert!(!buffer.discard("r1").await);

        let ids = buffer.staged_ids().await;
        assert_eq!(ids, vec!["r2".to_string()]);
    }

    #[tokio::test]
    async fn restore_keeps_newer_edits_on_top() {
        let buffer = DraftBuffer::new();

        // A failed save hands its drafts back while the user kept typing
        buffer.stage("r1", UpdateRecordInput::content("newer")).await;

        let mut failed = HashMap::new();
        let mut old = UpdateRecordInput::content("older");
        old.is_active = Some(false);
        failed.insert("r1".to_string(), old);
        failed.insert("r2".to_string(), UpdateRecordInput::content("lost write"));

        buffer.restore(failed).await;

        let drafts = buffer.take_all().await;
        assert_eq!(drafts["r1"].content.as_deref(), Some("newer"));
        assert_eq!(drafts["r1"].is_active, Some(false));
        assert_eq!(drafts["r2"].content.as_deref(), Some("lost write"));
    }
}
