//! Editing session over a content source
//!
//! Collects unsaved field drafts, commits them as one concurrent batch,
//! and applies the shape-specific write flows (social toggles, statistic
//! pairs, board members, dynamic lists, full-section reorders). Every
//! write path keeps the section cache coherent.

use crate::cache::{DraftBuffer, SectionCache};
use crate::error::{Result, SdkError};
use crate::sections::board::{member_field_name, next_member_number, BoardMember, BOARD_ENTITY, BOARD_FIELDS};
use crate::sections::dynamic::{next_dynamic_order, DYNAMIC_ENTITY};
use crate::sections::social::{wire_bool, SocialToggle};
use crate::sections::stats::StatPair;
use crate::traits::ContentSource;
use sanctum_client::{ContentRecord, CreateRecordInput, RecordMeta, ReorderItem, UpdateRecordInput};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Direction of a single-step move inside an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Field edits for one board member; `None` leaves that field untouched
#[derive(Debug, Clone, Default)]
pub struct BoardMemberEdits {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// One editing session against a content repository.
///
/// Drafts accumulate per record id until [`save_all`](Self::save_all)
/// commits them in a single concurrent batch. Shape-level operations
/// (toggles, board members, dynamic lists) write through immediately.
///
/// # Example
///
/// ```rust,ignore
/// use sanctum_sdk::{EditorSession, SectionCache};
///
/// let editor = EditorSession::new(source, cache);
/// editor.stage_content("rec-1", "Welcome back").await;
/// editor.stage_content("rec-2", "Rest. Renew.").await;
/// editor.save_all().await?;
/// ```
pub struct EditorSession {
    source: Arc<dyn ContentSource>,
    cache: Arc<SectionCache>,
    drafts: DraftBuffer,
}

impl EditorSession {
    pub fn new(source: Arc<dyn ContentSource>, cache: Arc<SectionCache>) -> Self {
        Self {
            source,
            cache,
            drafts: DraftBuffer::new(),
        }
    }

    /// Stage a partial update for later batch save
    pub async fn stage(&self, id: impl Into<String>, patch: UpdateRecordInput) {
        self.drafts.stage(id, patch).await;
    }

    /// Stage a content-only edit for later batch save
    pub async fn stage_content(&self, id: impl Into<String>, content: impl Into<String>) {
        self.stage(id, UpdateRecordInput::content(content)).await;
    }

    /// Drop a staged draft without saving. Returns false when nothing
    /// was staged for the id.
    pub async fn discard(&self, id: &str) -> bool {
        self.drafts.discard(id).await
    }

    /// Ids with a staged draft
    pub async fn staged_ids(&self) -> Vec<String> {
        self.drafts.staged_ids().await
    }

    /// Number of records with unsaved drafts
    pub async fn draft_count(&self) -> usize {
        self.drafts.len().await
    }

    pub async fn has_drafts(&self) -> bool {
        !self.drafts.is_empty().await
    }

    /// Commit every staged draft in one concurrent batch.
    ///
    /// All updates are issued together and joined; succeeded writes stay
    /// applied. If any call failed, its draft is re-staged for retry and
    /// the batch reports [`SdkError::Batch`]. The cache is invalidated
    /// exactly once per batch either way.
    pub async fn save_all(&self) -> Result<usize> {
        let drafts = self.drafts.take_all().await;
        if drafts.is_empty() {
            return Ok(0);
        }
        let total = drafts.len();

        let updates = drafts.into_iter().map(|(id, patch)| {
            let source = Arc::clone(&self.source);
            async move {
                let result = source.update_record(&id, &patch).await;
                (id, patch, result)
            }
        });
        let results = futures::future::join_all(updates).await;

        let mut succeeded = 0usize;
        let mut failed: HashMap<String, UpdateRecordInput> = HashMap::new();
        let mut errors: Vec<String> = Vec::new();
        for (id, patch, result) in results {
            match result {
                Ok(()) => succeeded += 1,
                Err(err) => {
                    errors.push(format!("{}: {}", id, err));
                    failed.insert(id, patch);
                }
            }
        }

        // One invalidation per batch, not one per record
        self.cache.invalidate_all();

        if failed.is_empty() {
            info!("Saved {} drafts", succeeded);
            Ok(succeeded)
        } else {
            warn!("Batch save left {} of {} drafts unsaved", failed.len(), total);
            let failed_count = failed.len();
            self.drafts.restore(failed).await;
            Err(SdkError::Batch {
                succeeded,
                failed: failed_count,
                errors,
            })
        }
    }

    /// Flip a social platform's visibility.
    ///
    /// Writes only the `-enabled` record; the sibling `-url` record is
    /// never touched. The stored value stays a `"true"`/`"false"` string.
    pub async fn toggle_social(&self, toggle: &SocialToggle, enabled: bool) -> Result<()> {
        let record = toggle.enabled.as_ref().ok_or_else(|| {
            SdkError::NotFound(format!("social-{}-enabled", toggle.platform))
        })?;
        let patch = UpdateRecordInput::content(wire_bool(enabled));
        self.source.update_record(&record.id, &patch).await?;
        self.invalidate_record_keys(record);
        Ok(())
    }

    /// Save a statistic pair. Number and label commit as independent
    /// updates; passing `None` leaves that side untouched.
    pub async fn save_stat(
        &self,
        pair: &StatPair,
        number: Option<&str>,
        label: Option<&str>,
    ) -> Result<usize> {
        let mut saved = 0;
        if let (Some(value), Some(record)) = (number, pair.number.as_ref()) {
            let patch = UpdateRecordInput::content(value);
            self.source.update_record(&record.id, &patch).await?;
            self.invalidate_record_keys(record);
            saved += 1;
        }
        if let (Some(value), Some(record)) = (label, pair.label.as_ref()) {
            let patch = UpdateRecordInput::content(value);
            self.source.update_record(&record.id, &patch).await?;
            self.invalidate_record_keys(record);
            saved += 1;
        }
        Ok(saved)
    }

    /// Add a board member as four blank records sharing a fresh number.
    ///
    /// Records carry the composite entity key plus a display name for
    /// readers of the older convention. Returns the new member number.
    pub async fn add_board_member(
        &self,
        section: &str,
        existing: &[BoardMember],
    ) -> Result<i64> {
        let number = next_member_number(existing);
        for field in BOARD_FIELDS {
            let meta = RecordMeta {
                name: Some(member_field_name(number, field)),
                ..RecordMeta::entity_field(BOARD_ENTITY, number, field)
            };
            let content_type = if field == "image" { "image" } else { "text" };
            let input = CreateRecordInput {
                section: section.to_string(),
                subsection: Some(format!("board-member-{}-{}", number, field)),
                content_type: content_type.to_string(),
                content: String::new(),
                metadata: Some(meta),
                order: None,
                is_active: true,
                user: None,
            };
            self.source.create_record(&input).await?;
        }
        self.cache.invalidate(section);
        info!("Added board member {} to section {}", number, section);
        Ok(number)
    }

    /// Save edited fields of a board member; at most four updates.
    ///
    /// An edit addressing a field with no backing record is refused
    /// before any sibling is written.
    pub async fn save_board_member(
        &self,
        member: &BoardMember,
        edits: BoardMemberEdits,
    ) -> Result<usize> {
        let pairs = [
            ("name", member.name.as_ref(), edits.name),
            ("title", member.title.as_ref(), edits.title),
            ("bio", member.bio.as_ref(), edits.bio),
            ("image", member.image.as_ref(), edits.image),
        ];
        for (field, record, value) in &pairs {
            if value.is_some() && record.is_none() {
                return Err(SdkError::NotFound(format!(
                    "board-member-{}-{}",
                    member.number, field
                )));
            }
        }
        let mut saved = 0;
        for (_, record, value) in pairs {
            if let (Some(record), Some(value)) = (record, value) {
                let patch = UpdateRecordInput::content(value);
                self.source.update_record(&record.id, &patch).await?;
                self.invalidate_record_keys(record);
                saved += 1;
            }
        }
        Ok(saved)
    }

    /// Delete exactly the records belonging to one board member
    pub async fn remove_board_member(&self, member: &BoardMember) -> Result<usize> {
        let mut removed = 0;
        for record in member.records() {
            if self.source.delete_record(&record.id).await? {
                removed += 1;
            }
            self.invalidate_record_keys(record);
        }
        info!("Removed board member {} ({} records)", member.number, removed);
        Ok(removed)
    }

    /// Append an entry to a section's dynamic list.
    ///
    /// The new record lands after the current tail with the usual order
    /// gap, leaving room for later inserts between neighbors.
    pub async fn insert_dynamic(
        &self,
        section: &str,
        existing: &[ContentRecord],
        content: impl Into<String>,
    ) -> Result<ContentRecord> {
        let meta = RecordMeta {
            entity: Some(DYNAMIC_ENTITY.to_string()),
            ..Default::default()
        };
        let input = CreateRecordInput {
            section: section.to_string(),
            subsection: None,
            content_type: "text".to_string(),
            content: content.into(),
            metadata: Some(meta),
            order: Some(next_dynamic_order(existing)),
            is_active: true,
            user: None,
        };
        let record = self.source.create_record(&input).await?;
        self.cache.invalidate(section);
        Ok(record)
    }

    /// Delete one dynamic-list entry
    pub async fn delete_dynamic(&self, record: &ContentRecord) -> Result<bool> {
        let deleted = self.source.delete_record(&record.id).await?;
        if deleted {
            self.invalidate_record_keys(record);
        }
        Ok(deleted)
    }

    /// Move one dynamic-list entry a single step.
    ///
    /// Swaps order values with the neighbor in one atomic reorder call,
    /// so a partial swap can never be observed. Moving the first item up
    /// or the last item down is a no-op returning false.
    pub async fn move_dynamic(
        &self,
        items: &[ContentRecord],
        index: usize,
        direction: MoveDirection,
    ) -> Result<bool> {
        if index >= items.len() {
            return Ok(false);
        }
        let neighbor = match direction {
            MoveDirection::Up => {
                if index == 0 {
                    return Ok(false);
                }
                index - 1
            }
            MoveDirection::Down => {
                if index + 1 >= items.len() {
                    return Ok(false);
                }
                index + 1
            }
        };

        let current = &items[index];
        let other = &items[neighbor];
        self.source
            .reorder(vec![
                ReorderItem {
                    id: current.id.clone(),
                    order: other.order_index,
                },
                ReorderItem {
                    id: other.id.clone(),
                    order: current.order_index,
                },
            ])
            .await?;
        self.invalidate_record_keys(current);
        Ok(true)
    }

    /// Persist a full new ordering for a section.
    ///
    /// Assigns `order = index` over the given sequence and commits it in
    /// one reorder call. On failure the optimistic order is discarded:
    /// the cache entry is dropped and re-fetched so readers see the
    /// store's authoritative order again.
    pub async fn reorder_all(&self, section: &str, ordered: &[ContentRecord]) -> Result<()> {
        let items: Vec<ReorderItem> = ordered
            .iter()
            .enumerate()
            .map(|(index, record)| ReorderItem {
                id: record.id.clone(),
                order: index as i64,
            })
            .collect();

        match self.source.reorder(items).await {
            Ok(()) => {
                self.cache.invalidate(section);
                Ok(())
            }
            Err(err) => {
                warn!("Reorder of section {} failed: {}", section, err);
                self.cache.invalidate(section);
                if let Ok(records) = self.source.fetch_section(section, None).await {
                    self.cache.insert(section, records);
                }
                Err(err)
            }
        }
    }

    fn invalidate_record_keys(&self, record: &ContentRecord) {
        self.cache.invalidate(&record.section);
        let key = record.cache_key();
        if key != record.section {
            self.cache.invalidate(&key);
        }
    }
}
