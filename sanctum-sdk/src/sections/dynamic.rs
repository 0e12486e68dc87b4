//! Dynamic ordered sections
//!
//! Editor-created list sections (the gratitude wall) whose items carry no
//! naming scheme at all; the only structure is the `order` value. New
//! items land at the end with a spaced order so later inserts between
//! neighbors stay possible.

use sanctum_client::ContentRecord;

/// Metadata entity tag for dynamic section items
pub const DYNAMIC_ENTITY: &str = "gratitude";

/// Legacy display-name marker for dynamic section items
pub const DYNAMIC_NAME_PREFIX: &str = "Gratitude Section";

/// Gap left between appended items
pub const DYNAMIC_ORDER_STEP: i64 = 10;

/// Whether a record belongs to a dynamic ordered section
pub fn is_dynamic(record: &ContentRecord) -> bool {
    record.metadata.as_ref().is_some_and(|meta| {
        meta.entity.as_deref() == Some(DYNAMIC_ENTITY)
            || meta
                .name
                .as_deref()
                .is_some_and(|name| name.starts_with(DYNAMIC_NAME_PREFIX))
    })
}

/// Order value for an item appended after the given records
pub fn next_dynamic_order(records: &[ContentRecord]) -> i64 {
    records
        .iter()
        .map(|r| r.order_index)
        .max()
        .unwrap_or(0)
        + DYNAMIC_ORDER_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctum_client::RecordMeta;

    fn record(id: &str, order: i64, meta: Option<RecordMeta>) -> ContentRecord {
        ContentRecord {
            id: id.to_string(),
            section: "gratitude".to_string(),
            subsection: None,
            content_type: "text".to_string(),
            content: String::new(),
            metadata: meta,
            order_index: order,
            is_active: true,
            user: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn entity_tag_marks_dynamic() {
        let mut meta = RecordMeta::default();
        meta.entity = Some(DYNAMIC_ENTITY.to_string());
        assert!(is_dynamic(&record("r1", 10, Some(meta))));
    }

    #[test]
    fn legacy_name_prefix_marks_dynamic() {
        let meta = RecordMeta::named("Gratitude Section 3");
        assert!(is_dynamic(&record("r1", 10, Some(meta))));

        let other = RecordMeta::named("Hero Title");
        assert!(!is_dynamic(&record("r2", 0, Some(other))));
        assert!(!is_dynamic(&record("r3", 0, None)));
    }

    #[test]
    fn appended_items_land_past_the_max() {
        assert_eq!(next_dynamic_order(&[]), 10);

        let records = vec![
            record("a", 10, None),
            record("b", 30, None),
            record("c", 20, None),
        ];
        assert_eq!(next_dynamic_order(&records), 40);
    }
}
