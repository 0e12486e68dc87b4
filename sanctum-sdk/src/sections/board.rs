//! Board member grouping
//!
//! A board member is four sibling records (name, title, bio, image)
//! edited as a unit. The structural metadata key
//! `entity = "board-member"` + `entityId` + `field` is authoritative;
//! legacy records that only carry a display name like
//! "Board Member 2 Bio" still group through the name parse.

use sanctum_client::ContentRecord;

/// The four record fields that make up one member
pub const BOARD_FIELDS: [&str; 4] = ["name", "title", "bio", "image"];

/// Metadata entity tag for board member records
pub const BOARD_ENTITY: &str = "board-member";

/// One member's records, keyed by their shared number
#[derive(Debug, Clone, Default)]
pub struct BoardMember {
    pub number: i64,
    pub name: Option<ContentRecord>,
    pub title: Option<ContentRecord>,
    pub bio: Option<ContentRecord>,
    pub image: Option<ContentRecord>,
}

impl BoardMember {
    pub fn new(number: i64) -> Self {
        Self { number, ..Default::default() }
    }

    pub(crate) fn set_field(&mut self, field: &str, record: ContentRecord) {
        match field {
            "name" => self.name = Some(record),
            "title" => self.title = Some(record),
            "bio" => self.bio = Some(record),
            "image" => self.image = Some(record),
            _ => {}
        }
    }

    /// The records this member actually has, in field order
    pub fn records(&self) -> Vec<&ContentRecord> {
        [&self.name, &self.title, &self.bio, &self.image]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_ref().map(|r| r.content.as_str())
    }
}

/// Resolve a record to its (member number, field) key, or None when the
/// record is not part of a board member.
pub fn board_member_key(record: &ContentRecord) -> Option<(i64, String)> {
    let meta = record.metadata.as_ref()?;

    if meta.entity.as_deref() == Some(BOARD_ENTITY) {
        if let (Some(number), Some(field)) = (meta.entity_id, meta.field.as_deref()) {
            let field = field.to_ascii_lowercase();
            if BOARD_FIELDS.contains(&field.as_str()) {
                return Some((number, field));
            }
        }
    }

    parse_legacy_board_name(meta.name.as_deref()?)
}

/// Parse the legacy "Board Member {N} {Field}" display name
fn parse_legacy_board_name(name: &str) -> Option<(i64, String)> {
    let rest = name.strip_prefix("Board Member ")?;
    let mut parts = rest.splitn(2, ' ');
    let number = parts.next()?.parse::<i64>().ok()?;
    let field = parts.next()?.trim().to_ascii_lowercase();
    if BOARD_FIELDS.contains(&field.as_str()) {
        Some((number, field))
    } else {
        None
    }
}

/// The number a newly added member gets
pub fn next_member_number(members: &[BoardMember]) -> i64 {
    members.iter().map(|m| m.number).max().unwrap_or(0) + 1
}

/// Display name for a member field record ("Board Member 3 Bio")
pub fn member_field_name(number: i64, field: &str) -> String {
    let mut capitalized = String::with_capacity(field.len());
    let mut chars = field.chars();
    if let Some(first) = chars.next() {
        capitalized.extend(first.to_uppercase());
        capitalized.push_str(chars.as_str());
    }
    format!("Board Member {} {}", number, capitalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctum_client::RecordMeta;

    fn record_with_meta(id: &str, meta: RecordMeta) -> ContentRecord {
        ContentRecord {
            id: id.to_string(),
            section: "board".to_string(),
            subsection: None,
            content_type: "text".to_string(),
            content: String::new(),
            metadata: Some(meta),
            order_index: 0,
            is_active: true,
            user: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn structural_keys_resolve_first() {
        let record = record_with_meta("r1", RecordMeta::entity_field(BOARD_ENTITY, 3, "Bio"));
        assert_eq!(board_member_key(&record), Some((3, "bio".to_string())));
    }

    #[test]
    fn legacy_names_still_group() {
        let record = record_with_meta("r1", RecordMeta::named("Board Member 2 Title"));
        assert_eq!(board_member_key(&record), Some((2, "title".to_string())));
    }

    #[test]
    fn unrelated_names_do_not_group() {
        let record = record_with_meta("r1", RecordMeta::named("Mission Statement"));
        assert_eq!(board_member_key(&record), None);

        let odd = record_with_meta("r2", RecordMeta::named("Board Member two Bio"));
        assert_eq!(board_member_key(&odd), None);

        let bad_field = record_with_meta("r3", RecordMeta::named("Board Member 2 Salary"));
        assert_eq!(board_member_key(&bad_field), None);
    }

    #[test]
    fn next_number_is_max_plus_one() {
        assert_eq!(next_member_number(&[]), 1);

        let members = vec![BoardMember::new(1), BoardMember::new(4), BoardMember::new(2)];
        assert_eq!(next_member_number(&members), 5);
    }

    #[test]
    fn field_names_capitalize() {
        assert_eq!(member_field_name(3, "bio"), "Board Member 3 Bio");
        assert_eq!(member_field_name(10, "image"), "Board Member 10 Image");
    }
}
