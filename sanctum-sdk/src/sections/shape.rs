//! Section shape classification
//!
//! Turns a fetched record list into the widgets a page renders: statistic
//! pairs, social toggles, board members, one dynamic list, and generic
//! single-record fields. Classification precedence is board, then social,
//! then statistic, then dynamic, then generic; shapes come out in the
//! order their first record appears in the order-sorted list.

use sanctum_client::ContentRecord;
use std::collections::{HashMap, HashSet};

use super::board::{board_member_key, BoardMember};
use super::dynamic::is_dynamic;
use super::social::{social_leaf, SocialLeaf, SocialToggle};
use super::stats::{stat_leaf, StatLeaf, StatPair};

/// One renderable unit of a section
#[derive(Debug, Clone)]
pub enum SectionShape {
    /// A number/label statistic pair
    Stat(StatPair),
    /// A social platform's URL and enabled flag
    Social(SocialToggle),
    /// A board member's grouped records
    Board(BoardMember),
    /// The section's dynamic list, sorted by order
    Dynamic(Vec<ContentRecord>),
    /// A standalone field
    Generic(ContentRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Board(i64),
    Social(String),
    Stat(String),
    Dynamic,
    Generic(String),
}

enum Classified {
    Board { number: i64, field: String },
    Social { platform: String, leaf: SocialLeaf },
    Stat { key: String, leaf: StatLeaf },
    Dynamic,
    Generic,
}

fn classify_record(record: &ContentRecord) -> Classified {
    if let Some((number, field)) = board_member_key(record) {
        return Classified::Board { number, field };
    }
    if let Some(subsection) = record.subsection.as_deref() {
        if let Some((platform, leaf)) = social_leaf(subsection) {
            return Classified::Social { platform, leaf };
        }
        if let Some((key, leaf)) = stat_leaf(subsection) {
            return Classified::Stat { key, leaf };
        }
    }
    if is_dynamic(record) {
        return Classified::Dynamic;
    }
    Classified::Generic
}

/// Classify a section's records into renderable shapes.
///
/// Grouping does not depend on the order records arrive in; the emitted
/// sequence follows each group's first appearance after sorting by order.
pub fn classify_section(records: &[ContentRecord]) -> Vec<SectionShape> {
    let mut sorted: Vec<ContentRecord> = records.to_vec();
    sorted.sort_by_key(|r| r.order_index);

    let mut emit_order: Vec<GroupKey> = Vec::new();
    let mut seen: HashSet<GroupKey> = HashSet::new();
    let mut stats: HashMap<String, StatPair> = HashMap::new();
    let mut socials: HashMap<String, SocialToggle> = HashMap::new();
    let mut boards: HashMap<i64, BoardMember> = HashMap::new();
    let mut dynamics: Vec<ContentRecord> = Vec::new();
    let mut generics: HashMap<String, ContentRecord> = HashMap::new();

    for record in sorted {
        let class = classify_record(&record);
        let key = match &class {
            Classified::Board { number, .. } => GroupKey::Board(*number),
            Classified::Social { platform, .. } => GroupKey::Social(platform.clone()),
            Classified::Stat { key, .. } => GroupKey::Stat(key.clone()),
            Classified::Dynamic => GroupKey::Dynamic,
            Classified::Generic => GroupKey::Generic(record.id.clone()),
        };
        if seen.insert(key.clone()) {
            emit_order.push(key);
        }

        match class {
            Classified::Board { number, field } => {
                boards
                    .entry(number)
                    .or_insert_with(|| BoardMember::new(number))
                    .set_field(&field, record);
            }
            Classified::Social { platform, leaf } => {
                let toggle = socials
                    .entry(platform.clone())
                    .or_insert_with(|| SocialToggle::new(platform));
                match leaf {
                    SocialLeaf::Url => toggle.url = Some(record),
                    SocialLeaf::Enabled => toggle.enabled = Some(record),
                }
            }
            Classified::Stat { key, leaf } => {
                let pair = stats.entry(key.clone()).or_insert_with(|| StatPair::new(key));
                match leaf {
                    StatLeaf::Number => pair.number = Some(record),
                    StatLeaf::Label => pair.label = Some(record),
                }
            }
            Classified::Dynamic => dynamics.push(record),
            Classified::Generic => {
                generics.insert(record.id.clone(), record);
            }
        }
    }

    emit_order
        .into_iter()
        .filter_map(|key| match key {
            GroupKey::Board(number) => boards.remove(&number).map(SectionShape::Board),
            GroupKey::Social(platform) => socials.remove(&platform).map(SectionShape::Social),
            GroupKey::Stat(stat_key) => stats.remove(&stat_key).map(SectionShape::Stat),
            GroupKey::Dynamic => {
                if dynamics.is_empty() {
                    None
                } else {
                    Some(SectionShape::Dynamic(std::mem::take(&mut dynamics)))
                }
            }
            GroupKey::Generic(id) => generics.remove(&id).map(SectionShape::Generic),
        })
        .collect()
}
