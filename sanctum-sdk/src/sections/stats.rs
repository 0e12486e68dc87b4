//! Statistic pair grouping
//!
//! A site statistic is two sibling records whose subsections differ only
//! by a `-number` / `-label` suffix ("hero-stat-1-number" pairs with
//! "hero-stat-1-label" under the key "hero-stat-1").

use sanctum_client::ContentRecord;

/// Which half of a statistic a record holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatLeaf {
    Number,
    Label,
}

/// A number/label pair grouped under its suffix-stripped key
#[derive(Debug, Clone, Default)]
pub struct StatPair {
    pub key: String,
    pub number: Option<ContentRecord>,
    pub label: Option<ContentRecord>,
}

impl StatPair {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), ..Default::default() }
    }

    /// Both halves are present
    pub fn is_complete(&self) -> bool {
        self.number.is_some() && self.label.is_some()
    }

    pub fn number_value(&self) -> Option<&str> {
        self.number.as_ref().map(|r| r.content.as_str())
    }

    pub fn label_value(&self) -> Option<&str> {
        self.label.as_ref().map(|r| r.content.as_str())
    }
}

/// Match a subsection against the statistic naming scheme.
///
/// Returns the pair key and which leaf this record is, or None when the
/// subsection is not a statistic leaf.
pub fn stat_leaf(subsection: &str) -> Option<(String, StatLeaf)> {
    if let Some(key) = subsection.strip_suffix("-number") {
        if !key.is_empty() {
            return Some((key.to_string(), StatLeaf::Number));
        }
    }
    if let Some(key) = subsection.strip_suffix("-label") {
        if !key.is_empty() {
            return Some((key.to_string(), StatLeaf::Label));
        }
    }
    None
}
