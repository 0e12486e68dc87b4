//! Social link toggles
//!
//! Each platform has a `social-<platform>-url` record and a
//! `social-<platform>-enabled` record. The enabled flag is a boolean in
//! the model; on the wire and in storage it stays the string
//! `"true"` / `"false"`.

use sanctum_client::ContentRecord;

/// Which record of a platform pair this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialLeaf {
    Url,
    Enabled,
}

/// A platform's URL record and enabled flag record
#[derive(Debug, Clone, Default)]
pub struct SocialToggle {
    pub platform: String,
    pub url: Option<ContentRecord>,
    pub enabled: Option<ContentRecord>,
}

impl SocialToggle {
    pub fn new(platform: impl Into<String>) -> Self {
        Self { platform: platform.into(), ..Default::default() }
    }

    /// The flag as a boolean; a missing or unparseable record reads false
    pub fn is_enabled(&self) -> bool {
        self.enabled
            .as_ref()
            .map(|r| parse_wire_bool(&r.content))
            .unwrap_or(false)
    }

    pub fn url_value(&self) -> Option<&str> {
        self.url.as_ref().map(|r| r.content.as_str())
    }
}

/// Match a subsection against the social naming scheme
pub fn social_leaf(subsection: &str) -> Option<(String, SocialLeaf)> {
    let rest = subsection.strip_prefix("social-")?;
    if let Some(platform) = rest.strip_suffix("-url") {
        if !platform.is_empty() {
            return Some((platform.to_string(), SocialLeaf::Url));
        }
    }
    if let Some(platform) = rest.strip_suffix("-enabled") {
        if !platform.is_empty() {
            return Some((platform.to_string(), SocialLeaf::Enabled));
        }
    }
    None
}

/// Read a stored `"true"` / `"false"` flag
pub fn parse_wire_bool(content: &str) -> bool {
    content.trim().eq_ignore_ascii_case("true")
}

/// Write a flag back in its wire form
pub fn wire_bool(enabled: bool) -> &'static str {
    if enabled { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_platform_leaves() {
        assert_eq!(
            social_leaf("social-instagram-url"),
            Some(("instagram".to_string(), SocialLeaf::Url))
        );
        assert_eq!(
            social_leaf("social-facebook-enabled"),
            Some(("facebook".to_string(), SocialLeaf::Enabled))
        );
    }

    #[test]
    fn rejects_other_subsections() {
        assert!(social_leaf("hero-title").is_none());
        assert!(social_leaf("social-").is_none());
        assert!(social_leaf("social--url").is_none());
        assert!(social_leaf("social-instagram").is_none());
    }

    #[test]
    fn wire_bool_round_trip() {
        assert!(parse_wire_bool("true"));
        assert!(parse_wire_bool(" True "));
        assert!(!parse_wire_bool("false"));
        assert!(!parse_wire_bool(""));
        assert!(!parse_wire_bool("yes"));

        assert_eq!(wire_bool(true), "true");
        assert_eq!(wire_bool(false), "false");
        assert!(parse_wire_bool(wire_bool(true)));
    }
}
