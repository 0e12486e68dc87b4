//! Section content models
//!
//! A section's records encode their roles in naming conventions and
//! metadata: `{key}-number`/`{key}-label` subsections form statistic
//! pairs, `social-{platform}-url`/`-enabled` form toggles, board member
//! records share a composite entity key, and dynamic-list records carry
//! the list entity. [`classify_section`] resolves all of that into
//! [`SectionShape`] values ready to render or edit.

pub mod board;
pub mod dynamic;
pub mod shape;
pub mod social;
pub mod stats;

pub use board::{board_member_key, next_member_number, BoardMember, BOARD_ENTITY, BOARD_FIELDS};
pub use dynamic::{is_dynamic, next_dynamic_order, DYNAMIC_ENTITY};
pub use shape::{classify_section, SectionShape};
pub use social::{parse_wire_bool, social_leaf, wire_bool, SocialLeaf, SocialToggle};
pub use stats::{stat_leaf, StatLeaf, StatPair};
