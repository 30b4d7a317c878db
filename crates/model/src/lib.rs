//! flagpress-model: wire types for feature-flag configuration documents.
//!
//! Two schema generations live side by side:
//!
//! - [`types`] -- the current condition-tree schema served as
//!   `config_v6.json`. Settings carry tagged values, targeting rules carry
//!   a list of [`Condition`]s and a [`RuleOutcome`].
//! - [`legacy`] -- the flat rollout-rule schema served as `config_v5.json`.
//!
//! Field names on the wire are the single-letter tags evaluators expect
//! (`f`, `v`, `t`, `i`, `r`, ...). The Rust field names are descriptive and
//! mapped with `#[serde(rename)]`.

pub mod deserialize;
pub mod enums;
pub mod legacy;
pub mod types;

pub use deserialize::{parse_document, DocumentError};
pub use enums::{
    Comparator, ComparatorClass, PrerequisiteComparator, SegmentComparator, SettingType,
    UnknownCode,
};
pub use types::*;

/// File name of the current-schema document under `/configuration-files/{key}/`.
pub const CURRENT_DOCUMENT_NAME: &str = "config_v6.json";
/// File name of the legacy-schema document under `/configuration-files/{key}/`.
pub const LEGACY_DOCUMENT_NAME: &str = "config_v5.json";
