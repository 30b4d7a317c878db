//! Typed structs for the legacy (flat rollout-rule) configuration schema.
//!
//! Legacy rules carry the comparison text exactly as authored and a raw,
//! untagged JSON value. The comparator field is a bare integer because the
//! legacy code space is a prefix of [`Comparator`](crate::Comparator) codes
//! and is checked by the lowering step, not by the type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::SettingType;
use crate::types::Preferences;

/// One flat targeting rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloutRule {
    #[serde(rename = "o")]
    pub order: usize,
    #[serde(rename = "a")]
    pub comparison_attribute: String,
    #[serde(rename = "t")]
    pub comparator: u8,
    #[serde(rename = "c")]
    pub comparison_value: String,
    #[serde(rename = "v")]
    pub value: serde_json::Value,
    #[serde(rename = "i")]
    pub variation_id: String,
}

/// One bucket of a legacy percentage rollout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageItem {
    #[serde(rename = "o")]
    pub order: usize,
    #[serde(rename = "v")]
    pub value: serde_json::Value,
    #[serde(rename = "p")]
    pub percentage: u8,
    #[serde(rename = "i")]
    pub variation_id: String,
}

/// Legacy form of a compiled flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacySetting {
    #[serde(rename = "v")]
    pub value: serde_json::Value,
    #[serde(rename = "t")]
    pub setting_type: SettingType,
    #[serde(rename = "i")]
    pub variation_id: String,
    #[serde(rename = "r", default)]
    pub rollout_rules: Vec<RolloutRule>,
    #[serde(rename = "p", default, skip_serializing_if = "Vec::is_empty")]
    pub percentage_items: Vec<PercentageItem>,
}

/// The legacy document served as `config_v5.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyDocument {
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
    #[serde(rename = "f", default)]
    pub settings: BTreeMap<String, LegacySetting>,
}
