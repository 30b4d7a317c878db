//! Typed structs for the current (condition-tree) configuration schema.
//!
//! Sum types on the wire are single-key objects (`{"b": true}`,
//! `{"u": {...}}`), which is exactly serde's externally tagged enum
//! representation. Where a struct carries "exactly one of" several fields
//! the choice is a flattened enum, so an object with two value fields can
//! not be constructed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{Comparator, PrerequisiteComparator, SegmentComparator, SettingType};

// ── Values ──────────────────────────────────────────────────────────

/// A served value tagged with its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
    #[serde(rename = "b")]
    Bool(bool),
    #[serde(rename = "s")]
    String(String),
    #[serde(rename = "i")]
    Int(i64),
    #[serde(rename = "d")]
    Float(f64),
}

impl SettingValue {
    pub fn setting_type(&self) -> SettingType {
        match self {
            SettingValue::Bool(_) => SettingType::Bool,
            SettingValue::String(_) => SettingType::String,
            SettingValue::Int(_) => SettingType::Int,
            SettingValue::Float(_) => SettingType::Float,
        }
    }

    /// The untagged JSON form, as used by the legacy schema.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SettingValue::Bool(b) => serde_json::Value::Bool(*b),
            SettingValue::String(s) => serde_json::Value::String(s.clone()),
            SettingValue::Int(i) => serde_json::Value::from(*i),
            SettingValue::Float(d) => serde_json::Value::from(*d),
        }
    }
}

// ── Conditions ──────────────────────────────────────────────────────

/// The comparison operand of a user condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComparisonValue {
    #[serde(rename = "s")]
    Text(String),
    #[serde(rename = "d")]
    Number(f64),
    #[serde(rename = "l")]
    List(Vec<String>),
}

/// A comparison between one user attribute and a constant operand.
///
/// `value` is `None` only when a numeric comparison text failed to parse;
/// the condition is then emitted with no operand field at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCondition {
    #[serde(rename = "a")]
    pub comparison_attribute: String,
    #[serde(rename = "c")]
    pub comparator: Comparator,
    #[serde(flatten)]
    pub value: Option<ComparisonValue>,
}

/// Reference to a segment by index into the document's segment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentCondition {
    #[serde(rename = "s")]
    pub segment_index: usize,
    #[serde(rename = "c")]
    pub comparator: SegmentComparator,
}

/// Dependency on the evaluated value of another flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrerequisiteFlagCondition {
    #[serde(rename = "f")]
    pub flag_key: String,
    #[serde(rename = "c")]
    pub comparator: PrerequisiteComparator,
    #[serde(rename = "v")]
    pub value: SettingValue,
}

/// One member of a targeting rule's AND-group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "u")]
    User(UserCondition),
    #[serde(rename = "s")]
    Segment(SegmentCondition),
    #[serde(rename = "p")]
    Prerequisite(PrerequisiteFlagCondition),
}

// ── Rules and settings ──────────────────────────────────────────────

/// A value and the variation id reported when it is served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServedValue {
    #[serde(rename = "v")]
    pub value: SettingValue,
    #[serde(rename = "i")]
    pub variation_id: String,
}

/// One bucket of a percentage rollout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageOption {
    #[serde(rename = "p")]
    pub percentage: u8,
    #[serde(rename = "v")]
    pub value: SettingValue,
    #[serde(rename = "i")]
    pub variation_id: String,
}

/// What a targeting rule yields once all its conditions match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuleOutcome {
    #[serde(rename = "s")]
    Served(ServedValue),
    #[serde(rename = "p")]
    Percentage(Vec<PercentageOption>),
}

/// An AND-group of conditions and its consequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetingRule {
    #[serde(rename = "c", default)]
    pub conditions: Vec<Condition>,
    #[serde(flatten)]
    pub outcome: RuleOutcome,
}

/// The compiled form of one feature flag.
///
/// Targeting rules are evaluated in order and the first full match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    #[serde(rename = "v")]
    pub value: SettingValue,
    #[serde(rename = "t")]
    pub setting_type: SettingType,
    #[serde(rename = "i")]
    pub variation_id: String,
    #[serde(rename = "r", default)]
    pub targeting_rules: Vec<TargetingRule>,
    #[serde(rename = "p", default, skip_serializing_if = "Vec::is_empty")]
    pub percentage_options: Vec<PercentageOption>,
    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    pub percentage_attribute: Option<String>,
}

// ── Document ────────────────────────────────────────────────────────

/// A named group of user conditions referenced by [`SegmentCondition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "r", default)]
    pub conditions: Vec<UserCondition>,
}

/// Document-level metadata for evaluators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "u", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<u8>,
    /// Salt the evaluator mixes into hashed comparisons.
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

/// The full document served to evaluators.
///
/// Settings are held in a `BTreeMap` so the serialized form is independent
/// of insertion order and the fingerprint is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
    #[serde(rename = "f", default)]
    pub settings: BTreeMap<String, Setting>,
    #[serde(rename = "s", default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
}
