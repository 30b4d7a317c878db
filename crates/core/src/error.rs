use flagpress_model::{Comparator, SettingType};

/// A flag definition that cannot be compiled.
///
/// Every variant names the flag, and rule-level variants name the rule by
/// index and by its authored text, so a caller can locate the declaration
/// without reading compiler source.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("flag '{flag}': invalid default type: {found} is not one of bool, string, int, float")]
    InvalidDefaultType { flag: String, found: String },

    #[error("flag '{flag}': rule {rule} ({description}): invalid comparator value {comparator}")]
    InvalidComparator {
        flag: String,
        rule: usize,
        description: String,
        comparator: String,
    },

    #[error("flag '{flag}': rule {rule} ({description}): empty comparison attribute")]
    EmptyAttribute {
        flag: String,
        rule: usize,
        description: String,
    },

    #[error("flag '{flag}': rule {rule} ({description}): empty comparison value")]
    EmptyComparisonValue {
        flag: String,
        rule: usize,
        description: String,
    },

    #[error("flag '{flag}': rule {rule} ({description}): served value has type {found}, need {expected}")]
    ServedTypeMismatch {
        flag: String,
        rule: usize,
        description: String,
        expected: SettingType,
        found: String,
    },
}

impl CompileError {
    pub fn flag_key(&self) -> &str {
        match self {
            CompileError::InvalidDefaultType { flag, .. }
            | CompileError::InvalidComparator { flag, .. }
            | CompileError::EmptyAttribute { flag, .. }
            | CompileError::EmptyComparisonValue { flag, .. }
            | CompileError::ServedTypeMismatch { flag, .. } => flag,
        }
    }

    /// Index of the offending rule, `None` for flag-level errors.
    pub fn rule_index(&self) -> Option<usize> {
        match self {
            CompileError::InvalidDefaultType { .. } => None,
            CompileError::InvalidComparator { rule, .. }
            | CompileError::EmptyAttribute { rule, .. }
            | CompileError::EmptyComparisonValue { rule, .. }
            | CompileError::ServedTypeMismatch { rule, .. } => Some(*rule),
        }
    }

    /// Name of the authored field that failed, as spelled in definition files.
    pub fn field(&self) -> &'static str {
        match self {
            CompileError::InvalidDefaultType { .. } => "default",
            CompileError::InvalidComparator { .. } => "comparator",
            CompileError::EmptyAttribute { .. } => "attribute",
            CompileError::EmptyComparisonValue { .. } => "comparison_value",
            CompileError::ServedTypeMismatch { .. } => "value",
        }
    }

    /// Structured form for `--output json`. Always includes every key.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "field":   self.field(),
            "flag":    self.flag_key(),
            "message": self.to_string(),
            "rule":    self.rule_index(),
        })
    }
}

/// A compiled flag that a particular wire format cannot express.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LowerError {
    #[error("flag '{flag}': rule {rule}: comparator '{comparator}' has no {format} encoding")]
    UnsupportedComparator {
        flag: String,
        rule: usize,
        comparator: Comparator,
        format: &'static str,
    },
}

/// Failure of [`Registry::publish`](crate::Registry::publish). The registry
/// is unchanged whenever this is returned.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("distribution key must not be empty")]
    EmptyDistributionKey,

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Lower(#[from] LowerError),

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
