//! Authoring-side flag definitions.
//!
//! This is the shape callers (and flag definition files) hand to the
//! compiler. Values are untyped JSON and comparators may be given by code
//! or by name; nothing here is validated until compilation.
//!
//! # Example (TOML)
//!
//! ```toml
//! [beta_banner]
//! default = false
//!
//! [[beta_banner.rules]]
//! attribute = "Email"
//! comparator = "endsWithAnyOf"
//! comparison_value = "@example.com"
//! value = true
//! ```

use std::collections::BTreeMap;
use std::fmt;

use flagpress_model::Comparator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A complete flag set keyed by flag key.
///
/// Ordered so that compilation visits flags deterministically and the
/// first reported error does not depend on hash order.
pub type FlagSet = BTreeMap<String, Flag>;

/// One flag: a default value and an ordered list of targeting rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub default: Value,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Flag {
    pub fn new(default: impl Into<Value>) -> Self {
        Self {
            default: default.into(),
            rules: Vec::new(),
        }
    }

    /// Append a targeting rule. Rules are evaluated in the order added.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// A single-condition targeting rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// User attribute the condition inspects.
    pub attribute: String,
    pub comparator: RuleComparator,
    /// Comparison operand as authored, before any splitting or parsing.
    pub comparison_value: String,
    /// Value served when the condition matches.
    pub value: Value,
}

impl Rule {
    pub fn new(
        attribute: impl Into<String>,
        comparator: impl Into<RuleComparator>,
        comparison_value: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            comparator: comparator.into(),
            comparison_value: comparison_value.into(),
            value: value.into(),
        }
    }

    /// `"Email" ENDS WITH ANY OF "@example.com"`, for error messages.
    pub fn describe(&self) -> String {
        format!(
            "{:?} {} {:?}",
            self.attribute, self.comparator, self.comparison_value
        )
    }
}

/// A comparator as written by the author: a wire code or a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleComparator {
    Code(i64),
    Name(String),
}

impl RuleComparator {
    pub fn resolve(&self) -> Option<Comparator> {
        match self {
            RuleComparator::Code(code) => Comparator::from_code(*code),
            RuleComparator::Name(name) => Comparator::from_name(name),
        }
    }

    /// Display text of the resolved comparator; empty if it does not resolve.
    pub fn display_name(&self) -> &'static str {
        match self {
            RuleComparator::Code(code) => Comparator::display_name_of(*code),
            RuleComparator::Name(name) => {
                Comparator::from_name(name).map_or("", Comparator::display_name)
            }
        }
    }
}

impl From<Comparator> for RuleComparator {
    fn from(c: Comparator) -> Self {
        RuleComparator::Code(c.code().into())
    }
}

impl fmt::Display for RuleComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.resolve(), self) {
            (Some(c), _) => f.write_str(c.display_name()),
            (None, RuleComparator::Code(code)) => write!(f, "{}", code),
            (None, RuleComparator::Name(name)) => write!(f, "{:?}", name),
        }
    }
}
