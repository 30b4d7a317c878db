//! Condition building: authored comparison text to a typed user condition.
//!
//! The comparator's class decides which operand field is populated:
//!
//! - list: the text split on `,` (items are not trimmed)
//! - numeric: the trimmed text parsed as `f64`; left unset if unparsable
//! - plain: the text verbatim

use flagpress_model::{ComparatorClass, ComparisonValue, UserCondition};

use crate::flag::RuleComparator;

/// The comparator does not name a known operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidComparator(pub String);

pub fn build_user_condition(
    attribute: &str,
    comparator: &RuleComparator,
    text: &str,
) -> Result<UserCondition, InvalidComparator> {
    let resolved = comparator
        .resolve()
        .filter(|c| !c.display_name().is_empty())
        .ok_or_else(|| InvalidComparator(comparator.to_string()))?;

    let value = match resolved.class() {
        ComparatorClass::List => Some(ComparisonValue::List(split_list(text))),
        ComparatorClass::Numeric => parse_number(text).map(ComparisonValue::Number),
        ComparatorClass::Plain => Some(ComparisonValue::Text(text.to_owned())),
    };

    Ok(UserCondition {
        comparison_attribute: attribute.to_owned(),
        comparator: resolved,
        value,
    })
}

/// Split list text on commas. Surrounding spaces stay part of each item.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',').map(str::to_owned).collect()
}

/// Parse numeric comparison text.
///
/// Returns `None` for text that is not a number and for non-finite
/// results (`NaN`, `inf`), which have no JSON representation.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
