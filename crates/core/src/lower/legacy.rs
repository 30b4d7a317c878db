//! Lowering to the flat rollout-rule schema.
//!
//! Legacy rules carry the authored comparison text rather than a parsed
//! operand, and only know comparator codes up to
//! [`MAX_LEGACY_COMPARATOR`].

use std::collections::BTreeMap;

use flagpress_model::legacy::{LegacyDocument, LegacySetting, RolloutRule};
use flagpress_model::Preferences;

use crate::compile::CompiledFlag;
use crate::error::LowerError;

/// Highest comparator code the legacy schema defines
/// (`IS NOT ONE OF (hashed)`).
pub const MAX_LEGACY_COMPARATOR: u8 = 17;

pub fn lower_setting(flag: &CompiledFlag) -> Result<LegacySetting, LowerError> {
    let mut rollout_rules = Vec::with_capacity(flag.rules.len());
    for (order, rule) in flag.rules.iter().enumerate() {
        let comparator = rule.comparator();
        if comparator.code() > MAX_LEGACY_COMPARATOR {
            return Err(LowerError::UnsupportedComparator {
                flag: flag.key.clone(),
                rule: order,
                comparator,
                format: "legacy",
            });
        }
        rollout_rules.push(RolloutRule {
            order,
            comparison_attribute: rule.condition.comparison_attribute.clone(),
            comparator: comparator.code(),
            comparison_value: rule.comparison_text.clone(),
            value: rule.served.to_json(),
            variation_id: rule.variation_id.clone(),
        });
    }

    Ok(LegacySetting {
        value: flag.default.to_json(),
        setting_type: flag.setting_type,
        variation_id: flag.variation_id.clone(),
        rollout_rules,
        percentage_items: Vec::new(),
    })
}

pub fn lower_document(
    flags: &[CompiledFlag],
    preferences: Option<&Preferences>,
) -> Result<LegacyDocument, LowerError> {
    let settings: BTreeMap<String, LegacySetting> = flags
        .iter()
        .map(|f| lower_setting(f).map(|s| (f.key.clone(), s)))
        .collect::<Result<_, _>>()?;
    Ok(LegacyDocument {
        preferences: preferences.cloned(),
        settings,
    })
}
