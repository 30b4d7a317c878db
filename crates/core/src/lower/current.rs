//! Lowering to the condition-tree schema.

use flagpress_model::{
    Condition, ConfigurationDocument, Preferences, RuleOutcome, ServedValue, Setting,
    TargetingRule,
};

use crate::compile::{CompiledFlag, CompiledRule};

pub fn lower_setting(flag: &CompiledFlag) -> Setting {
    Setting {
        value: flag.default.clone(),
        setting_type: flag.setting_type,
        variation_id: flag.variation_id.clone(),
        targeting_rules: flag.rules.iter().map(lower_rule).collect(),
        percentage_options: Vec::new(),
        percentage_attribute: None,
    }
}

fn lower_rule(rule: &CompiledRule) -> TargetingRule {
    TargetingRule {
        conditions: vec![Condition::User(rule.condition.clone())],
        outcome: RuleOutcome::Served(ServedValue {
            value: rule.served.clone(),
            variation_id: rule.variation_id.clone(),
        }),
    }
}

pub fn lower_document(
    flags: &[CompiledFlag],
    preferences: Option<&Preferences>,
) -> ConfigurationDocument {
    ConfigurationDocument {
        preferences: preferences.cloned(),
        settings: flags
            .iter()
            .map(|f| (f.key.clone(), lower_setting(f)))
            .collect(),
        segments: Vec::new(),
    }
}
