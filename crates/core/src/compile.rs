//! Rule compilation: validate authored flags and produce [`CompiledFlag`],
//! the intermediate form every wire format is lowered from.
//!
//! Validation happens only here. A `CompiledFlag` guarantees:
//!
//! - the default is one of the four servable kinds
//! - every rule has a known comparator, a non-empty attribute and
//!   comparison value, and serves a value of the default's kind
//! - variation ids are unique within the flag
//! - rules are in authoring order

use flagpress_model::{Comparator, Setting, SettingType, SettingValue, UserCondition};

use crate::classify::{classify, encode, kind_name};
use crate::condition::build_user_condition;
use crate::error::CompileError;
use crate::flag::{Flag, FlagSet};
use crate::lower::current;

/// A validated targeting rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    pub condition: UserCondition,
    /// Comparison text exactly as authored.
    pub comparison_text: String,
    pub served: SettingValue,
    pub variation_id: String,
}

impl CompiledRule {
    pub fn comparator(&self) -> Comparator {
        self.condition.comparator
    }
}

/// A validated flag.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFlag {
    pub key: String,
    pub setting_type: SettingType,
    pub default: SettingValue,
    pub variation_id: String,
    pub rules: Vec<CompiledRule>,
}

/// Variation id of a flag's default value.
pub fn default_variation_id(key: &str) -> String {
    format!("v_{}", key)
}

/// Variation id of the rule at `index`. Never equal to
/// [`default_variation_id`] or to another index's id for the same key.
pub fn rule_variation_id(index: usize, key: &str) -> String {
    format!("v{}_{}", index, key)
}

/// Validate one flag. Rules are checked in order and the first violation
/// aborts the whole flag.
pub fn validate_flag(key: &str, flag: &Flag) -> Result<CompiledFlag, CompileError> {
    let (setting_type, default) = classify(&flag.default)
        .zip(encode(&flag.default))
        .ok_or_else(|| CompileError::InvalidDefaultType {
            flag: key.to_owned(),
            found: kind_name(&flag.default).to_owned(),
        })?;

    let mut rules = Vec::with_capacity(flag.rules.len());
    for (index, rule) in flag.rules.iter().enumerate() {
        if rule.comparator.display_name().is_empty() {
            return Err(CompileError::InvalidComparator {
                flag: key.to_owned(),
                rule: index,
                description: rule.describe(),
                comparator: rule.comparator.to_string(),
            });
        }
        if rule.attribute.is_empty() {
            return Err(CompileError::EmptyAttribute {
                flag: key.to_owned(),
                rule: index,
                description: rule.describe(),
            });
        }
        if rule.comparison_value.is_empty() {
            return Err(CompileError::EmptyComparisonValue {
                flag: key.to_owned(),
                rule: index,
                description: rule.describe(),
            });
        }
        let served = match encode(&rule.value) {
            Some(v) if v.setting_type() == setting_type => v,
            _ => {
                return Err(CompileError::ServedTypeMismatch {
                    flag: key.to_owned(),
                    rule: index,
                    description: rule.describe(),
                    expected: setting_type,
                    found: kind_name(&rule.value).to_owned(),
                })
            }
        };

        let condition =
            build_user_condition(&rule.attribute, &rule.comparator, &rule.comparison_value)
                .map_err(|e| CompileError::InvalidComparator {
                    flag: key.to_owned(),
                    rule: index,
                    description: rule.describe(),
                    comparator: e.0,
                })?;

        rules.push(CompiledRule {
            condition,
            comparison_text: rule.comparison_value.clone(),
            served,
            variation_id: rule_variation_id(index, key),
        });
    }

    Ok(CompiledFlag {
        key: key.to_owned(),
        setting_type,
        default,
        variation_id: default_variation_id(key),
        rules,
    })
}

/// Validate one flag and lower it to the current wire form.
pub fn compile_flag(key: &str, flag: &Flag) -> Result<Setting, CompileError> {
    validate_flag(key, flag).map(|compiled| current::lower_setting(&compiled))
}

/// Validate a whole flag set in key order, stopping at the first error.
pub fn compile_flags(flags: &FlagSet) -> Result<Vec<CompiledFlag>, CompileError> {
    flags
        .iter()
        .map(|(key, flag)| validate_flag(key, flag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::{Rule, RuleComparator};
    use flagpress_model::{ComparisonValue, Condition, RuleOutcome, ServedValue, TargetingRule};
    use serde_json::json;
    use std::collections::HashSet;

    fn served(rule: &TargetingRule) -> &ServedValue {
        match &rule.outcome {
            RuleOutcome::Served(sv) => sv,
            other => panic!("expected a served value, got {:?}", other),
        }
    }

    fn rule(attr: &str, text: &str, value: serde_json::Value) -> Rule {
        Rule::new(attr, Comparator::IsOneOf, text, value)
    }

    #[test]
    fn compiles_each_kind() {
        for (default, expected) in [
            (json!(true), SettingType::Bool),
            (json!("red"), SettingType::String),
            (json!(12), SettingType::Int),
            (json!(1.25), SettingType::Float),
        ] {
            let setting = compile_flag("f", &Flag::new(default.clone())).unwrap();
            assert_eq!(setting.setting_type, expected);
            assert_eq!(setting.value.to_json(), default);
            assert_eq!(setting.variation_id, "v_f");
            assert!(setting.targeting_rules.is_empty());
        }
    }

    #[test]
    fn invalid_default_names_flag() {
        let err = compile_flag("broken", &Flag::new(json!([1]))).unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidDefaultType {
                flag: "broken".into(),
                found: "array".into()
            }
        );
        assert_eq!(err.flag_key(), "broken");
        assert_eq!(err.rule_index(), None);
        assert_eq!(err.field(), "default");
    }

    #[test]
    fn rules_keep_authoring_order() {
        let flag = Flag::new("none")
            .with_rule(rule("A", "1", json!("first")))
            .with_rule(rule("B", "2", json!("second")))
            .with_rule(rule("C", "3", json!("third")));
        let setting = compile_flag("order", &flag).unwrap();

        let attrs: Vec<&str> = setting
            .targeting_rules
            .iter()
            .map(|r| match &r.conditions[..] {
                [Condition::User(u)] => u.comparison_attribute.as_str(),
                other => panic!("expected one user condition, got {:?}", other),
            })
            .collect();
        assert_eq!(attrs, ["A", "B", "C"]);

        let served: Vec<serde_json::Value> = setting
            .targeting_rules
            .iter()
            .map(|r| served(r).value.to_json())
            .collect();
        assert_eq!(served, [json!("first"), json!("second"), json!("third")]);
    }

    #[test]
    fn variation_ids_are_unique() {
        let mut flag = Flag::new(0);
        for i in 0..12 {
            flag = flag.with_rule(rule("Id", &i.to_string(), json!(i)));
        }
        let setting = compile_flag("k", &flag).unwrap();

        let mut ids = HashSet::new();
        assert!(ids.insert(setting.variation_id.clone()));
        for r in &setting.targeting_rules {
            let sv = served(r);
            assert!(ids.insert(sv.variation_id.clone()), "duplicate {}", sv.variation_id);
        }
        assert_eq!(ids.len(), 13);
        assert!(ids.contains("v11_k"));
    }

    #[test]
    fn variation_ids_are_stable_across_recompiles() {
        let flag = Flag::new(true).with_rule(rule("A", "x", json!(false)));
        assert_eq!(compile_flag("s", &flag).unwrap(), compile_flag("s", &flag).unwrap());
    }

    #[test]
    fn rule_becomes_single_condition_group() {
        let flag = Flag::new(false).with_rule(Rule::new(
            "Country",
            Comparator::IsOneOf,
            "HU,NL",
            true,
        ));
        let setting = compile_flag("c", &flag).unwrap();
        let rule = &setting.targeting_rules[0];
        assert_eq!(rule.conditions.len(), 1);
        match (&rule.conditions[0], &rule.outcome) {
            (Condition::User(u), RuleOutcome::Served(sv)) => {
                assert_eq!(
                    u.value,
                    Some(ComparisonValue::List(vec!["HU".into(), "NL".into()]))
                );
                assert_eq!(sv.value, SettingValue::Bool(true));
                assert_eq!(sv.variation_id, "v0_c");
            }
            other => panic!("unexpected rule shape {:?}", other),
        }
    }

    #[test]
    fn served_type_mismatch_names_rule() {
        let flag = Flag::new(true)
            .with_rule(rule("A", "a", json!(false)))
            .with_rule(rule("B", "b", json!("yes")));
        let err = compile_flag("mix", &flag).unwrap_err();
        assert_eq!(err.rule_index(), Some(1));
        assert_eq!(err.field(), "value");
        let msg = err.to_string();
        assert!(msg.contains("mix"), "{}", msg);
        assert!(msg.contains(r#""B""#), "{}", msg);
        assert!(msg.contains("need bool"), "{}", msg);
    }

    #[test]
    fn int_and_float_do_not_mix() {
        let flag = Flag::new(1).with_rule(rule("A", "a", json!(1.5)));
        assert!(matches!(
            compile_flag("n", &flag),
            Err(CompileError::ServedTypeMismatch { .. })
        ));
    }

    #[test]
    fn invalid_comparator_fails() {
        let flag = Flag::new(true).with_rule(Rule::new("A", RuleComparator::Code(77), "a", false));
        let err = compile_flag("cmp", &flag).unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidComparator { ref comparator, rule: 0, .. } if comparator == "77"
        ));
    }

    #[test]
    fn empty_attribute_fails() {
        let flag = Flag::new(true).with_rule(rule("", "a", json!(false)));
        assert!(matches!(
            compile_flag("e", &flag),
            Err(CompileError::EmptyAttribute { rule: 0, .. })
        ));
    }

    #[test]
    fn empty_comparison_value_fails() {
        let flag = Flag::new(true).with_rule(rule("A", "", json!(false)));
        assert!(matches!(
            compile_flag("e", &flag),
            Err(CompileError::EmptyComparisonValue { rule: 0, .. })
        ));
    }

    #[test]
    fn first_violation_wins() {
        // Rule 0 has both an empty attribute and a bad comparator; the
        // comparator is checked first.
        let flag = Flag::new(true)
            .with_rule(Rule::new("", RuleComparator::Code(-1), "", false))
            .with_rule(rule("", "x", json!(false)));
        assert!(matches!(
            compile_flag("e", &flag),
            Err(CompileError::InvalidComparator { rule: 0, .. })
        ));
    }

    #[test]
    fn compile_flags_reports_first_bad_flag_in_key_order() {
        let mut flags = FlagSet::new();
        flags.insert("b_bad".into(), Flag::new(json!(null)));
        flags.insert("a_good".into(), Flag::new(true));
        flags.insert("c_bad".into(), Flag::new(json!({})));
        let err = compile_flags(&flags).unwrap_err();
        assert_eq!(err.flag_key(), "b_bad");
    }

    #[test]
    fn compiled_rule_keeps_authored_text() {
        let flag = Flag::new(0).with_rule(Rule::new("Age", Comparator::LessNum, " 18 ", 1));
        let compiled = validate_flag("age", &flag).unwrap();
        assert_eq!(compiled.rules[0].comparison_text, " 18 ");
        assert_eq!(compiled.rules[0].comparator(), Comparator::LessNum);
        assert_eq!(
            compiled.rules[0].condition.value,
            Some(ComparisonValue::Number(18.0))
        );
    }
}
