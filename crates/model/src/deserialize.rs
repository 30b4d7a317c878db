//! Parsing serialized documents back into typed structs.
//!
//! Used by tooling (`flagpress validate`) and by tests that check what an
//! evaluator would see on the wire.

use crate::types::{ConfigurationDocument, RuleOutcome};
use std::fmt;

/// Errors while reading a current-schema document.
#[derive(Debug)]
pub enum DocumentError {
    /// The bytes are not a well-formed document.
    Malformed(serde_json::Error),
    /// A setting's served values disagree with its declared type.
    TypeMismatch { flag_key: String, message: String },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Malformed(e) => write!(f, "malformed document: {}", e),
            DocumentError::TypeMismatch { flag_key, message } => {
                write!(f, "setting '{}': {}", flag_key, message)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// Parse a current-schema document and check that every served value in
/// each setting has the setting's declared type.
pub fn parse_document(bytes: &[u8]) -> Result<ConfigurationDocument, DocumentError> {
    let doc: ConfigurationDocument =
        serde_json::from_slice(bytes).map_err(DocumentError::Malformed)?;

    for (key, setting) in &doc.settings {
        if setting.value.setting_type() != setting.setting_type {
            return Err(DocumentError::TypeMismatch {
                flag_key: key.clone(),
                message: format!(
                    "default value is {} but type is {}",
                    setting.value.setting_type(),
                    setting.setting_type
                ),
            });
        }
        for (i, rule) in setting.targeting_rules.iter().enumerate() {
            let served_types: Vec<_> = match &rule.outcome {
                RuleOutcome::Served(sv) => vec![sv.value.setting_type()],
                RuleOutcome::Percentage(opts) => {
                    opts.iter().map(|o| o.value.setting_type()).collect()
                }
            };
            if let Some(bad) = served_types.iter().find(|t| **t != setting.setting_type) {
                return Err(DocumentError::TypeMismatch {
                    flag_key: key.clone(),
                    message: format!(
                        "rule {} serves {} but type is {}",
                        i, bad, setting.setting_type
                    ),
                });
            }
        }
    }

    Ok(doc)
}
