//! Lowering: [`CompiledFlag`]s to a serialized wire document.
//!
//! Each wire format is a [`DocumentFormat`]. Formats only translate; every
//! check on authored input has already happened in
//! [`validate_flag`](crate::validate_flag). Adding a format means adding an
//! implementation here and touching nothing in `compile`.

pub mod current;
pub mod legacy;

use flagpress_model::{
    legacy::LegacyDocument, ConfigurationDocument, Preferences, CURRENT_DOCUMENT_NAME,
    LEGACY_DOCUMENT_NAME,
};
use serde::Serialize;

use crate::compile::CompiledFlag;
use crate::error::{LowerError, PublishError};
use crate::fingerprint::fingerprint;

/// A wire format that compiled flags can be lowered to.
pub trait DocumentFormat {
    /// File name the document is served under.
    const NAME: &'static str;

    type Document: Serialize;

    fn lower(
        flags: &[CompiledFlag],
        preferences: Option<&Preferences>,
    ) -> Result<Self::Document, LowerError>;
}

/// The condition-tree schema (`config_v6.json`).
pub struct Current;

impl DocumentFormat for Current {
    const NAME: &'static str = CURRENT_DOCUMENT_NAME;
    type Document = ConfigurationDocument;

    fn lower(
        flags: &[CompiledFlag],
        preferences: Option<&Preferences>,
    ) -> Result<ConfigurationDocument, LowerError> {
        Ok(current::lower_document(flags, preferences))
    }
}

/// The flat rollout-rule schema (`config_v5.json`).
pub struct Legacy;

impl DocumentFormat for Legacy {
    const NAME: &'static str = LEGACY_DOCUMENT_NAME;
    type Document = LegacyDocument;

    fn lower(
        flags: &[CompiledFlag],
        preferences: Option<&Preferences>,
    ) -> Result<LegacyDocument, LowerError> {
        legacy::lower_document(flags, preferences)
    }
}

/// Canonical bytes of a document and their fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub etag: String,
}

/// Lower, serialize (compact JSON) and fingerprint in one step.
pub fn render<F: DocumentFormat>(
    flags: &[CompiledFlag],
    preferences: Option<&Preferences>,
) -> Result<RenderedDocument, PublishError> {
    let document = F::lower(flags, preferences)?;
    let bytes = serde_json::to_vec(&document)?;
    let etag = fingerprint(&bytes);
    Ok(RenderedDocument { bytes, etag })
}
