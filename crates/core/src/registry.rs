//! Per-distribution-key document store.
//!
//! Each key holds at most one [`PublishedConfig`]: the serialized documents
//! from the latest successful publish. A publish compiles and renders
//! outside the lock, then swaps one `Arc` under the write lock, so a
//! concurrent [`Registry::lookup`] sees either the old documents or the new
//! ones, never a mix.

use std::collections::HashMap;
use std::sync::Arc;

use flagpress_model::{Preferences, CURRENT_DOCUMENT_NAME, LEGACY_DOCUMENT_NAME};
use parking_lot::RwLock;

use crate::compile::compile_flags;
use crate::error::PublishError;
use crate::flag::FlagSet;
use crate::lower::{render, Current, DocumentFormat, Legacy, RenderedDocument};

/// The documents produced by one successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedConfig {
    pub current: RenderedDocument,
    /// Absent when some rule uses a comparator the legacy schema lacks.
    pub legacy: Option<RenderedDocument>,
    pub flag_count: usize,
}

impl PublishedConfig {
    /// Look up a document by the file name it is served under.
    pub fn document(&self, name: &str) -> Option<&RenderedDocument> {
        match name {
            CURRENT_DOCUMENT_NAME => Some(&self.current),
            LEGACY_DOCUMENT_NAME => self.legacy.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Slot {
    /// Known key with nothing published yet.
    Reserved,
    Published(Arc<PublishedConfig>),
}

/// Result of [`Registry::lookup`].
#[derive(Debug, Clone)]
pub enum Lookup {
    /// The key is unknown.
    Missing,
    /// The key was reserved but never published.
    Reserved,
    Published(Arc<PublishedConfig>),
}

/// In-memory document store. Cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<HashMap<String, Slot>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `key` known without publishing anything under it. Lookups then
    /// report [`Lookup::Reserved`] until the first publish. Reserving an
    /// already known key is a no-op.
    pub fn reserve(&self, key: &str) -> Result<(), PublishError> {
        if key.is_empty() {
            return Err(PublishError::EmptyDistributionKey);
        }
        self.entries
            .write()
            .entry(key.to_owned())
            .or_insert(Slot::Reserved);
        Ok(())
    }

    /// Compile `flags` and replace whatever is published under `key`.
    ///
    /// All-or-nothing: if any flag fails to compile the registry is left
    /// untouched. Returns the fingerprint of the new current document.
    pub fn publish(&self, key: &str, flags: &FlagSet) -> Result<String, PublishError> {
        self.publish_with(key, flags, None)
    }

    /// [`publish`](Self::publish) with document-level preferences.
    pub fn publish_with(
        &self,
        key: &str,
        flags: &FlagSet,
        preferences: Option<Preferences>,
    ) -> Result<String, PublishError> {
        if key.is_empty() {
            return Err(PublishError::EmptyDistributionKey);
        }

        let compiled = compile_flags(flags)?;
        let current = render::<Current>(&compiled, preferences.as_ref())?;
        let legacy = match render::<Legacy>(&compiled, preferences.as_ref()) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(key, error = %e, "{} not published", Legacy::NAME);
                None
            }
        };

        let etag = current.etag.clone();
        let published = Arc::new(PublishedConfig {
            current,
            legacy,
            flag_count: compiled.len(),
        });
        let flag_count = published.flag_count;

        self.entries
            .write()
            .insert(key.to_owned(), Slot::Published(published));

        tracing::info!(key, flags = flag_count, etag = %etag, "published configuration");
        Ok(etag)
    }

    pub fn lookup(&self, key: &str) -> Lookup {
        match self.entries.read().get(key) {
            None => Lookup::Missing,
            Some(Slot::Reserved) => Lookup::Reserved,
            Some(Slot::Published(config)) => Lookup::Published(Arc::clone(config)),
        }
    }

    /// All known keys, reserved or published, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
