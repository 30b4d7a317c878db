//! flagpress-core: rule compiler and document registry.
//!
//! Turns human-authored flag definitions into configuration documents and
//! keeps the current document for each distribution key.
//!
//! # Public API
//!
//! - [`compile_flag()`] -- validate and lower one [`Flag`] to a [`Setting`]
//! - [`validate_flag()`] / [`compile_flags()`] -- produce the validated
//!   intermediate [`CompiledFlag`] shared by both wire formats
//! - [`lower`] -- the [`Current`] and [`Legacy`] document formats
//! - [`Registry`] -- per-key document store with atomic replace-on-publish
//! - [`classify()`] / [`encode()`] -- value kind detection and tagging
//!
//! [`Setting`]: flagpress_model::Setting

pub mod classify;
pub mod compile;
pub mod condition;
pub mod error;
pub mod fingerprint;
pub mod flag;
pub mod lower;
pub mod registry;

// ── Convenience re-exports ───────────────────────────────────────────

pub use classify::{classify, encode};
pub use compile::{compile_flag, compile_flags, validate_flag, CompiledFlag, CompiledRule};
pub use condition::build_user_condition;
pub use error::{CompileError, LowerError, PublishError};
pub use fingerprint::fingerprint;
pub use flag::{Flag, FlagSet, Rule, RuleComparator};
pub use lower::{render, Current, DocumentFormat, Legacy, RenderedDocument};
pub use registry::{Lookup, PublishedConfig, Registry};
