//! Error types for writekit
//!
//! This module provides error types for all subsystems:
//! - Tag errors (language-tag parsing and component validation)
//! - Invariant errors (cross-field rules between script, variant, and
//!   private-use subtags)
//! - Collation errors (rule compilation, locale-based collator construction)
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations. Collation rule *validation* is a
//! value (`RuleValidation`), not an error: failing validation is expected
//! during interactive editing.

use thiserror::Error;

/// Result type alias for writekit operations
///
/// This is a convenience type that uses our Error type as the error variant.
///
/// # Examples
///
/// ```
/// use writekit::Result;
///
/// fn rename(label: &str) -> Result<()> {
///     let _ = label;
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for writekit
///
/// Each variant wraps a more specific error type for that subsystem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
  /// Language-tag parsing or component validation error
  #[error("Tag error: {0}")]
  Tag(#[from] TagError),

  /// Cross-field invariant violation on a writing-system tag
  #[error("Invariant error: {0}")]
  Invariant(#[from] InvariantError),

  /// Collator construction error
  #[error("Collation error: {0}")]
  Collation(#[from] CollationError),

  /// A numeric argument outside its valid range
  #[error("Value {value} is out of range for {what}")]
  ArgumentRange { what: &'static str, value: f32 },
}

/// Errors produced while decomposing a tag string or validating components
///
/// These indicate that the input does not fit the
/// `language[-script][-region][-variant...][-x-private...]` grammar. No
/// registry lookup happens here; only the structural shape of each subtag
/// is checked.
///
/// # Examples
///
/// ```
/// use writekit::error::TagError;
///
/// let error = TagError::MalformedTag {
///     component: "script",
///     text: "en-Latin-US".to_string(),
/// };
/// assert!(error.to_string().contains("script"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
  /// The text cannot be decomposed per the tag grammar
  #[error("Malformed {component} component in language tag '{text}'")]
  MalformedTag {
    component: &'static str,
    text: String,
  },
}

/// Violations of the script/variant/private-use rules
///
/// Raised by the invariant check after mutations, and only while the
/// definition has `requires_valid_tag` enabled. Each variant carries the
/// canonical tag string at the time of the check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
  /// `x-audio` requires the script to be `Zxxx`
  #[error("private-use contains 'audio' but script is '{script}', not 'Zxxx' (tag: {tag})")]
  AudioWithoutAudioScript { script: String, tag: String },

  /// Voice and IPA marking are mutually exclusive
  #[error("voice marker and IPA markers cannot coexist (tag: {tag})")]
  AudioWithIpaMarkers { tag: String },

  /// `x-etic`/`x-emic` refine `fonipa` and cannot appear without it
  #[error("private-use contains 'etic' or 'emic' without 'fonipa' in the variant list (tag: {tag})")]
  PhoneticMarkerWithoutFonipa { tag: String },
}

/// Errors while constructing a collator
///
/// Returned by the rule-engine and locale collaborators when rule text or a
/// locale identifier cannot be turned into a comparator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollationError {
  /// Rule text rejected by the rule engine
  #[error("invalid collation rules: {message}")]
  Rules { message: String },

  /// Locale identifier rejected by the locale collator factory
  #[error("cannot build collator for locale '{locale}': {message}")]
  Locale { locale: String, message: String },
}
