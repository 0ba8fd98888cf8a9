//! writekit models writing-system identifiers: structured RFC 5646 language
//! tags with derived IPA/voice marking, cross-field invariants, and a
//! pluggable string-collation strategy.
//!
//! The aggregate type is [`WritingSystemDefinition`]; it owns one
//! [`LanguageTag`] and keeps derived flags, invariants, and its canonical
//! identity string in lock-step with every tag mutation. Collation engines
//! and the subtag registry are collaborators behind traits, with built-in
//! stand-alone implementations.
//!
//! # Examples
//!
//! ```
//! use writekit::WritingSystemDefinition;
//!
//! let ws = WritingSystemDefinition::from_parts("en", "Latn", "US", "1996").unwrap();
//! assert_eq!(ws.id(), "en-Latn-US-1996");
//!
//! let mut voice = WritingSystemDefinition::from_tag("en").unwrap();
//! voice.set_is_voice(true).unwrap();
//! assert_eq!(voice.id(), "en-Zxxx-x-audio");
//! ```

pub mod collation;
pub mod definition;
pub mod error;
pub mod registry;
pub mod tag;

pub use collation::{
  CollationEngines, CollationStrategy, Collator, LocaleCollatorFactory, RuleCollatorEngine,
  RuleValidation,
};
pub use definition::{IpaStatus, WritingSystemDefinition, UNLISTED_LANGUAGE};
pub use error::{CollationError, Error, InvariantError, Result, TagError};
pub use registry::{BuiltinRegistry, EnglishMessages, LabelMessages, SubtagRegistry};
pub use tag::LanguageTag;
