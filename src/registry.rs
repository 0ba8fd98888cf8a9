//! Registry and localization collaborators
//!
//! The core never validates subtags against the full IANA registry; it only
//! asks a [`SubtagRegistry`] for display names when building labels. A small
//! built-in table covers the codes exercised by tests and demos, and a real
//! registry-backed implementation can be swapped in behind the same trait.
//!
//! Label text that needs localization ("Unlisted Language", "Unknown
//! Language") comes from a [`LabelMessages`] provider threaded in by the
//! caller, never from a process-wide constant.

/// Read-only lookup of standard subtag display names
///
/// Absence of a match is not an error; label builders fall back to the
/// stored name or to the message provider's "Unknown Language" text.
pub trait SubtagRegistry: Send + Sync {
  /// Display name for an ISO 639 language code, if known.
  fn language_name(&self, code: &str) -> Option<String>;

  /// Known ISO 639 codes.
  fn iso639_codes(&self) -> Vec<String>;

  /// Known ISO 15924 script codes.
  fn scripts(&self) -> Vec<String>;
}

/// Human-readable label text for special language states
pub trait LabelMessages: Send + Sync {
  /// Label used when the language is the unlisted-language sentinel (`qaa`).
  fn unlisted_language(&self) -> String;

  /// Label used when no display name can be resolved at all.
  fn unknown_language(&self) -> String;
}

const BUILTIN_LANGUAGES: &[(&str, &str)] = &[
  ("ar", "Arabic"),
  ("de", "German"),
  ("el", "Greek"),
  ("en", "English"),
  ("es", "Spanish"),
  ("fr", "French"),
  ("he", "Hebrew"),
  ("ja", "Japanese"),
  ("ko", "Korean"),
  ("ru", "Russian"),
  ("th", "Thai"),
  ("zh", "Chinese"),
];

const BUILTIN_SCRIPTS: &[&str] = &[
  "Arab", "Cyrl", "Deva", "Grek", "Hani", "Hebr", "Latn", "Thai", "Zxxx",
];

/// Built-in registry with a small static table of common codes
///
/// Deliberately tiny: enough for labels in tests and stand-alone use. A
/// full IANA-backed registry belongs to an external collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRegistry;

impl SubtagRegistry for BuiltinRegistry {
  fn language_name(&self, code: &str) -> Option<String> {
    BUILTIN_LANGUAGES
      .iter()
      .find(|(c, _)| c.eq_ignore_ascii_case(code))
      .map(|(_, name)| (*name).to_string())
  }

  fn iso639_codes(&self) -> Vec<String> {
    BUILTIN_LANGUAGES
      .iter()
      .map(|(c, _)| (*c).to_string())
      .collect()
  }

  fn scripts(&self) -> Vec<String> {
    BUILTIN_SCRIPTS.iter().map(|s| (*s).to_string()).collect()
  }
}

/// English message provider
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishMessages;

impl LabelMessages for EnglishMessages {
  fn unlisted_language(&self) -> String {
    "Unlisted Language".to_string()
  }

  fn unknown_language(&self) -> String {
    "Unknown Language".to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_registry_lookup_is_case_insensitive() {
    let registry = BuiltinRegistry;
    assert_eq!(registry.language_name("EN"), Some("English".to_string()));
    assert_eq!(registry.language_name("xyz"), None);
  }

  #[test]
  fn builtin_registry_lists_codes_and_scripts() {
    let registry = BuiltinRegistry;
    assert!(registry.iso639_codes().contains(&"th".to_string()));
    assert!(registry.scripts().contains(&"Zxxx".to_string()));
  }
}
