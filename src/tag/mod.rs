//! Structured RFC 5646 language tags
//!
//! A [`LanguageTag`] holds the five components of a writing-system
//! identifier: language, script, region, an ordered list of variant subtags,
//! and an ordered list of private-use subtags. The canonical serialization is
//!
//! ```text
//! language[-script][-region][-variant...][-x-private...]
//! ```
//!
//! with every empty component omitted together with its separator. The
//! private-use block is always introduced by the literal `x` singleton.
//!
//! Only the *shape* of each subtag is checked (lengths and character
//! classes); whether a code is actually registered with IANA is a question
//! for the registry collaborator, not this type.
//!
//! # Examples
//!
//! ```
//! use writekit::tag::LanguageTag;
//!
//! let tag = LanguageTag::parse("en-Latn-US-1996").unwrap();
//! assert_eq!(tag.language(), "en");
//! assert_eq!(tag.script(), "Latn");
//! assert_eq!(tag.region(), "US");
//! assert!(tag.variant_contains("1996"));
//! assert_eq!(tag.canonical(), "en-Latn-US-1996");
//! ```

pub mod codec;

use crate::error::TagError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structured language tag with ordered variant and private-use lists
///
/// Membership on the two subtag lists is tested case-insensitively while the
/// stored spelling (and insertion order) is preserved. The empty tag is
/// valid and serializes to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTag {
  language: String,
  script: String,
  region: String,
  variants: Vec<String>,
  private_use: Vec<String>,
}

/// Parser position while walking the subtags after the language component.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Position {
  Script,
  Region,
  Variant,
}

impl LanguageTag {
  /// Creates an empty tag
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a tag from explicit components, validating each subtag's shape
  ///
  /// Empty strings are allowed for `script` and `region` (and an empty
  /// `language` for purely private-use tags). Variant and private-use
  /// entries must each be a single subtag.
  ///
  /// # Errors
  ///
  /// Returns [`TagError::MalformedTag`] naming the first component whose
  /// shape does not fit the grammar.
  pub fn from_parts(
    language: &str,
    script: &str,
    region: &str,
    variants: &[&str],
    private_use: &[&str],
  ) -> Result<Self, TagError> {
    let mut tag = Self::new();
    if !language.is_empty() {
      if !is_language_subtag(language) {
        return Err(malformed("language", language));
      }
      tag.language = language.to_string();
    }
    if !script.is_empty() {
      if !is_script_subtag(script) {
        return Err(malformed("script", script));
      }
      tag.script = script.to_string();
    }
    if !region.is_empty() {
      if !is_region_subtag(region) {
        return Err(malformed("region", region));
      }
      tag.region = region.to_string();
    }
    for v in variants {
      if !is_variant_subtag(v) {
        return Err(malformed("variant", v));
      }
      tag.add_to_variant(v);
    }
    for p in private_use {
      let bare = strip_private_marker(p);
      if !is_private_use_subtag(bare) {
        return Err(malformed("private-use", p));
      }
      tag.add_to_private_use(bare);
    }
    Ok(tag)
  }

  /// Parses a tag string into components
  ///
  /// The empty string parses to the empty tag. Subtag boundaries are `-`;
  /// a leading `x` subtag switches directly to the private-use block, so
  /// tags like `x-mine` (no language) are accepted.
  ///
  /// # Examples
  ///
  /// ```
  /// use writekit::tag::LanguageTag;
  ///
  /// let tag = LanguageTag::parse("th-Thai").unwrap();
  /// assert_eq!(tag.script(), "Thai");
  ///
  /// assert!(LanguageTag::parse("1abc").is_err());
  /// ```
  ///
  /// # Errors
  ///
  /// Returns [`TagError::MalformedTag`] naming the component at which the
  /// decomposition got stuck.
  pub fn parse(text: &str) -> Result<Self, TagError> {
    let mut tag = Self::new();
    if text.is_empty() {
      return Ok(tag);
    }

    let mut parts = text.split('-');
    let first = parts.next().unwrap_or_default();
    let mut in_private = false;
    if first.eq_ignore_ascii_case("x") {
      in_private = true;
    } else if is_language_subtag(first) {
      tag.language = first.to_string();
    } else {
      return Err(malformed("language", text));
    }

    let mut position = Position::Script;
    for part in parts {
      if in_private {
        if !is_private_use_subtag(part) {
          return Err(malformed("private-use", text));
        }
        tag.private_use.push(part.to_string());
        continue;
      }
      if part.eq_ignore_ascii_case("x") {
        in_private = true;
        continue;
      }
      if position <= Position::Script && is_script_subtag(part) {
        tag.script = part.to_string();
        position = Position::Region;
        continue;
      }
      if position <= Position::Region && is_region_subtag(part) {
        tag.region = part.to_string();
        position = Position::Variant;
        continue;
      }
      if is_variant_subtag(part) {
        tag.variants.push(part.to_string());
        position = Position::Variant;
        continue;
      }
      return Err(malformed(position.component(), text));
    }

    if in_private && tag.private_use.is_empty() {
      return Err(malformed("private-use", text));
    }
    Ok(tag)
  }

  pub fn language(&self) -> &str {
    &self.language
  }

  pub fn script(&self) -> &str {
    &self.script
  }

  pub fn region(&self) -> &str {
    &self.region
  }

  /// Variant subtags in insertion order.
  pub fn variants(&self) -> &[String] {
    &self.variants
  }

  /// Private-use subtags in insertion order, stored without the `x-` marker.
  pub fn private_use(&self) -> &[String] {
    &self.private_use
  }

  pub fn set_language(&mut self, language: &str) {
    self.language = language.to_string();
  }

  pub fn set_script(&mut self, script: &str) {
    self.script = script.to_string();
  }

  pub fn set_region(&mut self, region: &str) {
    self.region = region.to_string();
  }

  /// Appends a variant subtag unless an entry already matches
  /// case-insensitively. Idempotent.
  pub fn add_to_variant(&mut self, subtag: &str) {
    if !self.variant_contains(subtag) {
      self.variants.push(subtag.to_string());
    }
  }

  /// Removes the case-insensitive match from the variant list; no-op when
  /// absent.
  pub fn remove_from_variant(&mut self, subtag: &str) {
    self.variants.retain(|v| !v.eq_ignore_ascii_case(subtag));
  }

  /// Case-insensitive membership test on the variant list.
  pub fn variant_contains(&self, subtag: &str) -> bool {
    self.variants.iter().any(|v| v.eq_ignore_ascii_case(subtag))
  }

  /// Appends a private-use subtag unless already present. A leading `x-`
  /// marker on the argument is stripped first, so `x-audio` and `audio`
  /// are the same entry.
  pub fn add_to_private_use(&mut self, subtag: &str) {
    let bare = strip_private_marker(subtag);
    if !self.private_use_contains(bare) {
      self.private_use.push(bare.to_string());
    }
  }

  /// Removes the case-insensitive match from the private-use list; no-op
  /// when absent. Accepts the `x-` marker like [`add_to_private_use`].
  ///
  /// [`add_to_private_use`]: LanguageTag::add_to_private_use
  pub fn remove_from_private_use(&mut self, subtag: &str) {
    let bare = strip_private_marker(subtag);
    self
      .private_use
      .retain(|p| !p.eq_ignore_ascii_case(bare));
  }

  /// Case-insensitive membership test on the private-use list.
  pub fn private_use_contains(&self, subtag: &str) -> bool {
    let bare = strip_private_marker(subtag);
    self
      .private_use
      .iter()
      .any(|p| p.eq_ignore_ascii_case(bare))
  }

  /// Combined variant + private-use string using the `-x-` convention,
  /// e.g. `fonipa-x-etic`. Empty when both lists are empty.
  pub fn variant_string(&self) -> String {
    codec::join(&self.variants.join("-"), &self.private_use.join("-"))
  }

  /// Deterministic canonical serialization
  ///
  /// Same components always yield the same string; this is the basis of a
  /// writing system's identity.
  pub fn canonical(&self) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if !self.language.is_empty() {
      parts.push(&self.language);
    }
    if !self.script.is_empty() {
      parts.push(&self.script);
    }
    if !self.region.is_empty() {
      parts.push(&self.region);
    }
    for v in &self.variants {
      parts.push(v);
    }
    if !self.private_use.is_empty() {
      parts.push("x");
      for p in &self.private_use {
        parts.push(p);
      }
    }
    parts.join("-")
  }
}

impl fmt::Display for LanguageTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.canonical())
  }
}

impl Position {
  fn component(self) -> &'static str {
    match self {
      Position::Script => "script",
      Position::Region => "region",
      Position::Variant => "variant",
    }
  }
}

fn malformed(component: &'static str, text: &str) -> TagError {
  TagError::MalformedTag {
    component,
    text: text.to_string(),
  }
}

fn strip_private_marker(subtag: &str) -> &str {
  match subtag.as_bytes() {
    [b'x' | b'X', b'-', ..] => &subtag[2..],
    _ => subtag,
  }
}

fn is_alpha(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_digits(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_alnum(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn is_language_subtag(s: &str) -> bool {
  s.len() <= 8 && is_alpha(s) && !s.eq_ignore_ascii_case("x")
}

fn is_script_subtag(s: &str) -> bool {
  s.len() == 4 && is_alpha(s)
}

fn is_region_subtag(s: &str) -> bool {
  (s.len() == 2 && is_alpha(s)) || (s.len() == 3 && is_digits(s))
}

/// 5-8 alphanumerics, or exactly 4 starting with a digit (e.g. `1996`).
fn is_variant_subtag(s: &str) -> bool {
  match s.len() {
    5..=8 => is_alnum(s),
    4 => s.starts_with(|c: char| c.is_ascii_digit()) && is_alnum(s),
    _ => false,
  }
}

fn is_private_use_subtag(s: &str) -> bool {
  s.len() <= 8 && is_alnum(s)
}
