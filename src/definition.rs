//! The writing-system aggregate
//!
//! A [`WritingSystemDefinition`] owns exactly one [`LanguageTag`] and keeps
//! three things in lock-step with it after every mutation:
//!
//! - the derived semantic flags ([`IpaStatus`] and voice marking),
//! - the cross-field invariants between script, variant, and private-use
//!   subtags (enforced only while `requires_valid_tag` is on),
//! - the canonical identity string `id`.
//!
//! Mutating setters stage their edits on a copy of the tag, run the
//! invariant check against the staged copy, and commit only on success, so
//! a failed mutation never leaves the definition half-edited.
//!
//! Collation selection lives here too: the current strategy plus its rules
//! payload, and a lazily built collator that is invalidated exactly when
//! either of them changes (never on unrelated tag mutations).
//!
//! # Examples
//!
//! ```
//! use writekit::{IpaStatus, WritingSystemDefinition};
//!
//! let mut ws = WritingSystemDefinition::from_tag("en-Latn-US").unwrap();
//! ws.set_ipa_status(IpaStatus::IpaPhonemic).unwrap();
//! assert_eq!(ws.id(), "en-Latn-US-fonipa-x-emic");
//! ```

use crate::collation::{
  CodepointCollator, CollationEngines, CollationStrategy, Collator, RuleValidation,
};
use crate::error::{CollationError, Error, InvariantError, Result};
use crate::registry::{LabelMessages, SubtagRegistry};
use crate::tag::{codec, LanguageTag};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Reserved code for a language not listed in any registry.
pub const UNLISTED_LANGUAGE: &str = "qaa";

/// Script code marking audio (voice) writing systems.
const AUDIO_SCRIPT: &str = "Zxxx";

/// Private-use marker subtags (stored without the `x-` block prefix).
const AUDIO_MARKER: &str = "audio";
const PHONETIC_MARKER: &str = "etic";
const PHONEMIC_MARKER: &str = "emic";

/// Variant subtag marking IPA transcription.
const IPA_VARIANT: &str = "fonipa";

/// IPA marking derived from the tag, most specific first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpaStatus {
  #[default]
  NotIpa,
  /// `fonipa` variant alone.
  Ipa,
  /// `fonipa` plus private-use `etic`.
  IpaPhonetic,
  /// `fonipa` plus private-use `emic`.
  IpaPhonemic,
}

/// A writing system: one language tag plus metadata and collation selection
///
/// The `id` always equals the tag's canonical string after the most recent
/// mutation; ordinary mutation paths never assign it directly. Cloning
/// duplicates the owned tag and starts with an empty collator cache, so the
/// copy edits independently.
pub struct WritingSystemDefinition {
  tag: LanguageTag,
  id: String,

  language_name: String,
  abbreviation: String,
  native_name: String,
  default_font_name: String,
  default_font_size: f32,
  keyboard: String,
  spell_check_id: String,
  version_number: String,
  version_description: String,
  date_modified: String,

  modified: bool,
  marked_for_deletion: bool,
  requires_valid_tag: bool,

  sort_using: CollationStrategy,
  sort_rules: String,
  engines: Arc<CollationEngines>,
  collator: Option<Arc<dyn Collator>>,
}

impl WritingSystemDefinition {
  /// Creates a definition with an empty tag and the built-in collation
  /// engines. Invariant enforcement starts enabled.
  pub fn new() -> Self {
    Self::with_engines(Arc::new(CollationEngines::default()))
  }

  /// Creates an empty definition using the given engine set.
  pub fn with_engines(engines: Arc<CollationEngines>) -> Self {
    Self {
      tag: LanguageTag::new(),
      id: String::new(),
      language_name: String::new(),
      abbreviation: String::new(),
      native_name: String::new(),
      default_font_name: String::new(),
      default_font_size: 0.0,
      keyboard: String::new(),
      spell_check_id: String::new(),
      version_number: String::new(),
      version_description: String::new(),
      date_modified: String::new(),
      modified: false,
      marked_for_deletion: false,
      requires_valid_tag: true,
      sort_using: CollationStrategy::default(),
      sort_rules: String::new(),
      engines,
      collator: None,
    }
  }

  /// Creates a definition from a tag string
  ///
  /// # Errors
  ///
  /// Fails when the text does not decompose per the tag grammar or when the
  /// parsed tag violates the script/variant rules.
  pub fn from_tag(text: &str) -> Result<Self> {
    let mut ws = Self::new();
    ws.set_tag_from_string(text)?;
    ws.modified = false;
    Ok(ws)
  }

  /// Creates a definition from explicit components
  ///
  /// `combined_variant` carries both variant and private-use parts in the
  /// `-x-` convention (e.g. `fonipa-x-etic`).
  pub fn from_parts(
    language: &str,
    script: &str,
    region: &str,
    combined_variant: &str,
  ) -> Result<Self> {
    let mut ws = Self::new();
    ws.set_components(language, script, region, combined_variant)?;
    ws.modified = false;
    Ok(ws)
  }

  pub fn tag(&self) -> &LanguageTag {
    &self.tag
  }

  /// Canonical identity string, equal to the tag's canonical form.
  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn language(&self) -> &str {
    self.tag.language()
  }

  pub fn script(&self) -> &str {
    self.tag.script()
  }

  pub fn region(&self) -> &str {
    self.tag.region()
  }

  /// Combined variant + private-use string in the `-x-` convention.
  pub fn variant_string(&self) -> String {
    self.tag.variant_string()
  }

  /// Replaces the owned tag wholesale from a tag string.
  pub fn set_tag_from_string(&mut self, text: &str) -> Result<()> {
    let staged = LanguageTag::parse(text)?;
    self.commit_tag(staged)?;
    Ok(())
  }

  /// Replaces the owned tag wholesale from explicit components.
  pub fn set_components(
    &mut self,
    language: &str,
    script: &str,
    region: &str,
    combined_variant: &str,
  ) -> Result<()> {
    let (variant, private) = codec::split(combined_variant);
    let variants: Vec<&str> = variant.split('-').filter(|s| !s.is_empty()).collect();
    let privates: Vec<&str> = private.split('-').filter(|s| !s.is_empty()).collect();
    let staged = LanguageTag::from_parts(language, script, region, &variants, &privates)?;
    self.commit_tag(staged)?;
    Ok(())
  }

  /// Adds a variant subtag, re-deriving id and re-checking invariants.
  pub fn add_to_variant(&mut self, subtag: &str) -> Result<()> {
    let mut staged = self.tag.clone();
    staged.add_to_variant(subtag);
    self.commit_tag(staged)?;
    Ok(())
  }

  pub fn remove_from_variant(&mut self, subtag: &str) -> Result<()> {
    let mut staged = self.tag.clone();
    staged.remove_from_variant(subtag);
    self.commit_tag(staged)?;
    Ok(())
  }

  /// Adds a private-use subtag (`x-` marker accepted and stripped).
  pub fn add_to_private_use(&mut self, subtag: &str) -> Result<()> {
    let mut staged = self.tag.clone();
    staged.add_to_private_use(subtag);
    self.commit_tag(staged)?;
    Ok(())
  }

  pub fn remove_from_private_use(&mut self, subtag: &str) -> Result<()> {
    let mut staged = self.tag.clone();
    staged.remove_from_private_use(subtag);
    self.commit_tag(staged)?;
    Ok(())
  }

  /// IPA marking derived from the tag, most specific match first.
  pub fn ipa_status(&self) -> IpaStatus {
    let fonipa = self.tag.variant_contains(IPA_VARIANT);
    if fonipa && self.tag.private_use_contains(PHONEMIC_MARKER) {
      IpaStatus::IpaPhonemic
    } else if fonipa && self.tag.private_use_contains(PHONETIC_MARKER) {
      IpaStatus::IpaPhonetic
    } else if fonipa {
      IpaStatus::Ipa
    } else {
      IpaStatus::NotIpa
    }
  }

  /// Rewrites the IPA markers on the tag
  ///
  /// No-op when the status already matches. Clears any voice marker first:
  /// voice and IPA are mutually exclusive. An empty language is seeded with
  /// the unlisted-language sentinel so the markers have a host tag.
  pub fn set_ipa_status(&mut self, status: IpaStatus) -> Result<()> {
    if self.ipa_status() == status {
      return Ok(());
    }
    let mut staged = self.tag.clone();
    if staged.language().is_empty() {
      staged.set_language(UNLISTED_LANGUAGE);
    }
    staged.remove_from_private_use(AUDIO_MARKER);
    staged.remove_from_private_use(PHONETIC_MARKER);
    staged.remove_from_private_use(PHONEMIC_MARKER);
    staged.remove_from_variant(IPA_VARIANT);
    match status {
      IpaStatus::NotIpa => {}
      IpaStatus::Ipa => staged.add_to_variant(IPA_VARIANT),
      IpaStatus::IpaPhonetic => {
        staged.add_to_variant(IPA_VARIANT);
        staged.add_to_private_use(PHONETIC_MARKER);
      }
      IpaStatus::IpaPhonemic => {
        staged.add_to_variant(IPA_VARIANT);
        staged.add_to_private_use(PHONEMIC_MARKER);
      }
    }
    self.commit_tag(staged)?;
    Ok(())
  }

  /// True when the script is `Zxxx` and private-use carries `audio`.
  /// Both are required; either alone is not a voice writing system.
  pub fn is_voice(&self) -> bool {
    self.tag.script().eq_ignore_ascii_case(AUDIO_SCRIPT)
      && self.tag.private_use_contains(AUDIO_MARKER)
  }

  /// Marks or unmarks the definition as an audio (voice) writing system
  ///
  /// Turning voice on strips IPA markers, forces the script to `Zxxx`,
  /// adds the audio marker, and clears the keyboard. Turning it off clears
  /// the script and removes the marker.
  pub fn set_is_voice(&mut self, voice: bool) -> Result<()> {
    if self.is_voice() == voice {
      return Ok(());
    }
    let mut staged = self.tag.clone();
    if voice {
      staged.remove_from_variant(IPA_VARIANT);
      staged.remove_from_private_use(PHONETIC_MARKER);
      staged.remove_from_private_use(PHONEMIC_MARKER);
      if staged.language().is_empty() {
        staged.set_language(UNLISTED_LANGUAGE);
      }
      staged.set_script(AUDIO_SCRIPT);
      staged.add_to_private_use(AUDIO_MARKER);
    } else {
      staged.set_script("");
      staged.remove_from_private_use(AUDIO_MARKER);
    }
    self.commit_tag(staged)?;
    if voice {
      self.keyboard.clear();
    }
    Ok(())
  }

  /// Checks the cross-field rules between script, variant, and private-use
  ///
  /// Only enforced while `requires_valid_tag` is on; with it off, any
  /// intermediate state is accepted so staged multi-step edits can pass
  /// through invalid configurations.
  ///
  /// # Errors
  ///
  /// The first violated rule, in order: audio marker without the `Zxxx`
  /// script; audio marker alongside any IPA marker; `etic`/`emic` without
  /// `fonipa`.
  pub fn check_variant_and_script_rules(&self) -> std::result::Result<(), InvariantError> {
    self.check_tag(&self.tag)
  }

  fn check_tag(&self, tag: &LanguageTag) -> std::result::Result<(), InvariantError> {
    if !self.requires_valid_tag {
      return Ok(());
    }
    let audio = tag.private_use_contains(AUDIO_MARKER);
    let etic = tag.private_use_contains(PHONETIC_MARKER);
    let emic = tag.private_use_contains(PHONEMIC_MARKER);
    let fonipa = tag.variant_contains(IPA_VARIANT);
    if audio && !tag.script().eq_ignore_ascii_case(AUDIO_SCRIPT) {
      return Err(InvariantError::AudioWithoutAudioScript {
        script: tag.script().to_string(),
        tag: tag.canonical(),
      });
    }
    if audio && (fonipa || etic || emic) {
      return Err(InvariantError::AudioWithIpaMarkers {
        tag: tag.canonical(),
      });
    }
    if (etic || emic) && !fonipa {
      return Err(InvariantError::PhoneticMarkerWithoutFonipa {
        tag: tag.canonical(),
      });
    }
    Ok(())
  }

  /// Validates the staged tag, then commits it and re-derives the id.
  fn commit_tag(&mut self, staged: LanguageTag) -> std::result::Result<(), InvariantError> {
    self.check_tag(&staged)?;
    self.tag = staged;
    self.id = self.tag.canonical();
    self.modified = true;
    Ok(())
  }

  /// Deep-copies this definition with an id not present in `existing_ids`
  ///
  /// Collision testing is case-insensitive. Each attempt replaces the
  /// previous disambiguation token, yielding ids like `en-x-dupl0`,
  /// `en-x-dupl1`, … until one is free.
  pub fn create_copy_with_unique_id<S: AsRef<str>>(&self, existing_ids: &[S]) -> Self {
    let taken: FxHashSet<String> = existing_ids
      .iter()
      .map(|s| s.as_ref().to_ascii_lowercase())
      .collect();
    let mut copy = self.clone();
    let mut attempt = 0usize;
    while taken.contains(&copy.id.to_ascii_lowercase()) {
      if attempt > 0 {
        copy.tag.remove_from_private_use(&format!("dupl{}", attempt - 1));
      }
      copy.tag.add_to_private_use(&format!("dupl{attempt}"));
      copy.id = copy.tag.canonical();
      copy.modified = true;
      attempt += 1;
    }
    copy
  }

  /// Short label for title bars and pickers
  ///
  /// The canonical tag, unless the language is the unlisted sentinel (or
  /// there is no tag at all); then the abbreviation, the first four
  /// characters of the language name, or a `???` placeholder.
  pub fn display_label(&self) -> String {
    let canonical = self.tag.canonical();
    if !canonical.is_empty() && !self.tag.language().eq_ignore_ascii_case(UNLISTED_LANGUAGE) {
      return canonical;
    }
    if !self.abbreviation.is_empty() {
      return self.abbreviation.clone();
    }
    if !self.language_name.is_empty() {
      return self.language_name.chars().take(4).collect();
    }
    "???".to_string()
  }

  /// Language display name resolved through the registry
  ///
  /// The unlisted sentinel maps to the provider's "Unlisted Language"
  /// text; an unknown code falls back to the stored name, then to
  /// "Unknown Language".
  pub fn resolved_language_name(
    &self,
    registry: &dyn SubtagRegistry,
    messages: &dyn LabelMessages,
  ) -> String {
    let code = self.tag.language();
    if code.eq_ignore_ascii_case(UNLISTED_LANGUAGE) {
      return messages.unlisted_language();
    }
    if let Some(name) = registry.language_name(code) {
      return name;
    }
    if !self.language_name.is_empty() {
      return self.language_name.clone();
    }
    messages.unknown_language()
  }

  /// List label: language name plus a parenthesized detail suffix
  ///
  /// Details by priority: IPA marker text, else script; then region; then
  /// (non-IPA only) variants. Voice systems drop the `Zxxx` fragment and
  /// append `voice` instead.
  pub fn list_label(
    &self,
    registry: &dyn SubtagRegistry,
    messages: &dyn LabelMessages,
  ) -> String {
    let name = if self.tag.language().is_empty() {
      self.display_label()
    } else {
      self.resolved_language_name(registry, messages)
    };

    let mut details = String::new();
    let ipa = self.ipa_status();
    match ipa {
      IpaStatus::Ipa => details.push_str("IPA-"),
      IpaStatus::IpaPhonetic => details.push_str("IPA-etic-"),
      IpaStatus::IpaPhonemic => details.push_str("IPA-emic-"),
      IpaStatus::NotIpa => {
        if !self.tag.script().is_empty() {
          details.push_str(self.tag.script());
          details.push('-');
        }
      }
    }
    if !self.tag.region().is_empty() {
      details.push_str(self.tag.region());
      details.push('-');
    }
    if ipa == IpaStatus::NotIpa && !self.tag.variants().is_empty() {
      details.push_str(&self.tag.variants().join("-"));
      details.push('-');
    }
    if self.is_voice() {
      details = details.replace("Zxxx-", "");
      details.push_str("voice-");
    }
    let details = details.trim_end_matches('-');
    if details.is_empty() {
      name
    } else {
      format!("{name} ({details})")
    }
  }

  // --- stored metadata, independent of the tag ---

  pub fn language_name(&self) -> &str {
    &self.language_name
  }

  pub fn set_language_name(&mut self, name: &str) {
    if self.language_name != name {
      self.language_name = name.to_string();
      self.modified = true;
    }
  }

  pub fn abbreviation(&self) -> &str {
    &self.abbreviation
  }

  pub fn set_abbreviation(&mut self, abbreviation: &str) {
    if self.abbreviation != abbreviation {
      self.abbreviation = abbreviation.to_string();
      self.modified = true;
    }
  }

  pub fn native_name(&self) -> &str {
    &self.native_name
  }

  pub fn set_native_name(&mut self, name: &str) {
    if self.native_name != name {
      self.native_name = name.to_string();
      self.modified = true;
    }
  }

  pub fn default_font_name(&self) -> &str {
    &self.default_font_name
  }

  pub fn set_default_font_name(&mut self, name: &str) {
    if self.default_font_name != name {
      self.default_font_name = name.to_string();
      self.modified = true;
    }
  }

  pub fn default_font_size(&self) -> f32 {
    self.default_font_size
  }

  /// Sets the default font size in points
  ///
  /// # Errors
  ///
  /// Rejects negative, NaN, and infinite sizes.
  pub fn set_default_font_size(&mut self, size: f32) -> Result<()> {
    if !size.is_finite() || size < 0.0 {
      return Err(Error::ArgumentRange {
        what: "default font size",
        value: size,
      });
    }
    if self.default_font_size != size {
      self.default_font_size = size;
      self.modified = true;
    }
    Ok(())
  }

  pub fn keyboard(&self) -> &str {
    &self.keyboard
  }

  pub fn set_keyboard(&mut self, keyboard: &str) {
    if self.keyboard != keyboard {
      self.keyboard = keyboard.to_string();
      self.modified = true;
    }
  }

  pub fn spell_check_id(&self) -> &str {
    &self.spell_check_id
  }

  pub fn set_spell_check_id(&mut self, id: &str) {
    if self.spell_check_id != id {
      self.spell_check_id = id.to_string();
      self.modified = true;
    }
  }

  pub fn version_number(&self) -> &str {
    &self.version_number
  }

  pub fn set_version_number(&mut self, version: &str) {
    if self.version_number != version {
      self.version_number = version.to_string();
      self.modified = true;
    }
  }

  pub fn version_description(&self) -> &str {
    &self.version_description
  }

  pub fn set_version_description(&mut self, description: &str) {
    if self.version_description != description {
      self.version_description = description.to_string();
      self.modified = true;
    }
  }

  pub fn date_modified(&self) -> &str {
    &self.date_modified
  }

  pub fn set_date_modified(&mut self, date: &str) {
    if self.date_modified != date {
      self.date_modified = date.to_string();
      self.modified = true;
    }
  }

  /// Whether any field changed since the last persistence round-trip.
  pub fn modified(&self) -> bool {
    self.modified
  }

  /// Reset by the persistence collaborator after writing.
  pub fn set_modified(&mut self, modified: bool) {
    self.modified = modified;
  }

  pub fn marked_for_deletion(&self) -> bool {
    self.marked_for_deletion
  }

  pub fn set_marked_for_deletion(&mut self, marked: bool) {
    if self.marked_for_deletion != marked {
      self.marked_for_deletion = marked;
      self.modified = true;
    }
  }

  /// Whether invariant checks run after tag mutations.
  pub fn requires_valid_tag(&self) -> bool {
    self.requires_valid_tag
  }

  /// Toggles invariant enforcement. Turning it off permits transient
  /// invalid states during staged edits; nothing is re-checked on re-enable
  /// until the next mutation or an explicit
  /// [`check_variant_and_script_rules`] call.
  ///
  /// [`check_variant_and_script_rules`]: WritingSystemDefinition::check_variant_and_script_rules
  pub fn set_requires_valid_tag(&mut self, requires: bool) {
    self.requires_valid_tag = requires;
  }

  /// Reassigns the identity string when relocating a stored copy
  ///
  /// For the persistence collaborator only; every ordinary mutation path
  /// re-derives `id` from the tag and will overwrite this.
  pub fn set_id_for_storage(&mut self, id: &str) {
    self.id = id.to_string();
  }

  // --- collation ---

  pub fn sort_using(&self) -> CollationStrategy {
    self.sort_using
  }

  /// Switches strategy, keeping the rules payload. Invalidates the cached
  /// collator on change.
  pub fn set_sort_using(&mut self, strategy: CollationStrategy) {
    if self.sort_using != strategy {
      self.sort_using = strategy;
      self.collator = None;
      self.modified = true;
    }
  }

  pub fn sort_rules(&self) -> &str {
    &self.sort_rules
  }

  /// Replaces the rules payload. Invalidates the cached collator on change.
  pub fn set_sort_rules(&mut self, rules: &str) {
    if self.sort_rules != rules {
      self.sort_rules = rules.to_string();
      self.collator = None;
      self.modified = true;
    }
  }

  /// Atomically selects `OtherLanguage` with a locale identifier payload.
  pub fn use_other_language(&mut self, locale: &str) {
    self.select(CollationStrategy::OtherLanguage, locale);
  }

  /// Atomically selects `CustomIcu` with the given rule text.
  pub fn use_custom_icu(&mut self, rules: &str) {
    self.select(CollationStrategy::CustomIcu, rules);
  }

  /// Atomically selects `CustomSimple` with the given rule text.
  pub fn use_custom_simple(&mut self, rules: &str) {
    self.select(CollationStrategy::CustomSimple, rules);
  }

  fn select(&mut self, strategy: CollationStrategy, rules: &str) {
    if self.sort_using != strategy || self.sort_rules != rules {
      self.sort_using = strategy;
      self.sort_rules = rules.to_string();
      self.collator = None;
      self.modified = true;
    }
  }

  /// The collator for the current strategy, built lazily and cached
  ///
  /// The cache survives tag mutations and is dropped precisely when the
  /// strategy or rules change.
  ///
  /// # Errors
  ///
  /// Construction failures from the rule engine or locale factory.
  pub fn collator(&mut self) -> std::result::Result<Arc<dyn Collator>, CollationError> {
    if let Some(collator) = &self.collator {
      return Ok(Arc::clone(collator));
    }
    let built: Box<dyn Collator> = match self.sort_using {
      CollationStrategy::DefaultOrdering => Box::new(CodepointCollator),
      CollationStrategy::CustomSimple => self.engines.simple.construct(&self.sort_rules)?,
      CollationStrategy::CustomIcu => self.engines.icu.construct(&self.sort_rules)?,
      CollationStrategy::OtherLanguage => self.engines.locale.construct(&self.sort_rules)?,
    };
    let built: Arc<dyn Collator> = Arc::from(built);
    self.collator = Some(Arc::clone(&built));
    Ok(built)
  }

  /// Checks the current rules payload against the current strategy
  ///
  /// A value, not an error: editing surfaces call this on every keystroke.
  pub fn validate_collation_rules(&self) -> RuleValidation {
    match self.sort_using {
      CollationStrategy::DefaultOrdering => {
        if self.sort_rules.is_empty() {
          RuleValidation::ok()
        } else {
          RuleValidation::fail("default ordering takes no rules")
        }
      }
      CollationStrategy::CustomSimple => self.engines.simple.validate(&self.sort_rules),
      CollationStrategy::CustomIcu => self.engines.icu.validate(&self.sort_rules),
      CollationStrategy::OtherLanguage => match self.engines.locale.construct(&self.sort_rules) {
        Ok(_) => RuleValidation::ok(),
        Err(e) => RuleValidation::fail(e.to_string()),
      },
    }
  }
}

impl Default for WritingSystemDefinition {
  fn default() -> Self {
    Self::new()
  }
}

impl Clone for WritingSystemDefinition {
  /// Deep copy: its own tag, shared (stateless) engines, and an empty
  /// collator cache.
  fn clone(&self) -> Self {
    Self {
      tag: self.tag.clone(),
      id: self.id.clone(),
      language_name: self.language_name.clone(),
      abbreviation: self.abbreviation.clone(),
      native_name: self.native_name.clone(),
      default_font_name: self.default_font_name.clone(),
      default_font_size: self.default_font_size,
      keyboard: self.keyboard.clone(),
      spell_check_id: self.spell_check_id.clone(),
      version_number: self.version_number.clone(),
      version_description: self.version_description.clone(),
      date_modified: self.date_modified.clone(),
      modified: self.modified,
      marked_for_deletion: self.marked_for_deletion,
      requires_valid_tag: self.requires_valid_tag,
      sort_using: self.sort_using,
      sort_rules: self.sort_rules.clone(),
      engines: Arc::clone(&self.engines),
      collator: None,
    }
  }
}

impl fmt::Debug for WritingSystemDefinition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WritingSystemDefinition")
      .field("id", &self.id)
      .field("language_name", &self.language_name)
      .field("sort_using", &self.sort_using)
      .field("modified", &self.modified)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_definition_is_empty_and_unmodified() {
    let ws = WritingSystemDefinition::new();
    assert_eq!(ws.id(), "");
    assert!(!ws.modified());
    assert_eq!(ws.ipa_status(), IpaStatus::NotIpa);
    assert!(!ws.is_voice());
  }

  #[test]
  fn from_parts_builds_canonical_id() {
    let ws = WritingSystemDefinition::from_parts("en", "Latn", "US", "1996").unwrap();
    assert_eq!(ws.id(), "en-Latn-US-1996");
    assert!(!ws.modified());
  }

  #[test]
  fn id_tracks_every_tag_mutation() {
    let mut ws = WritingSystemDefinition::from_tag("en").unwrap();
    ws.add_to_variant("fonipa").unwrap();
    assert_eq!(ws.id(), "en-fonipa");
    assert!(ws.modified());
    ws.remove_from_variant("FONIPA").unwrap();
    assert_eq!(ws.id(), "en");
  }

  #[test]
  fn ipa_status_precedence() {
    for (tag, expected) in [
      ("en", IpaStatus::NotIpa),
      ("en-fonipa", IpaStatus::Ipa),
      ("en-fonipa-x-etic", IpaStatus::IpaPhonetic),
      ("en-fonipa-x-emic", IpaStatus::IpaPhonemic),
      // emic wins when both markers are present
      ("en-fonipa-x-etic-emic", IpaStatus::IpaPhonemic),
    ] {
      let ws = WritingSystemDefinition::from_tag(tag).unwrap();
      assert_eq!(ws.ipa_status(), expected, "status of {tag}");
    }
  }

  #[test]
  fn set_ipa_status_rewrites_markers() {
    let mut ws = WritingSystemDefinition::from_tag("en-fonipa-x-etic").unwrap();
    ws.set_ipa_status(IpaStatus::IpaPhonemic).unwrap();
    assert_eq!(ws.id(), "en-fonipa-x-emic");
    ws.set_ipa_status(IpaStatus::NotIpa).unwrap();
    assert_eq!(ws.id(), "en");
  }

  #[test]
  fn set_ipa_status_seeds_empty_language() {
    let mut ws = WritingSystemDefinition::new();
    ws.set_ipa_status(IpaStatus::Ipa).unwrap();
    assert_eq!(ws.id(), "qaa-fonipa");
  }

  #[test]
  fn set_ipa_status_is_noop_when_equal() {
    let mut ws = WritingSystemDefinition::from_tag("en-fonipa").unwrap();
    ws.set_modified(false);
    ws.set_ipa_status(IpaStatus::Ipa).unwrap();
    assert!(!ws.modified());
  }

  #[test]
  fn voice_forces_script_and_marker() {
    let mut ws = WritingSystemDefinition::from_tag("en-fonipa-x-etic").unwrap();
    ws.set_keyboard("en-qwerty");
    ws.set_is_voice(true).unwrap();
    assert!(ws.is_voice());
    assert_eq!(ws.script(), "Zxxx");
    assert_eq!(ws.ipa_status(), IpaStatus::NotIpa);
    assert!(ws.tag().private_use_contains("audio"));
    assert_eq!(ws.keyboard(), "");
    assert_eq!(ws.id(), "en-Zxxx-x-audio");
  }

  #[test]
  fn voice_off_clears_script_and_marker() {
    let mut ws = WritingSystemDefinition::from_tag("en-Zxxx-x-audio").unwrap();
    assert!(ws.is_voice());
    ws.set_is_voice(false).unwrap();
    assert_eq!(ws.script(), "");
    assert!(!ws.tag().private_use_contains("audio"));
    assert_eq!(ws.id(), "en");
  }

  #[test]
  fn voice_requires_both_script_and_marker() {
    let ws = WritingSystemDefinition::from_tag("en-Zxxx").unwrap();
    assert!(!ws.is_voice());
  }

  #[test]
  fn invariant_rejects_audio_without_audio_script() {
    let mut ws = WritingSystemDefinition::from_tag("en-Latn").unwrap();
    let err = ws.add_to_private_use("audio").unwrap_err();
    assert!(matches!(
      err,
      Error::Invariant(InvariantError::AudioWithoutAudioScript { .. })
    ));
    // Failed mutation leaves the definition untouched.
    assert_eq!(ws.id(), "en-Latn");
    assert!(!ws.tag().private_use_contains("audio"));
  }

  #[test]
  fn invariant_rejects_voice_with_ipa_markers() {
    let mut ws = WritingSystemDefinition::from_tag("en-Zxxx-x-audio").unwrap();
    let err = ws.add_to_variant("fonipa").unwrap_err();
    assert!(matches!(
      err,
      Error::Invariant(InvariantError::AudioWithIpaMarkers { .. })
    ));
  }

  #[test]
  fn invariant_rejects_phonetic_marker_without_fonipa() {
    let mut ws = WritingSystemDefinition::from_tag("en").unwrap();
    let err = ws.add_to_private_use("etic").unwrap_err();
    assert!(matches!(
      err,
      Error::Invariant(InvariantError::PhoneticMarkerWithoutFonipa { .. })
    ));
  }

  #[test]
  fn disabled_enforcement_permits_transient_states() {
    let mut ws = WritingSystemDefinition::from_tag("en-Latn").unwrap();
    ws.set_requires_valid_tag(false);
    ws.add_to_private_use("audio").unwrap();
    assert_eq!(ws.id(), "en-Latn-x-audio");
    assert!(ws.check_variant_and_script_rules().is_ok());

    ws.set_requires_valid_tag(true);
    assert!(matches!(
      ws.check_variant_and_script_rules(),
      Err(InvariantError::AudioWithoutAudioScript { .. })
    ));
  }

  #[test]
  fn unique_id_copy_walks_dupl_sequence() {
    let source = WritingSystemDefinition::from_tag("en-Latn-US").unwrap();
    let existing = ["en-Latn-US".to_string(), "en-latn-us-x-dupl0".to_string()];
    let copy = source.create_copy_with_unique_id(&existing);
    assert_eq!(copy.id(), "en-Latn-US-x-dupl1");
    assert!(copy.modified());
    // The source is untouched.
    assert_eq!(source.id(), "en-Latn-US");
  }

  #[test]
  fn unique_id_copy_without_collision_is_plain_clone() {
    let source = WritingSystemDefinition::from_tag("de").unwrap();
    let copy = source.create_copy_with_unique_id(&["en".to_string()]);
    assert_eq!(copy.id(), "de");
  }

  #[test]
  fn clone_edits_independently() {
    let original = WritingSystemDefinition::from_tag("en-Latn").unwrap();
    let mut copy = original.clone();
    copy.add_to_variant("1996").unwrap();
    assert_eq!(copy.id(), "en-Latn-1996");
    assert_eq!(original.id(), "en-Latn");
  }

  #[test]
  fn font_size_setter_rejects_out_of_range_values() {
    let mut ws = WritingSystemDefinition::new();
    for bad in [-1.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
      assert!(matches!(
        ws.set_default_font_size(bad),
        Err(Error::ArgumentRange { .. })
      ));
    }
    ws.set_default_font_size(12.0).unwrap();
    assert_eq!(ws.default_font_size(), 12.0);
  }

  #[test]
  fn metadata_setters_track_modified_only_on_change() {
    let mut ws = WritingSystemDefinition::new();
    ws.set_abbreviation("eng");
    assert!(ws.modified());
    ws.set_modified(false);
    ws.set_abbreviation("eng");
    assert!(!ws.modified());
  }
}
