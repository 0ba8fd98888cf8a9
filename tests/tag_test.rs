//! Language-tag grammar and codec behavior across the public API.

use writekit::tag::{codec, LanguageTag};
use writekit::WritingSystemDefinition;

#[test]
fn canonical_string_is_idempotent_through_parse() {
  for text in [
    "en",
    "en-Latn-US-1996",
    "qaa-fonipa",
    "en-Zxxx-x-audio",
    "th-Thai-TH",
    "x-mine",
    "de-1901-x-one-two",
  ] {
    let ws = WritingSystemDefinition::from_tag(text).unwrap();
    let reparsed = WritingSystemDefinition::from_tag(ws.id()).unwrap();
    assert_eq!(reparsed.id(), ws.id(), "idempotence of {text}");
  }
}

#[test]
fn explicit_components_serialize_in_grammar_order() {
  let ws = WritingSystemDefinition::from_parts("en", "Latn", "US", "1996").unwrap();
  assert_eq!(ws.id(), "en-Latn-US-1996");
  assert_eq!(ws.language(), "en");
  assert_eq!(ws.script(), "Latn");
  assert_eq!(ws.region(), "US");
  assert_eq!(ws.variant_string(), "1996");
}

#[test]
fn codec_round_trip_holds_for_produced_strings() {
  let variants = ["", "fonipa", "fonipa-1996", "1901"];
  let privates = ["audio", "etic", "dupl0-mine"];
  for variant in variants {
    for private in privates {
      let combined = codec::join(variant, private);
      assert_eq!(
        codec::split(&combined),
        (variant.to_string(), private.to_string()),
        "round trip of {combined:?}"
      );
    }
  }
}

#[test]
fn combined_variant_reaches_both_tag_lists() {
  let ws = WritingSystemDefinition::from_parts("en", "", "", "fonipa-x-etic").unwrap();
  assert!(ws.tag().variant_contains("fonipa"));
  assert!(ws.tag().private_use_contains("etic"));
  assert_eq!(ws.id(), "en-fonipa-x-etic");
}

#[test]
fn malformed_tags_are_rejected_with_component_context() {
  for text in ["1abc", "en-Latn-US-x-", "en-Latn-US-toolongvariant"] {
    let err = WritingSystemDefinition::from_tag(text).unwrap_err();
    assert!(
      err.to_string().contains(text),
      "error for {text:?} should echo the input, got {err}"
    );
  }
}

#[test]
fn language_tag_serde_round_trip() {
  let tag = LanguageTag::parse("en-Latn-US-1996-x-audio").unwrap();
  let json = serde_json::to_string(&tag).unwrap();
  let back: LanguageTag = serde_json::from_str(&json).unwrap();
  assert_eq!(back, tag);
  assert_eq!(back.canonical(), "en-Latn-US-1996-x-audio");
}
