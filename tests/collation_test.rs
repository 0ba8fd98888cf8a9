//! Collation strategy selection, lazy construction, cache invalidation,
//! and value-based rule validation.

use std::cmp::Ordering;
use std::sync::Arc;
use writekit::{CollationStrategy, WritingSystemDefinition};

#[test]
fn default_ordering_needs_no_rules() {
  let mut ws = WritingSystemDefinition::from_tag("en").unwrap();
  assert_eq!(ws.sort_using(), CollationStrategy::DefaultOrdering);
  assert!(ws.validate_collation_rules().is_valid());
  let collator = ws.collator().unwrap();
  assert_eq!(collator.compare("a", "b"), Ordering::Less);
}

#[test]
fn default_ordering_rejects_leftover_rules() {
  let mut ws = WritingSystemDefinition::from_tag("en").unwrap();
  ws.use_custom_icu("&b < a");
  ws.set_sort_using(CollationStrategy::DefaultOrdering);
  let verdict = ws.validate_collation_rules();
  assert!(!verdict.is_valid());
  assert!(verdict.message.contains("no rules"));
}

#[test]
fn rules_change_rebuilds_the_collator() {
  let mut ws = WritingSystemDefinition::from_tag("en").unwrap();
  ws.use_custom_icu("&b < a");
  let first = ws.collator().unwrap();
  assert_eq!(first.compare("b", "a"), Ordering::Less);

  // Same strategy, new rules: the cache must not survive.
  ws.use_custom_icu("&a < b");
  let second = ws.collator().unwrap();
  assert_eq!(second.compare("a", "b"), Ordering::Less);
  assert_eq!(second.compare("b", "a"), Ordering::Greater);
}

#[test]
fn strategy_change_rebuilds_the_collator() {
  let mut ws = WritingSystemDefinition::from_tag("en").unwrap();
  ws.use_custom_simple("b\na");
  let simple = ws.collator().unwrap();
  assert_eq!(simple.compare("b", "a"), Ordering::Less);

  ws.set_sort_using(CollationStrategy::DefaultOrdering);
  let default = ws.collator().unwrap();
  assert_eq!(default.compare("a", "b"), Ordering::Less);
}

#[test]
fn unrelated_tag_mutations_keep_the_cached_collator() {
  let mut ws = WritingSystemDefinition::from_tag("en").unwrap();
  ws.use_custom_simple("b\na");
  let before = ws.collator().unwrap();

  ws.add_to_variant("1996").unwrap();
  let after = ws.collator().unwrap();
  assert!(
    Arc::ptr_eq(&before, &after),
    "tag mutations must not drop the cached collator"
  );
  assert_eq!(after.compare("b", "a"), Ordering::Less);
}

#[test]
fn selection_setters_are_atomic_and_idempotent() {
  let mut ws = WritingSystemDefinition::from_tag("en").unwrap();
  ws.use_other_language("de-DE");
  assert_eq!(ws.sort_using(), CollationStrategy::OtherLanguage);
  assert_eq!(ws.sort_rules(), "de-DE");

  ws.set_modified(false);
  ws.use_other_language("de-DE");
  assert!(!ws.modified(), "re-selecting the same state is a no-op");
}

#[test]
fn other_language_validation_reports_construction_failures() {
  let mut ws = WritingSystemDefinition::from_tag("en").unwrap();
  ws.use_other_language("de-DE");
  assert!(ws.validate_collation_rules().is_valid());
  assert!(ws.collator().is_ok());

  ws.use_other_language("not a locale");
  let verdict = ws.validate_collation_rules();
  assert!(!verdict.is_valid());
  assert!(verdict.message.contains("locale"));
  assert!(ws.collator().is_err());
}

#[test]
fn custom_rule_validation_surfaces_engine_messages() {
  let mut ws = WritingSystemDefinition::from_tag("en").unwrap();

  ws.use_custom_icu("a < b");
  let verdict = ws.validate_collation_rules();
  assert!(!verdict.is_valid());
  assert!(verdict.message.contains("reset"));

  ws.use_custom_simple("(a b");
  let verdict = ws.validate_collation_rules();
  assert!(!verdict.is_valid());
  assert!(verdict.message.contains("line 1"));

  ws.use_custom_simple("(a A) b\nc");
  assert!(ws.validate_collation_rules().is_valid());
}

#[test]
fn simple_rules_order_sorted_lists() {
  let mut ws = WritingSystemDefinition::from_tag("en").unwrap();
  ws.use_custom_simple("th\nt\nu");
  let collator = ws.collator().unwrap();
  let mut words = vec!["tart", "thin", "ugly", "tin"];
  words.sort_by(|a, b| collator.compare(a, b));
  assert_eq!(words, ["thin", "tart", "tin", "ugly"]);
}
