//! Collation strategy selection and rule engines
//!
//! A writing system picks one of four collation strategies:
//!
//! - `DefaultOrdering`: no custom rules, plain codepoint comparison.
//! - `CustomSimple`: the line-oriented "simple" rule dialect (one primary
//!   group per line, space-separated secondary elements, parenthesized
//!   tertiary groups).
//! - `CustomIcu`: ICU tailoring syntax (`&a < b << c`).
//! - `OtherLanguage`: borrow the ordering of another locale, identified by
//!   a locale string in the rules payload.
//!
//! The *engines* that compile rule text live behind [`RuleCollatorEngine`]
//! and [`LocaleCollatorFactory`] so real ICU implementations can be plugged
//! in. The built-in engines are deterministic, dependency-free subsets:
//! good enough for stand-alone use and for exercising the selection and
//! validation contract, not a full UCA implementation.
//!
//! Validation is a value, not an error: [`RuleValidation`] carries the
//! verdict and a human-readable message so editing surfaces can show
//! feedback without exception handling.

use crate::error::CollationError;
use crate::tag::LanguageTag;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A comparator over strings produced by a collation strategy
///
/// A collator is a pure function of `(a, b)`; the core is oblivious to how
/// the ordering was derived.
pub trait Collator: Send + Sync {
  fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Compiles and validates one rule dialect
pub trait RuleCollatorEngine: Send + Sync {
  /// Compiles `rules` into a collator.
  fn construct(&self, rules: &str) -> Result<Box<dyn Collator>, CollationError>;

  /// Checks `rules` without building a collator, reporting a message on
  /// failure.
  fn validate(&self, rules: &str) -> RuleValidation;
}

/// Builds a collator keyed by a locale identifier
pub trait LocaleCollatorFactory: Send + Sync {
  fn construct(&self, locale: &str) -> Result<Box<dyn Collator>, CollationError>;
}

/// The closed set of collation strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollationStrategy {
  /// No custom rules; plain codepoint ordering.
  #[default]
  DefaultOrdering,
  /// Line-oriented simple rule dialect.
  CustomSimple,
  /// ICU tailoring syntax.
  CustomIcu,
  /// Borrow another locale's ordering; the rules payload is the locale id.
  OtherLanguage,
}

/// Outcome of validating collation rules
///
/// # Examples
///
/// ```
/// use writekit::collation::RuleValidation;
///
/// let verdict = RuleValidation::fail("expected element after '<'");
/// assert!(!verdict.is_valid());
/// assert!(verdict.message.contains("'<'"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleValidation {
  pub valid: bool,
  pub message: String,
}

impl RuleValidation {
  pub fn ok() -> Self {
    Self {
      valid: true,
      message: String::new(),
    }
  }

  pub fn fail(message: impl Into<String>) -> Self {
    Self {
      valid: false,
      message: message.into(),
    }
  }

  pub fn is_valid(&self) -> bool {
    self.valid
  }
}

/// The pluggable engine set consulted when building collators
///
/// `Default` wires up the built-in engines; callers with real ICU bindings
/// replace individual fields.
pub struct CollationEngines {
  pub simple: Box<dyn RuleCollatorEngine>,
  pub icu: Box<dyn RuleCollatorEngine>,
  pub locale: Box<dyn LocaleCollatorFactory>,
}

impl Default for CollationEngines {
  fn default() -> Self {
    Self {
      simple: Box::new(SimpleRulesEngine),
      icu: Box::new(IcuRulesEngine),
      locale: Box::new(BuiltinLocaleFactory),
    }
  }
}

/// Plain codepoint comparison, used by `DefaultOrdering` and by both rule
/// engines when the rule text is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodepointCollator;

impl Collator for CodepointCollator {
  fn compare(&self, a: &str, b: &str) -> Ordering {
    a.cmp(b)
  }
}

/// Case-folded comparison with a raw tiebreak, used by the built-in locale
/// factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFoldCollator;

impl Collator for CaseFoldCollator {
  fn compare(&self, a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    if folded != Ordering::Equal {
      return folded;
    }
    a.cmp(b)
  }
}

/// Three-level weight assigned to a tailored collation element.
type Weight = (u32, u32, u32);

/// Sort key for one token of input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
  /// An element mentioned in the rules. Ranked elements sort before
  /// unmentioned characters.
  Ranked(Weight),
  /// A character the rules never mention, ordered by codepoint.
  Raw(char),
}

/// Collator tailored by an element-to-weight table
///
/// Input is tokenized greedily (longest mentioned element first, so
/// digraphs like `ch` win over `c`), then compared key by key.
struct TailoredCollator {
  weights: FxHashMap<String, Weight>,
  max_element_chars: usize,
}

impl TailoredCollator {
  fn new(weights: FxHashMap<String, Weight>) -> Self {
    let max_element_chars = weights.keys().map(|k| k.chars().count()).max().unwrap_or(1);
    Self {
      weights,
      max_element_chars,
    }
  }

  fn sort_keys(&self, text: &str) -> Vec<SortKey> {
    let mut keys = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
      let mut matched_len = 0;
      let mut matched_weight = None;
      let mut chars = 0;
      for (i, c) in rest.char_indices() {
        chars += 1;
        if chars > self.max_element_chars {
          break;
        }
        let end = i + c.len_utf8();
        if let Some(&w) = self.weights.get(&rest[..end]) {
          matched_len = end;
          matched_weight = Some(w);
        }
      }
      match matched_weight {
        Some(w) => {
          keys.push(SortKey::Ranked(w));
          rest = &rest[matched_len..];
        }
        None => {
          let c = rest.chars().next().unwrap_or('\0');
          keys.push(SortKey::Raw(c));
          rest = &rest[c.len_utf8()..];
        }
      }
    }
    keys
  }
}

impl Collator for TailoredCollator {
  fn compare(&self, a: &str, b: &str) -> Ordering {
    let keyed = self.sort_keys(a).cmp(&self.sort_keys(b));
    if keyed != Ordering::Equal {
      return keyed;
    }
    // Equal keys can still come from different spellings within a tertiary
    // group; keep the order total.
    a.cmp(b)
  }
}

/// Built-in engine for the line-oriented simple rule dialect
///
/// One line per primary group. Within a line, whitespace separates
/// secondary elements; a parenthesized run `(a A)` makes its members
/// tertiary variants of one secondary slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRulesEngine;

impl SimpleRulesEngine {
  fn parse(rules: &str) -> Result<FxHashMap<String, Weight>, String> {
    let mut weights = FxHashMap::default();
    let mut primary = 0u32;
    for (line_no, line) in rules.lines().enumerate() {
      if line.trim().is_empty() {
        continue;
      }
      primary += 1;
      let mut secondary = 0u32;
      let mut tertiary = 0u32;
      let mut in_group = false;
      // Elements already flushed inside the current parenthesized group;
      // the first one opens a new secondary slot, the rest are tertiary.
      let mut group_count = 0u32;
      let mut element = String::new();

      for c in line.chars() {
        match c {
          '(' => {
            if in_group {
              return Err(format!("line {}: nested '('", line_no + 1));
            }
            flush_element(
              &mut weights,
              &mut element,
              primary,
              &mut secondary,
              &mut tertiary,
              false,
              line_no,
            )?;
            in_group = true;
            group_count = 0;
          }
          ')' => {
            if !in_group {
              return Err(format!("line {}: unmatched ')'", line_no + 1));
            }
            flush_element(
              &mut weights,
              &mut element,
              primary,
              &mut secondary,
              &mut tertiary,
              group_count > 0,
              line_no,
            )?;
            in_group = false;
            group_count = 0;
          }
          c if c.is_whitespace() => {
            let flushed = flush_element(
              &mut weights,
              &mut element,
              primary,
              &mut secondary,
              &mut tertiary,
              in_group && group_count > 0,
              line_no,
            )?;
            if flushed && in_group {
              group_count += 1;
            }
          }
          c => element.push(c),
        }
      }
      if in_group {
        return Err(format!("line {}: missing ')'", line_no + 1));
      }
      flush_element(
        &mut weights,
        &mut element,
        primary,
        &mut secondary,
        &mut tertiary,
        false,
        line_no,
      )?;
    }
    Ok(weights)
  }
}

impl RuleCollatorEngine for SimpleRulesEngine {
  fn construct(&self, rules: &str) -> Result<Box<dyn Collator>, CollationError> {
    if rules.trim().is_empty() {
      return Ok(Box::new(CodepointCollator));
    }
    let weights = Self::parse(rules).map_err(|message| CollationError::Rules { message })?;
    Ok(Box::new(TailoredCollator::new(weights)))
  }

  fn validate(&self, rules: &str) -> RuleValidation {
    if rules.trim().is_empty() {
      return RuleValidation::ok();
    }
    match Self::parse(rules) {
      Ok(_) => RuleValidation::ok(),
      Err(message) => RuleValidation::fail(message),
    }
  }
}

/// Built-in structural subset of the ICU tailoring syntax
///
/// Understands reset chains `&a < b << c <<< d = e` and compiles them to a
/// tailored comparator. Anything beyond resets and the four relations is
/// rejected; a real ICU engine replaces this via [`CollationEngines`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IcuRulesEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
enum IcuToken {
  Reset,
  Primary,
  Secondary,
  Tertiary,
  Equal,
  Element(String),
}

impl IcuRulesEngine {
  fn tokenize(rules: &str) -> Vec<IcuToken> {
    let mut tokens = Vec::new();
    let mut chars = rules.chars().peekable();
    while let Some(&c) = chars.peek() {
      if c.is_whitespace() {
        chars.next();
      } else if c == '&' {
        chars.next();
        tokens.push(IcuToken::Reset);
      } else if c == '=' {
        chars.next();
        tokens.push(IcuToken::Equal);
      } else if c == '<' {
        chars.next();
        let mut depth = 1;
        while chars.peek() == Some(&'<') && depth < 3 {
          chars.next();
          depth += 1;
        }
        tokens.push(match depth {
          1 => IcuToken::Primary,
          2 => IcuToken::Secondary,
          _ => IcuToken::Tertiary,
        });
      } else {
        let mut element = String::new();
        while let Some(&c) = chars.peek() {
          if c.is_whitespace() || matches!(c, '&' | '<' | '=') {
            break;
          }
          element.push(c);
          chars.next();
        }
        tokens.push(IcuToken::Element(element));
      }
    }
    tokens
  }

  fn parse(rules: &str) -> Result<FxHashMap<String, Weight>, String> {
    let tokens = Self::tokenize(rules);
    let mut weights = FxHashMap::default();
    let mut current: Weight = (0, 0, 0);
    let mut have_element = false;
    let mut iter = tokens.into_iter().peekable();

    if iter.peek().is_none() {
      return Ok(weights);
    }
    if iter.peek() != Some(&IcuToken::Reset) {
      return Err("rules must start with a reset ('&')".to_string());
    }

    while let Some(token) = iter.next() {
      let relation = match token {
        IcuToken::Reset => {
          current = (current.0 + 1, 0, 0);
          have_element = false;
          match iter.next() {
            Some(IcuToken::Element(anchor)) => {
              weights.entry(anchor).or_insert(current);
              have_element = true;
              continue;
            }
            _ => return Err("expected an element after '&'".to_string()),
          }
        }
        other => other,
      };

      if !have_element {
        return Err("relation before any anchor element".to_string());
      }
      let next = match relation {
        IcuToken::Primary => (current.0 + 1, 0, 0),
        IcuToken::Secondary => (current.0, current.1 + 1, 0),
        IcuToken::Tertiary => (current.0, current.1, current.2 + 1),
        IcuToken::Equal => current,
        IcuToken::Element(e) => {
          return Err(format!("element '{e}' without a preceding relation"));
        }
        IcuToken::Reset => unreachable!("reset handled above"),
      };
      match iter.next() {
        Some(IcuToken::Element(target)) => {
          current = next;
          weights.entry(target).or_insert(current);
        }
        _ => return Err("expected an element after a relation".to_string()),
      }
    }
    Ok(weights)
  }
}

impl RuleCollatorEngine for IcuRulesEngine {
  fn construct(&self, rules: &str) -> Result<Box<dyn Collator>, CollationError> {
    if rules.trim().is_empty() {
      return Ok(Box::new(CodepointCollator));
    }
    let weights = Self::parse(rules).map_err(|message| CollationError::Rules { message })?;
    Ok(Box::new(TailoredCollator::new(weights)))
  }

  fn validate(&self, rules: &str) -> RuleValidation {
    if rules.trim().is_empty() {
      return RuleValidation::ok();
    }
    match Self::parse(rules) {
      Ok(_) => RuleValidation::ok(),
      Err(message) => RuleValidation::fail(message),
    }
  }
}

/// Built-in locale factory: accepts any structurally valid language tag and
/// hands back a case-folded comparator
///
/// Real system-locale collation (ICU `Collator::createInstance`) slots in
/// behind [`LocaleCollatorFactory`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLocaleFactory;

impl LocaleCollatorFactory for BuiltinLocaleFactory {
  fn construct(&self, locale: &str) -> Result<Box<dyn Collator>, CollationError> {
    if locale.trim().is_empty() {
      return Err(CollationError::Locale {
        locale: locale.to_string(),
        message: "empty locale identifier".to_string(),
      });
    }
    LanguageTag::parse(locale.trim()).map_err(|e| CollationError::Locale {
      locale: locale.to_string(),
      message: e.to_string(),
    })?;
    Ok(Box::new(CaseFoldCollator))
  }
}

/// Moves the accumulated element text into the weight table. Returns
/// whether anything was flushed.
fn flush_element(
  weights: &mut FxHashMap<String, Weight>,
  element: &mut String,
  primary: u32,
  secondary: &mut u32,
  tertiary: &mut u32,
  continuing_group: bool,
  line_no: usize,
) -> Result<bool, String> {
  if element.is_empty() {
    return Ok(false);
  }
  if continuing_group {
    *tertiary += 1;
  } else {
    *secondary += 1;
    *tertiary = 0;
  }
  let taken = std::mem::take(element);
  if weights
    .insert(taken.clone(), (primary, *secondary, *tertiary))
    .is_some()
  {
    return Err(format!("line {}: duplicate element '{}'", line_no + 1, taken));
  }
  Ok(true)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ordered(collator: &dyn Collator, items: &[&str]) -> Vec<String> {
    let mut sorted: Vec<String> = items.iter().map(|s| (*s).to_string()).collect();
    sorted.sort_by(|a, b| collator.compare(a, b));
    sorted
  }

  #[test]
  fn codepoint_collator_is_plain_ordering() {
    let c = CodepointCollator;
    assert_eq!(c.compare("a", "b"), Ordering::Less);
    assert_eq!(c.compare("Z", "a"), Ordering::Less);
  }

  #[test]
  fn case_fold_collator_groups_cases() {
    let c = CaseFoldCollator;
    assert_eq!(ordered(&c, &["b", "A", "a", "B"]), ["A", "a", "B", "b"]);
  }

  #[test]
  fn simple_rules_order_primary_by_line() {
    let engine = SimpleRulesEngine;
    let collator = engine.construct("b\na\nc").unwrap();
    assert_eq!(ordered(collator.as_ref(), &["a", "b", "c"]), ["b", "a", "c"]);
  }

  #[test]
  fn simple_rules_secondary_within_line() {
    let engine = SimpleRulesEngine;
    let collator = engine.construct("b a\nc").unwrap();
    assert_eq!(collator.compare("b", "a"), Ordering::Less);
    assert_eq!(collator.compare("a", "c"), Ordering::Less);
  }

  #[test]
  fn simple_rules_tertiary_groups() {
    let engine = SimpleRulesEngine;
    let collator = engine.construct("(a A) b").unwrap();
    assert_eq!(collator.compare("a", "A"), Ordering::Less);
    assert_eq!(collator.compare("A", "b"), Ordering::Less);
  }

  #[test]
  fn simple_rules_digraphs_win_over_single_chars() {
    let engine = SimpleRulesEngine;
    let collator = engine.construct("c\nch\nd").unwrap();
    // "ch" is one element sorting after "c" and before "d".
    assert_eq!(collator.compare("ch", "c"), Ordering::Greater);
    assert_eq!(collator.compare("ch", "d"), Ordering::Less);
  }

  #[test]
  fn simple_rules_reject_malformed_lines() {
    let engine = SimpleRulesEngine;
    for (rules, needle) in [
      ("(a", "missing ')'"),
      ("a)", "unmatched ')'"),
      ("((a))", "nested"),
      ("a\na", "duplicate"),
    ] {
      let verdict = engine.validate(rules);
      assert!(!verdict.is_valid(), "expected {rules:?} to fail");
      assert!(
        verdict.message.contains(needle),
        "message {:?} should mention {needle:?}",
        verdict.message
      );
    }
  }

  #[test]
  fn simple_rules_empty_is_default_ordering() {
    let engine = SimpleRulesEngine;
    assert!(engine.validate("").is_valid());
    let collator = engine.construct("  \n ").unwrap();
    assert_eq!(collator.compare("a", "b"), Ordering::Less);
  }

  #[test]
  fn icu_rules_follow_relation_chain() {
    let engine = IcuRulesEngine;
    let collator = engine.construct("&b < a << c").unwrap();
    assert_eq!(collator.compare("b", "a"), Ordering::Less);
    assert_eq!(collator.compare("a", "c"), Ordering::Less);
  }

  #[test]
  fn icu_rules_validation_messages() {
    let engine = IcuRulesEngine;
    for (rules, needle) in [
      ("a < b", "start with a reset"),
      ("&", "after '&'"),
      ("&a <", "after a relation"),
      ("&a b", "without a preceding relation"),
    ] {
      let verdict = engine.validate(rules);
      assert!(!verdict.is_valid(), "expected {rules:?} to fail");
      assert!(
        verdict.message.contains(needle),
        "message {:?} should mention {needle:?}",
        verdict.message
      );
    }
    assert!(engine.validate("&b < a << c <<< C = ç").is_valid());
  }

  #[test]
  fn builtin_locale_factory_checks_tag_shape() {
    let factory = BuiltinLocaleFactory;
    assert!(factory.construct("de-DE").is_ok());
    assert!(matches!(
      factory.construct(""),
      Err(CollationError::Locale { .. })
    ));
    assert!(matches!(
      factory.construct("not a locale"),
      Err(CollationError::Locale { .. })
    ));
  }
}
