//! Splitting and joining combined variant + private-use strings
//!
//! Editing surfaces and stored representations often carry the variant and
//! private-use parts of a tag as one string, with the private-use block
//! introduced by the `x-` marker (`fonipa-x-etic`). These helpers convert
//! between that combined form and the two separate parts.
//!
//! The round-trip law holds for codec-produced strings:
//! `split(&join(v, p)) == (v, p)` whenever `v` contains no `-x-` infix and
//! `p` carries no leading `x-` marker.

/// Splits a combined string into `(variant, private_use)`
///
/// A leading `x-` (case-insensitive) means the whole string is private use;
/// otherwise the first `-x-` infix separates the two parts; otherwise the
/// whole string is variant. The marker itself never appears in either part.
///
/// # Examples
///
/// ```
/// use writekit::tag::codec::split;
///
/// assert_eq!(split("fonipa-x-etic"), ("fonipa".to_string(), "etic".to_string()));
/// assert_eq!(split("x-audio"), (String::new(), "audio".to_string()));
/// assert_eq!(split("1996"), ("1996".to_string(), String::new()));
/// ```
pub fn split(combined: &str) -> (String, String) {
  let lower = combined.to_ascii_lowercase();
  if lower.starts_with("x-") {
    return (String::new(), combined[2..].to_string());
  }
  if let Some(at) = lower.find("-x-") {
    return (combined[..at].to_string(), combined[at + 3..].to_string());
  }
  (combined.to_string(), String::new())
}

/// Joins a variant part and a private-use part into the combined form
///
/// An empty private-use part returns the variant unchanged. Otherwise the
/// private-use part gains an `x-` prefix (unless it already has one) and the
/// two parts are joined with `-` when the variant is non-empty.
///
/// # Examples
///
/// ```
/// use writekit::tag::codec::join;
///
/// assert_eq!(join("fonipa", "etic"), "fonipa-x-etic");
/// assert_eq!(join("", "audio"), "x-audio");
/// assert_eq!(join("1996", ""), "1996");
/// ```
pub fn join(variant: &str, private_use: &str) -> String {
  if private_use.is_empty() {
    return variant.to_string();
  }
  let marked = if matches!(private_use.as_bytes(), [b'x' | b'X', b'-', ..]) {
    private_use.to_string()
  } else {
    format!("x-{private_use}")
  };
  if variant.is_empty() {
    marked
  } else {
    format!("{variant}-{marked}")
  }
}
