//! Variable reference parsing and substitution.
//!
//! Template and environment values refer to other variables with shell-like
//! syntax. This module splits a value into literal text and references and
//! substitutes resolved values back in.
//!
//! # Reference Formats
//!
//! - `$NAME` - `NAME` is the longest run of ASCII letters, digits and `_`
//! - `${NAME}` - braced form, useful when the name is followed by word characters
//!
//! A `$` that starts neither form (`$5` is a reference to `5`, but `$-`, `$ `,
//! `${}` and a trailing `$` are not) is kept as literal text.
//!
//! # Example
//!
//! ```
//! use portc_lib::placeholder::{parse, Segment};
//!
//! let segments = parse("$CC -c ${CFLAGS}");
//! assert_eq!(segments, vec![
//!     Segment::Reference("CC".to_string()),
//!     Segment::Literal(" -c ".to_string()),
//!     Segment::Reference("CFLAGS".to_string()),
//! ]);
//! ```

use std::collections::BTreeSet;

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no references)
  Literal(String),

  /// A reference to the named variable
  Reference(String),
}

fn is_name_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

/// Locate the first well-formed reference in `input`.
///
/// Returns the byte range of the whole reference (including `$` and braces)
/// and the referenced name.
fn find_reference(input: &str) -> Option<(usize, usize, &str)> {
  let mut offset = 0;

  while let Some(pos) = input[offset..].find('$') {
    let start = offset + pos;
    let after = &input[start + 1..];

    if let Some(braced) = after.strip_prefix('{') {
      let name_len = braced.find(|c: char| !is_name_char(c)).unwrap_or(braced.len());
      if name_len > 0 && braced[name_len..].starts_with('}') {
        return Some((start, start + name_len + 3, &braced[..name_len]));
      }
    } else {
      let name_len = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());
      if name_len > 0 {
        return Some((start, start + name_len + 1, &after[..name_len]));
      }
    }

    offset = start + 1;
  }

  None
}

/// Parse a value into literal and reference segments.
///
/// Parsing never fails; malformed references are literal text.
pub fn parse(input: &str) -> Vec<Segment> {
  let mut segments = Vec::new();
  let mut rest = input;

  while let Some((start, end, name)) = find_reference(rest) {
    if start > 0 {
      segments.push(Segment::Literal(rest[..start].to_string()));
    }
    segments.push(Segment::Reference(name.to_string()));
    rest = &rest[end..];
  }

  if !rest.is_empty() {
    segments.push(Segment::Literal(rest.to_string()));
  }

  segments
}

/// Returns true if the value contains at least one variable reference.
pub fn is_expandable(value: &str) -> bool {
  references(value).next().is_some()
}

/// Iterate over the names referenced by a value, in order of appearance.
pub fn references(value: &str) -> impl Iterator<Item = String> {
  parse(value).into_iter().filter_map(|segment| match segment {
    Segment::Reference(name) => Some(name),
    Segment::Literal(_) => None,
  })
}

/// The set of distinct names referenced by a value.
pub fn unique_references(value: &str) -> BTreeSet<String> {
  references(value).collect()
}

/// Replace every reference to `name` in `input` with `value`.
///
/// References to other names keep their original spelling so the result can
/// be expanded further. The substituted value is not rescanned.
pub fn substitute(input: &str, name: &str, value: &str) -> String {
  let mut result = String::with_capacity(input.len());
  let mut rest = input;

  while let Some((start, end, found)) = find_reference(rest) {
    result.push_str(&rest[..start]);
    if found == name {
      result.push_str(value);
    } else {
      result.push_str(&rest[start..end]);
    }
    rest = &rest[end..];
  }

  result.push_str(rest);
  result
}

#[cfg(test)]
mod tests {
  use super::*;

  // ==========================================================================
  // Parsing
  // ==========================================================================

  #[test]
  fn parse_compile_template() {
    let segments = parse("$CC -c $CFLAGS $PORT_IN_FILES -o $PORT_OUT_FILE");
    assert_eq!(
      segments,
      vec![
        Segment::Reference("CC".to_string()),
        Segment::Literal(" -c ".to_string()),
        Segment::Reference("CFLAGS".to_string()),
        Segment::Literal(" ".to_string()),
        Segment::Reference("PORT_IN_FILES".to_string()),
        Segment::Literal(" -o ".to_string()),
        Segment::Reference("PORT_OUT_FILE".to_string()),
      ]
    );
  }

  #[test]
  fn parse_windows_output_flag() {
    // `/Fo$PORT_OUT_FILE` has no separator before the reference
    let segments = parse("/Fo$PORT_OUT_FILE");
    assert_eq!(
      segments,
      vec![
        Segment::Literal("/Fo".to_string()),
        Segment::Reference("PORT_OUT_FILE".to_string()),
      ]
    );
  }

  #[test]
  fn parse_braced_reference_followed_by_word_chars() {
    let segments = parse("${ERL_EI_LIBDIR}64");
    assert_eq!(
      segments,
      vec![
        Segment::Reference("ERL_EI_LIBDIR".to_string()),
        Segment::Literal("64".to_string()),
      ]
    );
  }

  #[test]
  fn lone_and_trailing_dollar_are_literal() {
    let segments = parse("costs $ or $-x$");
    assert_eq!(segments, vec![Segment::Literal("costs $ or $-x$".to_string())]);
  }

  #[test]
  fn unclosed_brace_is_literal() {
    let segments = parse("${CFLAGS");
    assert_eq!(segments, vec![Segment::Literal("${CFLAGS".to_string())]);
  }

  #[test]
  fn empty_input() {
    assert!(parse("").is_empty());
  }

  #[test]
  fn unique_references_are_sorted_and_deduplicated() {
    let names = unique_references("$B $A ${B} $A");
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
  }

  #[test]
  fn expandable_detection() {
    assert!(is_expandable("-m64 $CFLAGS"));
    assert!(!is_expandable("cc"));
    assert!(!is_expandable("price $"));
  }

  // ==========================================================================
  // Substitution
  // ==========================================================================

  #[test]
  fn substitute_bare_and_braced() {
    let result = substitute("$CFLAGS -O2 ${CFLAGS}", "CFLAGS", "-g");
    assert_eq!(result, "-g -O2 -g");
  }

  #[test]
  fn substitute_keeps_other_references_verbatim() {
    let result = substitute("$CC ${CFLAGS} $LDFLAGS", "CC", "gcc");
    assert_eq!(result, "gcc ${CFLAGS} $LDFLAGS");
  }

  #[test]
  fn substitute_does_not_match_name_prefix() {
    // $CFLAGS2 is a different variable
    let result = substitute("$CFLAGS2 $CFLAGS", "CFLAGS", "-g");
    assert_eq!(result, "$CFLAGS2 -g");
  }

  #[test]
  fn substitute_with_empty_value() {
    let result = substitute("-m64 $CFLAGS", "CFLAGS", "");
    assert_eq!(result, "-m64 ");
  }

  #[test]
  fn substitute_value_containing_dollar_is_not_rescanned() {
    let result = substitute("$A $B", "A", "$B");
    assert_eq!(result, "$B $B");
  }
}
