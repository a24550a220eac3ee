//! Identifier standardisation.

/// Standard form of an identifier: trimmed, internal whitespace runs
/// collapsed to one space, lower-cased.
///
/// Point ids, table names and column names are all compared in this form.
///
/// ```
/// assert_eq!(rc_core::standardise("  Depot   North "), "depot north");
/// ```
pub fn standardise(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// `true` if `a` and `b` have the same standard form.
#[inline]
pub fn equivalent(a: &str, b: &str) -> bool {
    standardise(a) == standardise(b)
}
