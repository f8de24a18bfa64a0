//! # Matching Helpers
//!
//! Small string predicates shared by prefix stripping and command resolution.

/// Compare two strings, optionally ignoring case.
pub fn equals(a: &str, b: &str, ignore_case: bool) -> bool {
    if ignore_case {
        a.to_lowercase() == b.to_lowercase()
    } else {
        a == b
    }
}

/// Whether `needle` equals any entry of `candidates`.
pub fn contains(candidates: &[&str], needle: &str, ignore_case: bool) -> bool {
    candidates.iter().any(|c| equals(c, needle, ignore_case))
}

/// Strip the first of `prefixes` (tried in order) that `text` starts with.
///
/// Returns the remainder after the matched prefix, or `None` if nothing matched.
pub fn strip_any_prefix<'a, S: AsRef<str>>(
    text: &'a str,
    prefixes: &[S],
    ignore_case: bool,
) -> Option<&'a str> {
    prefixes
        .iter()
        .find_map(|prefix| strip_prefix(text, prefix.as_ref(), ignore_case))
}

fn strip_prefix<'a>(text: &'a str, prefix: &str, ignore_case: bool) -> Option<&'a str> {
    if !ignore_case {
        return text.strip_prefix(prefix);
    }
    // Compare on the same byte length so the remainder never splits a char.
    let len = prefix.len();
    if text.len() < len || !text.is_char_boundary(len) {
        return None;
    }
    equals(&text[..len], prefix, true).then(|| &text[len..])
}

/// Sort candidates longest-first so a short alias never shadows a longer one
/// that shares its start.
pub fn longest_first<'a>(mut candidates: Vec<&'a str>) -> Vec<&'a str> {
    candidates.sort_by(|a, b| b.len().cmp(&a.len()));
    candidates
}

/// Strip a single pair of surrounding double quotes, if present on both ends.
pub fn trim_quotes(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(if token == "\"" { "" } else { token })
}
