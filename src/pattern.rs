//! Shared pattern fragments for the patcher.
//!
//! The container and entry patterns need a look-behind guard, which the plain
//! `regex` crate does not support, so they are compiled with `fancy-regex`.

use crate::error::PatchResult;
use fancy_regex::Regex;
use std::ops::Range;

/// Rejects a match that continues a longer identifier (`xcharacters` must not
/// match `characters`).
pub(crate) const NOT_AFTER_IDENT: &str = r"(?<![A-Za-z0-9_$])";

/// The bounded one-level body: any run of non-brace characters or exactly one
/// balanced `{…}` pair, repeated, then the closing brace. An entry whose value
/// itself holds a nested object cannot be captured by this.
pub(crate) const BOUNDED_BODY: &str = r"((?:\{[^{}]*\}|[^{}])*)\}";

pub(crate) fn escaped(text: &str) -> String {
    fancy_regex::escape(text).into_owned()
}

pub(crate) fn compile(pattern: &str) -> PatchResult<Regex> {
    Ok(Regex::new(pattern)?)
}

/// Replaces every non-overlapping match of `re` in `text`.
pub(crate) fn replace_all(re: &Regex, text: &str, replacement: &str) -> PatchResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in re.find_iter(text) {
        let found = found?;
        out.push_str(&text[last..found.start()]);
        out.push_str(replacement);
        last = found.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Returns `source` with the byte range replaced.
pub(crate) fn splice(source: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(source.len() + replacement.len());
    out.push_str(&source[..range.start]);
    out.push_str(replacement);
    out.push_str(&source[range.end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_all_replaces_every_match() {
        let re = compile(r"\d+").unwrap();
        assert_eq!(replace_all(&re, "a1b22c333", "#").unwrap(), "a#b#c#");
    }

    #[test]
    fn test_replace_all_without_match_returns_input() {
        let re = compile(r"\d+").unwrap();
        assert_eq!(replace_all(&re, "abc", "#").unwrap(), "abc");
    }

    #[test]
    fn test_splice() {
        assert_eq!(splice("hello world", 6..11, "there"), "hello there");
        assert_eq!(splice("abc", 0..0, "x"), "xabc");
    }

    #[test]
    fn test_escaped_name_matches_literally() {
        let name = "races: Record<TRace['name'], TRace>";
        let re = compile(&format!("^{}$", escaped(name))).unwrap();
        assert!(re.is_match(name).unwrap());
        assert!(!re.is_match("races: RecordXTRace['name'], TRace>").unwrap());
    }

    #[test]
    fn test_not_after_ident_guard() {
        let re = compile(&format!("{NOT_AFTER_IDENT}events")).unwrap();
        assert!(re.is_match("\tevents: {").unwrap());
        assert!(!re.is_match("myevents: {").unwrap());
        assert!(!re.is_match("my_events: {").unwrap());
    }
}
