//! Plain-text edits used next to the structural patches: import lines are
//! prepended and removed verbatim, and legacy spread lines are dropped by
//! substring.

/// Prepends a line (which carries its own trailing newline) to `source`.
pub fn prepend(source: &str, line: &str) -> String {
    format!("{line}{source}")
}

/// Removes the first occurrence of `text`. Returns `None` when it does not
/// occur.
pub fn remove_first(source: &str, text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    source.find(text).map(|start| {
        let mut out = String::with_capacity(source.len() - text.len());
        out.push_str(&source[..start]);
        out.push_str(&source[start + text.len()..]);
        out
    })
}

/// Drops every line that contains `needle`.
pub fn remove_lines_containing(source: &str, needle: &str) -> String {
    source
        .split('\n')
        .filter(|line| !line.contains(needle))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_and_remove_first_round_trip() {
        let source = "export const register = {};\n";
        let import = "import { Thomas } from './characters/thomas';\n";
        let with_import = prepend(source, import);
        assert!(with_import.starts_with(import));
        assert_eq!(remove_first(&with_import, import).as_deref(), Some(source));
    }

    #[test]
    fn test_remove_first_only_removes_one() {
        assert_eq!(remove_first("a-b-a", "a").as_deref(), Some("-b-a"));
        assert_eq!(remove_first("abc", "x"), None);
        assert_eq!(remove_first("abc", ""), None);
    }

    #[test]
    fn test_remove_lines_containing() {
        let source = "passages: {\n\t...villageEventPassages,\n\t...castleEventPassages,\n}";
        assert_eq!(
            remove_lines_containing(source, "...villageEventPassages"),
            "passages: {\n\t...castleEventPassages,\n}"
        );
    }
}
