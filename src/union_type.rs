//! # Union Extender
//!
//! Edits string-literal union aliases such as
//! `export type TKingdomPassageId = 'kingdom-annie-intro' | 'kingdom-annie-palace';`.
//! An alias without members is written as `= never;`, so `never` is dropped
//! before a variant is appended.
//!
//! Presence is checked by substring containment on the normalized right-hand
//! side, not by comparing variants. Adding `'a'` to a union that already holds
//! `'abc'` is therefore a no-op.
//!
//! A declaration is only found through its `type` keyword. A bare
//! `TName = ...;` assignment is never taken for a union.

use crate::error::{PatchError, PatchResult};
use crate::pattern::{self, NOT_AFTER_IDENT};
use fancy_regex::Regex;
use once_cell::sync::Lazy;
use std::ops::Range;

/// `never` joined to a neighbouring `|`. A `never` inside a quoted literal or
/// a longer identifier is not a match.
static NEVER_WITH_PIPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\s*\|\s*(?<![A-Za-z0-9_$'"`-])never(?![A-Za-z0-9_$'"`-])|(?<![A-Za-z0-9_$'"`-])never(?![A-Za-z0-9_$'"`-])\s*\|\s*"#,
    )
    .expect("Invalid regex")
});

static BARE_NEVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?<![A-Za-z0-9_$'"`-])never(?![A-Za-z0-9_$'"`-])"#).expect("Invalid regex")
});

/// Separator placed before an appended variant.
const VARIANT_SEPARATOR: &str = " |\n\t";

/// A parsed `type Name = A | B | …;` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionDeclaration {
    pub type_name: String,
    /// Variants in declaration order, `never` excluded.
    pub variants: Vec<String>,
    pub has_never: bool,
    /// Byte range of the right-hand side in the parsed buffer, without the
    /// whitespace that surrounds it.
    rhs_span: Range<usize>,
    /// Right-hand side with `never` stripped and trimmed.
    normalized: String,
}

impl UnionDeclaration {
    /// Finds the first `type <type_name> = …;` declaration in `source`.
    pub fn parse(source: &str, type_name: &str) -> PatchResult<Self> {
        let declaration = pattern::compile(&format!(
            r"{NOT_AFTER_IDENT}type\s+{}\s*=\s*([\s\S]*?)\s*;",
            pattern::escaped(type_name)
        ))?;

        let Some(rhs) = declaration
            .captures(source)?
            .and_then(|caps| caps.get(1))
        else {
            return Err(PatchError::ContainerNotFound {
                name: type_name.to_string(),
            });
        };

        let raw = rhs.as_str();
        let has_never = BARE_NEVER.is_match(raw)?;
        let normalized = strip_never(raw)?;
        let variants = split_variants(&normalized)
            .into_iter()
            .map(str::trim)
            .filter(|variant| !variant.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            type_name: type_name.to_string(),
            variants,
            has_never,
            rhs_span: rhs.start()..rhs.end(),
            normalized,
        })
    }

    /// Substring containment on the normalized right-hand side.
    pub fn contains(&self, variant: &str) -> bool {
        self.normalized.contains(variant)
    }

    /// The normalized right-hand side with `variant` appended.
    pub fn extended_rhs(&self, variant: &str) -> String {
        if self.normalized.is_empty() {
            variant.to_string()
        } else {
            format!("{}{VARIANT_SEPARATOR}{variant}", self.normalized)
        }
    }
}

fn strip_never(rhs: &str) -> PatchResult<String> {
    let without_piped = pattern::replace_all(&NEVER_WITH_PIPE, rhs, "")?;
    let without_bare = pattern::replace_all(&BARE_NEVER, &without_piped, "")?;
    Ok(without_bare.trim().to_string())
}

/// Splits on `|` outside quotes and brackets, keeping the surrounding
/// whitespace of every piece.
fn split_variants(rhs: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;
    let mut previous = '\0';

    for (index, ch) in rhs.char_indices() {
        match quote {
            Some(open) => {
                if ch == open && previous != '\\' {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' | '`' => quote = Some(ch),
                '(' | '[' | '{' | '<' => depth += 1,
                '>' if previous == '=' => {}
                ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
                '|' if depth == 0 => {
                    pieces.push(&rhs[start..index]);
                    start = index + 1;
                }
                _ => {}
            },
        }
        previous = ch;
    }
    pieces.push(&rhs[start..]);
    pieces
}

/// Appends `new_variant` to the union alias `type_name`, once.
///
/// A `never` placeholder is dropped on the way. If the right-hand side
/// already contains `new_variant` as a substring the buffer is returned
/// unchanged.
pub fn extend_union_type(source: &str, type_name: &str, new_variant: &str) -> PatchResult<String> {
    let declaration = UnionDeclaration::parse(source, type_name)?;
    if declaration.contains(new_variant) {
        return Ok(source.to_string());
    }
    let rhs = declaration.extended_rhs(new_variant);
    Ok(pattern::splice(source, declaration.rhs_span.clone(), &rhs))
}

/// Removes the variant equal to `variant` (ignoring surrounding whitespace)
/// together with one adjacent `|`. An alias left without variants becomes
/// `never`.
pub fn shrink_union_type(source: &str, type_name: &str, variant: &str) -> PatchResult<String> {
    let declaration = UnionDeclaration::parse(source, type_name)?;
    let raw = &source[declaration.rhs_span.clone()];

    let mut pieces = split_variants(raw);
    let Some(position) = pieces
        .iter()
        .position(|piece| piece.trim() == variant.trim())
    else {
        return Err(PatchError::VariantNotFound {
            type_name: type_name.to_string(),
            variant: variant.to_string(),
        });
    };
    pieces.remove(position);

    let joined = pieces.join("|");
    let remaining = joined.trim();
    let rhs = if remaining.is_empty() { "never" } else { remaining };
    Ok(pattern::splice(source, declaration.rhs_span.clone(), rhs))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINGDOM: &str =
        "export type TKingdomPassageId = 'kingdom-annie-intro' | 'kingdom-annie-palace';";

    #[test]
    fn test_extend_union_type() {
        let result = extend_union_type(KINGDOM, "TKingdomPassageId", "'kingdom-annie-dungeon'").unwrap();
        assert_eq!(
            result,
            "export type TKingdomPassageId = 'kingdom-annie-intro' | 'kingdom-annie-palace' |\n\t'kingdom-annie-dungeon';"
        );
    }

    #[test]
    fn test_extend_does_not_add_duplicate() {
        let result = extend_union_type(KINGDOM, "TKingdomPassageId", "'kingdom-annie-palace'").unwrap();
        assert_eq!(result, KINGDOM);
    }

    #[test]
    fn test_extend_with_present_variant_is_unchanged() {
        let source = "type T = 'a' | 'b';";
        assert_eq!(extend_union_type(source, "T", "'a'").unwrap(), source);
    }

    #[test]
    fn test_extend_drops_trailing_never() {
        let result = extend_union_type("type T = 'a' | 'b' | never;", "T", "'c'").unwrap();
        assert_eq!(result, "type T = 'a' | 'b' |\n\t'c';");
    }

    #[test]
    fn test_assignment_without_type_keyword_is_not_a_union() {
        assert_eq!(
            extend_union_type("const T = 'a';", "T", "'b'"),
            Err(PatchError::ContainerNotFound { name: "T".to_string() })
        );
    }

    #[test]
    fn test_extend_removes_never() {
        let source = "export type TKingdomPassageId = 'kingdom-annie-intro' | 'kingdom-annie-palace' | never;";
        let result = extend_union_type(source, "TKingdomPassageId", "'kingdom-annie-dungeon'").unwrap();
        assert_eq!(
            result,
            "export type TKingdomPassageId = 'kingdom-annie-intro' | 'kingdom-annie-palace' |\n\t'kingdom-annie-dungeon';"
        );
    }

    #[test]
    fn test_extend_multiline_union() {
        let source = "export type TKingdomPassageId = \n        'kingdom-annie-intro' |\n        'kingdom-annie-palace' |\n        never;\n        ";
        let expected = "export type TKingdomPassageId = \n        'kingdom-annie-intro' |\n        'kingdom-annie-palace' |\n\t'kingdom-annie-dungeon';\n        ";
        let result = extend_union_type(source, "TKingdomPassageId", "'kingdom-annie-dungeon'").unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_extend_empty_union() {
        let source = "export type TKingdomPassageId = never;";
        let result = extend_union_type(source, "TKingdomPassageId", "'kingdom-annie-dungeon'").unwrap();
        assert_eq!(result, "export type TKingdomPassageId = 'kingdom-annie-dungeon';");
    }

    #[test]
    fn test_extend_leading_never() {
        let source = "type T = never | 'a';";
        assert_eq!(extend_union_type(source, "T", "'b'").unwrap(), "type T = 'a' |\n\t'b';");
    }

    #[test]
    fn test_never_inside_literal_is_kept() {
        let source = "type T = 'never-again' | 'nevermore';";
        let declaration = UnionDeclaration::parse(source, "T").unwrap();
        assert!(!declaration.has_never);
        assert_eq!(declaration.variants, vec!["'never-again'", "'nevermore'"]);
    }

    #[test]
    fn test_substring_presence_is_imprecise() {
        // 'a' is reported present because it is a substring of 'abc'.
        let source = "type T = 'abc';";
        assert_eq!(extend_union_type(source, "T", "a").unwrap(), source);
    }

    #[test]
    fn test_extend_missing_type() {
        let result = extend_union_type(KINGDOM, "TCastlePassageId", "'x'");
        assert_eq!(
            result,
            Err(PatchError::ContainerNotFound {
                name: "TCastlePassageId".to_string()
            })
        );
    }

    #[test]
    fn test_extend_only_touches_named_type() {
        let source = "type TA = never;\ntype TB = never;\n";
        let result = extend_union_type(source, "TB", "'b'").unwrap();
        assert_eq!(result, "type TA = never;\ntype TB = 'b';\n");
    }

    #[test]
    fn test_parse_declaration() {
        let source = "export type T = 'a' |\n\t'b' | never;";
        let declaration = UnionDeclaration::parse(source, "T").unwrap();
        assert_eq!(declaration.type_name, "T");
        assert_eq!(declaration.variants, vec!["'a'", "'b'"]);
        assert!(declaration.has_never);
    }

    #[test]
    fn test_parse_ignores_pipes_inside_literals() {
        let source = "type T = 'a|b' | Record<'x' | 'y', number>;";
        let declaration = UnionDeclaration::parse(source, "T").unwrap();
        assert_eq!(declaration.variants, vec!["'a|b'", "Record<'x' | 'y', number>"]);
    }

    #[test]
    fn test_shrink_union_type() {
        let source = "type T = 'a' | 'b' |\n\t'c';";
        assert_eq!(shrink_union_type(source, "T", "'b'").unwrap(), "type T = 'a' |\n\t'c';");
        assert_eq!(shrink_union_type(source, "T", "'a'").unwrap(), "type T = 'b' |\n\t'c';");
        assert_eq!(shrink_union_type(source, "T", "'c'").unwrap(), "type T = 'a' | 'b';");
    }

    #[test]
    fn test_shrink_last_variant_restores_never() {
        let source = "type T = 'x';";
        assert_eq!(shrink_union_type(source, "T", "'x'").unwrap(), "type T = never;");
    }

    #[test]
    fn test_extend_then_shrink_round_trip() {
        for source in [KINGDOM, "type T = never;"] {
            let type_name = if source == KINGDOM { "TKingdomPassageId" } else { "T" };
            let extended = extend_union_type(source, type_name, "'kingdom-annie-dungeon'").unwrap();
            let shrunk = shrink_union_type(&extended, type_name, "'kingdom-annie-dungeon'").unwrap();
            assert_eq!(shrunk, source);
        }
    }

    #[test]
    fn test_shrink_missing_variant() {
        let result = shrink_union_type(KINGDOM, "TKingdomPassageId", "'kingdom'");
        assert_eq!(
            result,
            Err(PatchError::VariantNotFound {
                type_name: "TKingdomPassageId".to_string(),
                variant: "'kingdom'".to_string(),
            })
        );
    }
}
