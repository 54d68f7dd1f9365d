//! # Entry Remover
//!
//! Deletes a keyed entry from a located container. Two passes are tried:
//!
//! 1.  **Object entry**: `key: { … }` (one level of nesting, like the
//!     locator) through the end of its line.
//! 2.  **Line entry**: when the first pass changed nothing, the whole line
//!     starting with `key:`.
//!
//! The matched text, including the whitespace before the key, is replaced by
//! a single newline so that removal never leaves more than one line break
//! behind. Every occurrence inside the container is removed.

use crate::container::{self, ContainerKind, ContainerMatch};
use crate::error::{PatchError, PatchResult};
use crate::pattern::{self, NOT_AFTER_IDENT};

/// Renders `container` without the entry called `key`.
pub fn render_removal(container: &ContainerMatch<'_>, key: &str) -> PatchResult<String> {
    let key_pattern = pattern::escaped(key);
    let span = container.full_span;

    let object_entry = pattern::compile(&format!(
        r"{NOT_AFTER_IDENT}\s*{key_pattern}:\s*\{{(?:\{{[^{{}}]*\}}|[^{{}}])*\}}.*\n"
    ))?;
    let without_object = pattern::replace_all(&object_entry, span, "\n")?;
    if without_object != span {
        return Ok(without_object);
    }

    let line_entry = pattern::compile(&format!(r"{NOT_AFTER_IDENT}\s*{key_pattern}:.*\n"))?;
    let without_line = pattern::replace_all(&line_entry, span, "\n")?;
    if without_line != span {
        return Ok(without_line);
    }

    Err(PatchError::EntryNotFound {
        container: container.name.to_string(),
        key: key.to_string(),
    })
}

fn remove(kind: ContainerKind, container_name: &str, source: &str, key: &str) -> PatchResult<String> {
    let found = container::locate(source, container_name, kind)?;
    let rendered = render_removal(&found, key)?;
    Ok(pattern::splice(source, found.span.clone(), &rendered))
}

/// Removes the entry `key` from the `container_name: { … }` object in `source`.
pub fn remove_from_named_object(container_name: &str, source: &str, key: &str) -> PatchResult<String> {
    remove(ContainerKind::Named, container_name, source, key)
}

/// Removes the entry `key` from the `container_name = { … }` object in `source`.
pub fn remove_from_assigned_object(container_name: &str, source: &str, key: &str) -> PatchResult<String> {
    remove(ContainerKind::Assigned, container_name, source, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD_STATE: &str = "export type TWorldState = {
\tcharacters: {
\t\tthomas: { ref: TCharacter<'thomas'> } & TCharacterData & Partial<TThomasCharacterData>;
\t\tanna: { ref: TCharacter<'anna'> } & TCharacterData & Partial<TAnnaCharacterData>;
\t};
};
";

    #[test]
    fn test_remove_object_entry() {
        let result = remove_from_named_object("characters", WORLD_STATE, "thomas").unwrap();
        assert_eq!(
            result,
            "export type TWorldState = {
\tcharacters: {
\t\tanna: { ref: TCharacter<'anna'> } & TCharacterData & Partial<TAnnaCharacterData>;
\t};
};
"
        );
    }

    #[test]
    fn test_remove_last_object_entry() {
        let result = remove_from_named_object("characters", WORLD_STATE, "anna").unwrap();
        assert!(!result.contains("anna"));
        assert!(result.contains("\t\tthomas: { ref: TCharacter<'thomas'> }"));
        assert!(result.contains("TThomasCharacterData>;\n\t};\n};\n"));
    }

    #[test]
    fn test_remove_line_entry() {
        let source = "characters: {\n\tthomas: Thomas,\n\tanna: Anna,\n\tjohn: John,\n}";
        let result = remove_from_named_object("characters", source, "anna").unwrap();
        assert_eq!(result, "characters: {\n\tthomas: Thomas,\n\tjohn: John,\n}");
    }

    #[test]
    fn test_brace_and_line_entries_side_by_side() {
        let source = "x: {\n\tk: { a: 1 },\n\tj: 5,\n\tm: 2,\n}";
        assert_eq!(
            remove_from_named_object("x", source, "k").unwrap(),
            "x: {\n\tj: 5,\n\tm: 2,\n}"
        );
        assert_eq!(
            remove_from_named_object("x", source, "j").unwrap(),
            "x: {\n\tk: { a: 1 },\n\tm: 2,\n}"
        );
    }

    #[test]
    fn test_remove_line_entry_with_arrow_function_value() {
        let source = "passages: {\n\tvillage: () => import('./events/village/village.passages'),\n\tcastle: () => import('./events/castle/castle.passages'),\n}";
        let result = remove_from_named_object("passages", source, "village").unwrap();
        assert_eq!(
            result,
            "passages: {\n\tcastle: () => import('./events/castle/castle.passages'),\n}"
        );
    }

    #[test]
    fn test_remove_does_not_match_longer_key() {
        let source = "characters: {\n\tjoanna: Joanna,\n\tanna: Anna,\n}";
        let result = remove_from_named_object("characters", source, "anna").unwrap();
        assert_eq!(result, "characters: {\n\tjoanna: Joanna,\n}");
    }

    #[test]
    fn test_remove_missing_key_is_reported() {
        let source = "characters: {\n\tthomas: Thomas,\n}";
        let result = remove_from_named_object("characters", source, "anna");
        assert_eq!(
            result,
            Err(PatchError::EntryNotFound {
                container: "characters".to_string(),
                key: "anna".to_string(),
            })
        );
    }

    #[test]
    fn test_remove_from_missing_container_is_reported() {
        let result = remove_from_named_object("locations", WORLD_STATE, "thomas");
        assert_eq!(
            result,
            Err(PatchError::ContainerNotFound {
                name: "locations".to_string()
            })
        );
    }

    #[test]
    fn test_remove_from_assigned_object_with_quoted_key() {
        let source = "const kingdomEventPassages: Record<TKingdomPassageId, TPassage> = {\n\t'kingdom-annie-intro': annieIntroPassage,\n\t'kingdom-annie-palace': anniePalacePassage,\n};";
        let result = remove_from_assigned_object(
            "kingdomEventPassages: Record<TKingdomPassageId, TPassage>",
            source,
            "'kingdom-annie-intro'",
        )
        .unwrap();
        assert_eq!(
            result,
            "const kingdomEventPassages: Record<TKingdomPassageId, TPassage> = {\n\t'kingdom-annie-palace': anniePalacePassage,\n};"
        );
    }

    #[test]
    fn test_remove_multiline_object_entry() {
        let source = "races = {\n\thuman: {\n\t\tname: _('Human'),\n\t},\n\telf: {\n\t\tname: _('Elf'),\n\t},\n}";
        let result = remove_from_assigned_object("races", source, "human").unwrap();
        assert_eq!(result, "races = {\n\telf: {\n\t\tname: _('Elf'),\n\t},\n}");
    }
}
