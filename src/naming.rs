//! Identifier rules for generated entities.
//!
//! The patcher writes ids into source text without looking at them, so every
//! id passes through [`validate_id`] before it reaches a template or a
//! registry entry. Display text (names, titles, descriptions) lands inside
//! quoted literals of entries that the patcher later has to find again, so it
//! passes through [`validate_text`].

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("Invalid regex"));

/// Starts with a letter, continues with letters, digits or `_`.
pub fn is_id_valid(id: &str) -> bool {
    ID_REGEX.is_match(id)
}

pub fn validate_id(id: &str, what: &str) -> Result<()> {
    if is_id_valid(id) {
        Ok(())
    } else {
        Err(anyhow!(
            "Invalid {what} id '{id}'. An id must start with a letter and may only contain letters, digits and '_'."
        ))
    }
}

/// Characters that would end the surrounding literal or change the brace
/// nesting of a registry entry.
const FORBIDDEN_TEXT_CHARS: &[char] = &['{', '}', '\'', '`', '\\', '\n', '\r'];

pub fn validate_text(text: &str, what: &str) -> Result<()> {
    match text.chars().find(|ch| FORBIDDEN_TEXT_CHARS.contains(ch)) {
        Some(ch) => Err(anyhow!(
            "Invalid {what} {text:?}: it may not contain {ch:?}. Braces, quotes, backticks, backslashes and line breaks are not allowed."
        )),
        None => Ok(()),
    }
}

/// Derives an id from a display name: `"Old Tower"` becomes `old_tower`.
pub fn id_from_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

pub fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Addresses one passage: `<event>-<character>-<passage>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageRef {
    pub event: String,
    pub character: String,
    pub passage: String,
}

impl PassageRef {
    pub fn new(event: &str, character: &str, passage: &str) -> Result<Self> {
        validate_id(event, "event")?;
        validate_id(character, "character")?;
        validate_id(passage, "passage")?;
        Ok(Self {
            event: event.to_string(),
            character: character.to_string(),
            passage: passage.to_string(),
        })
    }

    pub fn parse(full_id: &str) -> Result<Self> {
        let parts: Vec<&str> = full_id.split('-').collect();
        match parts.as_slice() {
            [event, character, passage] => Self::new(event, character, passage),
            _ => Err(anyhow!(
                "Invalid passage id '{full_id}'. Expected format: eventId-characterId-passageId"
            )),
        }
    }

    /// The id as it appears in the passage id union, quotes included.
    pub fn literal(&self) -> String {
        format!("'{self}'")
    }

    /// Name of the exported passage function.
    pub fn symbol(&self) -> String {
        format!("{}{}Passage", self.character, capitalize(&self.passage))
    }
}

impl fmt::Display for PassageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.event, self.character, self.passage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_id_valid() {
        assert!(is_id_valid("thomas"));
        assert!(is_id_valid("old_tower2"));
        assert!(!is_id_valid(""));
        assert!(!is_id_valid("2fast"));
        assert!(!is_id_valid("_hidden"));
        assert!(!is_id_valid("old-tower"));
        assert!(!is_id_valid("old tower"));
    }

    #[test]
    fn test_id_from_name() {
        assert_eq!(id_from_name("  Old Tower "), "old_tower");
        assert_eq!(id_from_name("Thomas"), "thomas");
        assert_eq!(id_from_name("Grand\tHall  East"), "grand_hall_east");
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("Wood Elf", "race name").is_ok());
        assert!(validate_text("", "description").is_ok());
        for bad in ["O'Brien", "wears a } cloak", "a { b", "back\\slash", "two\nlines", "tick`"] {
            let err = validate_text(bad, "name").unwrap_err();
            assert!(err.to_string().starts_with("Invalid name"), "{bad:?} was accepted");
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("thomas"), "Thomas");
        assert_eq!(capitalize("old_tower"), "Old_tower");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_passage_ref_parse() {
        let passage = PassageRef::parse("kingdom-annie-dungeon").unwrap();
        assert_eq!(passage.event, "kingdom");
        assert_eq!(passage.character, "annie");
        assert_eq!(passage.passage, "dungeon");
        assert_eq!(passage.to_string(), "kingdom-annie-dungeon");
        assert_eq!(passage.literal(), "'kingdom-annie-dungeon'");
        assert_eq!(passage.symbol(), "annieDungeonPassage");
    }

    #[test]
    fn test_passage_ref_parse_rejects_bad_format() {
        let err = PassageRef::parse("kingdom-annie").unwrap_err();
        assert!(err.to_string().contains("Expected format"));
        assert!(PassageRef::parse("kingdom-annie-dungeon-2").is_err());
        assert!(PassageRef::parse("kingdom-annie-2nd").is_err());
    }
}
