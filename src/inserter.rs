//! # Entry Inserter
//!
//! Appends one entry to a located container and re-emits the container with
//! the indentation of its closing brace. There is no positional control and
//! no duplicate detection: the entry always lands last, and inserting the
//! same key twice produces it twice.

use crate::container::{self, ContainerKind, ContainerMatch};
use crate::error::PatchResult;
use crate::indent::{self, INDENT_UNIT};
use crate::pattern;

/// How entries of a container are terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuation {
    /// Value containers: `thomas: Thomas,`
    Comma,
    /// Type containers: `thomas: { ref: TCharacter<'thomas'> } & TCharacterData;`
    Semicolon,
}

impl Punctuation {
    fn terminator(self) -> &'static str {
        match self {
            Punctuation::Comma => ",\n",
            Punctuation::Semicolon => ";\n",
        }
    }
}

/// Renders `container` with `entry` appended as its last entry.
pub fn render_insertion(container: &ContainerMatch<'_>, entry: &str, punctuation: Punctuation) -> String {
    let depth = container.depth();
    let opening = container.kind.opening(container.name);

    let mut new_entry = indent::reindent(entry, depth);
    new_entry.push_str(punctuation.terminator());

    if container.is_empty() {
        return format!("{opening}\n{new_entry}{depth}}}");
    }

    let mut existing = container.inner_body.trim().to_string();
    if punctuation == Punctuation::Comma && !existing.ends_with(',') {
        existing.push(',');
    }

    format!("{opening}\n{depth}{INDENT_UNIT}{existing}\n{new_entry}{depth}}}")
}

fn insert(
    kind: ContainerKind,
    container_name: &str,
    source: &str,
    entry: &str,
    punctuation: Punctuation,
) -> PatchResult<String> {
    let found = container::locate(source, container_name, kind)?;
    let rendered = render_insertion(&found, entry, punctuation);
    Ok(pattern::splice(source, found.span.clone(), &rendered))
}

/// Appends `entry` to the `container_name: { … }` object in `source`.
pub fn insert_into_named_object(
    container_name: &str,
    source: &str,
    entry: &str,
    punctuation: Punctuation,
) -> PatchResult<String> {
    insert(ContainerKind::Named, container_name, source, entry, punctuation)
}

/// Appends `entry` to the `container_name = { … }` object in `source`.
pub fn insert_into_assigned_object(
    container_name: &str,
    source: &str,
    entry: &str,
    punctuation: Punctuation,
) -> PatchResult<String> {
    insert(ContainerKind::Assigned, container_name, source, entry, punctuation)
}
