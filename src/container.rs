//! # Container Locator
//!
//! Finds a named object literal inside a source buffer without parsing the
//! language. A container is either an object property (`name: { … }`) or a
//! binding (`name = { … }`).
//!
//! The body is captured with a bounded pattern that allows at most one level
//! of balanced braces inside each entry. Registry entries are either single
//! line values (`thomas: Thomas`) or one-level objects
//! (`thomas: { ref: TCharacter<'thomas'> } & TCharacterData`), which this
//! covers. A container whose entries nest deeper is reported as
//! [`PatchError::MalformedContainer`] instead of being patched partially.

use crate::error::{PatchError, PatchResult};
use crate::indent;
use crate::pattern::{self, BOUNDED_BODY, NOT_AFTER_IDENT};
use std::ops::Range;

/// How the container name is bound to its object literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// `name: { … }`, an object property or annotated member.
    Named,
    /// `name = { … }`, a top-level binding.
    Assigned,
}

impl ContainerKind {
    /// The header used when the container is re-emitted.
    pub fn opening(self, name: &str) -> String {
        match self {
            ContainerKind::Named => format!("{name}: {{"),
            ContainerKind::Assigned => format!("{name} = {{"),
        }
    }

    fn header_pattern(self, escaped_name: &str) -> String {
        match self {
            ContainerKind::Named => format!(r"{NOT_AFTER_IDENT}{escaped_name}:\s*\{{"),
            ContainerKind::Assigned => format!(r"{NOT_AFTER_IDENT}{escaped_name}\s*=\s*\{{"),
        }
    }
}

/// A located container. Borrowed from the buffer it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerMatch<'a> {
    pub name: &'a str,
    /// Byte range of `full_span` inside the buffer.
    pub span: Range<usize>,
    /// From the first character of the name through the closing brace.
    pub full_span: &'a str,
    /// Text between the opening and the closing brace.
    pub inner_body: &'a str,
    pub kind: ContainerKind,
}

impl<'a> ContainerMatch<'a> {
    pub fn uses_assignment(&self) -> bool {
        self.kind == ContainerKind::Assigned
    }

    /// Whitespace that precedes the closing brace.
    pub fn depth(&self) -> &'a str {
        indent::depth_string(self.full_span)
    }

    pub fn is_empty(&self) -> bool {
        self.inner_body.trim().is_empty()
    }
}

/// Locates the first container called `name` in `buffer`.
///
/// Only the first header occurrence is considered. If its body cannot be
/// captured, the container is malformed; a later occurrence of the same name
/// is never patched in its place.
pub fn locate<'a>(buffer: &'a str, name: &'a str, kind: ContainerKind) -> PatchResult<ContainerMatch<'a>> {
    let header_pattern = kind.header_pattern(&pattern::escaped(name));
    let header_re = pattern::compile(&header_pattern)?;

    let Some(header) = header_re.find(buffer)? else {
        return Err(PatchError::ContainerNotFound {
            name: name.to_string(),
        });
    };

    let full_re = pattern::compile(&format!("{header_pattern}{BOUNDED_BODY}"))?;
    let captures = full_re
        .captures_from_pos(buffer, header.start())?
        .filter(|caps| caps.get(0).is_some_and(|m| m.start() == header.start()));

    let Some(captures) = captures else {
        return Err(PatchError::MalformedContainer {
            name: name.to_string(),
            reason: diagnose(buffer, header.end() - 1),
        });
    };

    // Group 0 and group 1 always participate in a successful match.
    let (Some(full), Some(body)) = (captures.get(0), captures.get(1)) else {
        return Err(PatchError::MalformedContainer {
            name: name.to_string(),
            reason: "body could not be captured".to_string(),
        });
    };

    Ok(ContainerMatch {
        name,
        span: full.start()..full.end(),
        full_span: full.as_str(),
        inner_body: body.as_str(),
        kind,
    })
}

/// Explains why the body starting at the brace at `open_index` was rejected.
fn diagnose(buffer: &str, open_index: usize) -> String {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    for ch in buffer[open_index..].chars() {
        match ch {
            '{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return format!(
                        "entries nest {} levels of braces, at most 1 is supported",
                        deepest - 1
                    );
                }
            }
            _ => {}
        }
    }
    "no matching closing brace".to_string()
}
