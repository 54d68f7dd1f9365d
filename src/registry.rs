//! Registry edits for each entity kind.
//!
//! Everything here maps file contents to file contents; reading and writing
//! is left to the [`crate::workspace`]. `module` arguments are import
//! specifiers relative to the data directory, e.g. `./characters/thomas`.

use crate::error::PatchError;
use crate::inserter::{Punctuation, insert_into_assigned_object, insert_into_named_object};
use crate::naming::{PassageRef, capitalize};
use crate::remover::{remove_from_assigned_object, remove_from_named_object};
use crate::templates::{self, RACES_CONTAINER};
use crate::text;
use crate::union_type::{extend_union_type, shrink_union_type};
use anyhow::{Context, Result};
use std::fmt;
use tracing::{debug, warn};

/// Entity kinds that are listed in both `register.ts` and `TWorldState.ts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Character,
    SideCharacter,
    Location,
    Event,
}

impl EntityKind {
    /// Name of the container holding this kind, in both registry files.
    pub fn container(self) -> &'static str {
        match self {
            EntityKind::Character => "characters",
            EntityKind::SideCharacter => "sideCharacters",
            EntityKind::Location => "locations",
            EntityKind::Event => "events",
        }
    }

    /// Exported symbol of the entity's own file.
    pub fn symbol(self, id: &str) -> String {
        match self {
            EntityKind::Character | EntityKind::SideCharacter => capitalize(id),
            EntityKind::Location => format!("{id}Location"),
            EntityKind::Event => format!("{id}Event"),
        }
    }

    /// Exported data type of the entity's own file.
    pub fn data_type(self, id: &str) -> String {
        let suffix = match self {
            EntityKind::Character => "CharacterData",
            EntityKind::SideCharacter => "SideCharacterData",
            EntityKind::Location => "LocationData",
            EntityKind::Event => "EventData",
        };
        format!("T{}{suffix}", capitalize(id))
    }

    fn world_state_member(self, id: &str) -> String {
        let data_type = self.data_type(id);
        match self {
            EntityKind::Character => {
                format!("{id}: {{ ref: TCharacter<'{id}'> }} & TCharacterData & Partial<{data_type}>")
            }
            EntityKind::SideCharacter => format!(
                "{id}: {{ ref: TSideCharacter<'{id}'> }} & TSideCharacterData & Partial<{data_type}>"
            ),
            EntityKind::Location => format!("{id}: {{ ref: TLocation<'{id}'> }} & Partial<{data_type}>"),
            EntityKind::Event => format!("{id}: {{ ref: TEvent<'{id}'> }} & {data_type}"),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Character => "character",
            EntityKind::SideCharacter => "side character",
            EntityKind::Location => "location",
            EntityKind::Event => "event",
        };
        f.write_str(label)
    }
}

/// One entity as the registry files refer to it.
#[derive(Debug, Clone, Copy)]
pub struct Entity<'a> {
    pub kind: EntityKind,
    pub id: &'a str,
    pub module: &'a str,
}

impl Entity<'_> {
    pub fn register_import(&self) -> String {
        format!("import {{ {} }} from '{}';\n", self.kind.symbol(self.id), self.module)
    }

    pub fn world_state_import(&self) -> String {
        format!("import {{ {} }} from '{}';\n", self.kind.data_type(self.id), self.module)
    }

    fn register_entry(&self) -> String {
        format!("{}: {}", self.id, self.kind.symbol(self.id))
    }
}

fn remove_import(source: &str, import: &str) -> String {
    match text::remove_first(source, import) {
        Some(updated) => updated,
        None => {
            warn!(import = import.trim_end(), "import line not found, leaving imports unchanged");
            source.to_string()
        }
    }
}

pub fn add_to_register(entity: &Entity<'_>, source: &str) -> Result<String> {
    debug!(kind = %entity.kind, id = entity.id, "adding to register");
    let with_import = text::prepend(source, &entity.register_import());
    insert_into_named_object(
        entity.kind.container(),
        &with_import,
        &entity.register_entry(),
        Punctuation::Comma,
    )
    .with_context(|| format!("Failed to add {} '{}' to the register", entity.kind, entity.id))
}

pub fn add_to_world_state(entity: &Entity<'_>, source: &str) -> Result<String> {
    debug!(kind = %entity.kind, id = entity.id, "adding to world state");
    let with_import = text::prepend(source, &entity.world_state_import());
    insert_into_named_object(
        entity.kind.container(),
        &with_import,
        &entity.kind.world_state_member(entity.id),
        Punctuation::Semicolon,
    )
    .with_context(|| format!("Failed to add {} '{}' to the world state", entity.kind, entity.id))
}

pub fn remove_from_register(entity: &Entity<'_>, source: &str) -> Result<String> {
    debug!(kind = %entity.kind, id = entity.id, "removing from register");
    let without_import = remove_import(source, &entity.register_import());
    remove_from_named_object(entity.kind.container(), &without_import, entity.id)
        .with_context(|| format!("Failed to remove {} '{}' from the register", entity.kind, entity.id))
}

pub fn remove_from_world_state(entity: &Entity<'_>, source: &str) -> Result<String> {
    debug!(kind = %entity.kind, id = entity.id, "removing from world state");
    let without_import = remove_import(source, &entity.world_state_import());
    remove_from_named_object(entity.kind.container(), &without_import, entity.id).with_context(|| {
        format!("Failed to remove {} '{}' from the world state", entity.kind, entity.id)
    })
}

/// Container of the lazy passage loaders in the register.
pub const PASSAGES_CONTAINER: &str = "passages";

fn passages_loader(event_id: &str, passages_module: &str) -> String {
    format!("{event_id}: () => import('{passages_module}')")
}

/// Adds the lazy loader of an event's passage map to the register.
pub fn add_passages_loader(event_id: &str, passages_module: &str, source: &str) -> Result<String> {
    insert_into_named_object(
        PASSAGES_CONTAINER,
        source,
        &passages_loader(event_id, passages_module),
        Punctuation::Comma,
    )
    .with_context(|| format!("Failed to add the passages of event '{event_id}' to the register"))
}

/// Removes an event's passage loader from the register.
///
/// Older registers spread the passage maps instead
/// (`...villageEventPassages,`); such lines are dropped too. A missing
/// loader is not an error.
pub fn remove_passages_loader(event_id: &str, source: &str) -> Result<String> {
    let without_loader = match remove_from_named_object(PASSAGES_CONTAINER, source, event_id) {
        Ok(updated) => updated,
        Err(err @ (PatchError::EntryNotFound { .. } | PatchError::ContainerNotFound { .. })) => {
            warn!(event = event_id, "{err}, skipping passage loader");
            source.to_string()
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to remove the passages of event '{event_id}' from the register")
            });
        }
    };
    let spread = format!("...{}", templates::event_passages_symbol(event_id));
    if without_loader.contains(&spread) {
        Ok(text::remove_lines_containing(&without_loader, &spread))
    } else {
        Ok(without_loader)
    }
}

fn passage_import(passage: &PassageRef, module: &str) -> String {
    format!("import {{ {} }} from '{module}';\n", passage.symbol())
}

/// Adds a passage to its event's passage map: import, id union and record
/// entry. `module` is relative to the event folder.
pub fn add_passage(passage: &PassageRef, module: &str, source: &str) -> Result<String> {
    let event = &passage.event;
    debug!(passage = %passage, "adding to passage map");
    let with_import = text::prepend(source, &passage_import(passage, module));
    let with_id = extend_union_type(&with_import, &templates::passage_id_type(event), &passage.literal())
        .with_context(|| format!("Failed to add passage id '{passage}' to event '{event}'"))?;
    insert_into_assigned_object(
        &templates::event_passages_container(event),
        &with_id,
        &format!("{}: {}", passage.literal(), passage.symbol()),
        Punctuation::Comma,
    )
    .with_context(|| format!("Failed to add passage '{passage}' to the passage map of event '{event}'"))
}

pub fn remove_passage(passage: &PassageRef, module: &str, source: &str) -> Result<String> {
    let event = &passage.event;
    debug!(passage = %passage, "removing from passage map");
    let without_import = remove_import(source, &passage_import(passage, module));
    let without_id =
        shrink_union_type(&without_import, &templates::passage_id_type(event), &passage.literal())
            .with_context(|| format!("Failed to remove passage id '{passage}' from event '{event}'"))?;
    remove_from_assigned_object(
        &templates::event_passages_container(event),
        &without_id,
        &passage.literal(),
    )
    .with_context(|| format!("Failed to remove passage '{passage}' from the passage map of event '{event}'"))
}

pub fn add_race(id: &str, name: &str, description: &str, source: &str) -> Result<String> {
    insert_into_assigned_object(
        RACES_CONTAINER,
        source,
        &templates::race_entry(id, name, description),
        Punctuation::Comma,
    )
    .with_context(|| format!("Failed to add race '{id}'"))
}

pub fn remove_race(id: &str, source: &str) -> Result<String> {
    remove_from_assigned_object(RACES_CONTAINER, source, id).with_context(|| format!("Failed to remove race '{id}'"))
}
