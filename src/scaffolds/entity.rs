//! Characters, side characters and locations: one file each, plus an entry
//! in the register and the world state.

use super::{Scaffold, data_module};
use crate::layout::ProjectLayout;
use crate::naming::{id_from_name, validate_id, validate_text};
use crate::registry::{self, Entity, EntityKind};
use crate::templates;
use crate::workspace::Transaction;
use anyhow::{Result, bail};
use std::path::PathBuf;

fn entity_file(layout: &ProjectLayout, kind: EntityKind, id: &str) -> Result<PathBuf> {
    match kind {
        EntityKind::Character => Ok(layout.character_file(id)),
        EntityKind::SideCharacter => Ok(layout.side_character_file(id)),
        EntityKind::Location => Ok(layout.location_file(id)),
        EntityKind::Event => bail!("Events are created with their own scaffold"),
    }
}

pub struct CreateEntity {
    kind: EntityKind,
    id: String,
    name: String,
}

impl CreateEntity {
    /// Without an explicit id, the id is derived from `name`.
    pub fn new(kind: EntityKind, name: &str, id: Option<&str>) -> Result<Self> {
        if kind == EntityKind::Event {
            bail!("Events are created with their own scaffold");
        }
        let id = id.map(str::to_string).unwrap_or_else(|| id_from_name(name));
        validate_id(&id, &kind.to_string())?;
        validate_text(name, &format!("{kind} name"))?;
        Ok(Self {
            kind,
            id,
            name: name.trim().to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn content(&self) -> String {
        match self.kind {
            EntityKind::Character => templates::character_file(&self.id, &self.name),
            EntityKind::SideCharacter => templates::side_character_file(&self.id, &self.name),
            _ => templates::location_file(&self.id, &self.name),
        }
    }
}

impl Scaffold for CreateEntity {
    fn name(&self) -> String {
        format!("create {} {}", self.kind, self.id)
    }

    fn targets(&self, layout: &ProjectLayout) -> Vec<PathBuf> {
        let mut targets = vec![layout.register_file(), layout.world_state_file()];
        targets.extend(entity_file(layout, self.kind, &self.id));
        targets
    }

    fn plan(&self, tx: &mut Transaction<'_>) -> Result<()> {
        let layout = tx.layout();
        let file = entity_file(layout, self.kind, &self.id)?;
        if tx.exists(&file) {
            bail!("A {} with the id '{}' already exists", self.kind, self.id);
        }
        tx.create(&file, self.content())?;

        let module = data_module(layout, &file);
        let entity = Entity {
            kind: self.kind,
            id: &self.id,
            module: &module,
        };
        tx.update(&layout.register_file(), |source| registry::add_to_register(&entity, source))?;
        tx.update(&layout.world_state_file(), |source| {
            registry::add_to_world_state(&entity, source)
        })?;
        Ok(())
    }
}

pub struct RemoveEntity {
    kind: EntityKind,
    id: String,
}

impl RemoveEntity {
    pub fn new(kind: EntityKind, id: &str) -> Result<Self> {
        if kind == EntityKind::Event {
            bail!("Events are removed with their own scaffold");
        }
        validate_id(id, &kind.to_string())?;
        Ok(Self {
            kind,
            id: id.to_string(),
        })
    }
}

impl Scaffold for RemoveEntity {
    fn name(&self) -> String {
        format!("remove {} {}", self.kind, self.id)
    }

    fn targets(&self, layout: &ProjectLayout) -> Vec<PathBuf> {
        let mut targets = vec![layout.register_file(), layout.world_state_file()];
        targets.extend(entity_file(layout, self.kind, &self.id));
        targets
    }

    fn plan(&self, tx: &mut Transaction<'_>) -> Result<()> {
        let layout = tx.layout();
        let file = entity_file(layout, self.kind, &self.id)?;
        if !tx.exists(&file) {
            bail!("There is no {} with the id '{}'", self.kind, self.id);
        }
        tx.delete_file(&file)?;

        let module = data_module(layout, &file);
        let entity = Entity {
            kind: self.kind,
            id: &self.id,
            module: &module,
        };
        tx.update(&layout.register_file(), |source| {
            registry::remove_from_register(&entity, source)
        })?;
        tx.update(&layout.world_state_file(), |source| {
            registry::remove_from_world_state(&entity, source)
        })?;
        Ok(())
    }
}
