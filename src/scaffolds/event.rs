use super::{Scaffold, data_module};
use crate::layout::{PASSAGES_FOLDER_SUFFIX, ProjectLayout};
use crate::naming::{validate_id, validate_text};
use crate::registry::{self, Entity, EntityKind};
use crate::templates::{self, EventArgs, UNKNOWN_LOCATION};
use crate::workspace::Transaction;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Creates `events/<id>/` with the event file and its empty passage map, and
/// registers both.
pub struct CreateEvent {
    args: EventArgs,
}

impl CreateEvent {
    pub fn new(args: EventArgs) -> Result<Self> {
        validate_id(&args.id, "event")?;
        validate_id(&args.location, "location")?;
        validate_text(&args.title, "event title")?;
        validate_text(&args.description, "event description")?;
        validate_text(&args.start, "start time")?;
        validate_text(&args.end, "end time")?;
        Ok(Self { args })
    }

    pub fn id(&self) -> &str {
        &self.args.id
    }
}

impl Scaffold for CreateEvent {
    fn name(&self) -> String {
        format!("create event {}", self.args.id)
    }

    fn targets(&self, layout: &ProjectLayout) -> Vec<PathBuf> {
        vec![
            layout.register_file(),
            layout.world_state_file(),
            layout.event_dir(&self.args.id),
        ]
    }

    fn plan(&self, tx: &mut Transaction<'_>) -> Result<()> {
        let layout = tx.layout();
        let id = self.args.id.as_str();
        if tx.exists(&layout.event_dir(id)) {
            bail!("An event with the id '{id}' already exists");
        }
        if self.args.location != UNKNOWN_LOCATION && !layout.location_file(&self.args.location).exists() {
            warn!(event = id, location = %self.args.location, "event refers to a location that does not exist");
        }

        let event_file = layout.event_file(id);
        let passages_file = layout.event_passages_file(id);
        tx.create(&event_file, templates::event_file(&self.args))?;
        tx.create(&passages_file, templates::event_passages_file(id))?;

        let module = data_module(layout, &event_file);
        let passages_module = data_module(layout, &passages_file);
        let entity = Entity {
            kind: EntityKind::Event,
            id,
            module: &module,
        };
        tx.update(&layout.register_file(), |source| {
            let registered = registry::add_to_register(&entity, source)?;
            registry::add_passages_loader(id, &passages_module, &registered)
        })?;
        tx.update(&layout.world_state_file(), |source| {
            registry::add_to_world_state(&entity, source)
        })?;
        Ok(())
    }
}

/// Character passage folders (`<character>.passages`) inside an event folder.
pub fn passage_folders(event_dir: &Path) -> Result<Vec<String>> {
    let mut folders = Vec::new();
    for entry in fs::read_dir(event_dir)
        .with_context(|| format!("Failed to list '{}'", event_dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() && name.ends_with(PASSAGES_FOLDER_SUFFIX) {
            folders.push(name);
        }
    }
    folders.sort();
    Ok(folders)
}

/// Deletes an event folder and unregisters the event. An event that still
/// has passage folders is only removed with `force`.
pub struct RemoveEvent {
    id: String,
    force: bool,
}

impl RemoveEvent {
    pub fn new(id: &str, force: bool) -> Result<Self> {
        validate_id(id, "event")?;
        Ok(Self {
            id: id.to_string(),
            force,
        })
    }
}

impl Scaffold for RemoveEvent {
    fn name(&self) -> String {
        format!("remove event {}", self.id)
    }

    fn targets(&self, layout: &ProjectLayout) -> Vec<PathBuf> {
        vec![
            layout.register_file(),
            layout.world_state_file(),
            layout.event_dir(&self.id),
        ]
    }

    fn plan(&self, tx: &mut Transaction<'_>) -> Result<()> {
        let layout = tx.layout();
        let id = self.id.as_str();
        let event_dir = layout.event_dir(id);
        if !event_dir.is_dir() {
            bail!("There is no event with the id '{id}'");
        }

        let folders = passage_folders(&event_dir)?;
        if !folders.is_empty() {
            if !self.force {
                bail!(
                    "The event '{id}' still has passages ({}). Use --force to remove it anyway.",
                    folders.join(", ")
                );
            }
            warn!(event = id, folders = %folders.join(", "), "removing event together with its passages");
        }
        tx.delete_dir(&event_dir)?;

        let module = data_module(layout, &layout.event_file(id));
        let entity = Entity {
            kind: EntityKind::Event,
            id,
            module: &module,
        };
        tx.update(&layout.register_file(), |source| {
            let unregistered = registry::remove_from_register(&entity, source)?;
            registry::remove_passages_loader(id, &unregistered)
        })?;
        tx.update(&layout.world_state_file(), |source| {
            registry::remove_from_world_state(&entity, source)
        })?;
        Ok(())
    }
}
