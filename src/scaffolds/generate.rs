//! Bulk generation of placeholder content, for trying out a project.
//!
//! Ids are `<prefix>_<i>_<kind>`. Events are placed at a random existing
//! location; passages go to a random event and character and link to a
//! random passage already in the same folder. All generated entities are
//! written in one transaction.

use super::passage::existing_passages;
use super::{CreateEntity, CreateEvent, CreatePassage, Scaffold};
use crate::layout::ProjectLayout;
use crate::naming::{PassageRef, validate_id};
use crate::registry::EntityKind;
use crate::templates::{EventArgs, PassageKind, UNKNOWN_LOCATION};
use crate::workspace::Transaction;
use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const EVENT_START: &str = "2.1. 8:00";
const EVENT_END: &str = "2.1. 20:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenerateKind {
    Characters,
    SideCharacters,
    Locations,
    Events,
    Passages,
}

impl fmt::Display for GenerateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GenerateKind::Characters => "characters",
            GenerateKind::SideCharacters => "side characters",
            GenerateKind::Locations => "locations",
            GenerateKind::Events => "events",
            GenerateKind::Passages => "passages",
        };
        f.write_str(label)
    }
}

/// Ids of the entries in `dir` whose names end with `suffix`. With an empty
/// suffix, folders are listed instead of files.
fn list_ids(dir: &Path, suffix: &str) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list '{}'", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type()?.is_dir();
        if suffix.is_empty() {
            if is_dir {
                ids.push(name);
            }
        } else if !is_dir && let Some(id) = name.strip_suffix(suffix) {
            ids.push(id.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

fn pick<'a, R: Rng + ?Sized>(ids: &'a [String], rng: &mut R, what: &str) -> Result<&'a String> {
    ids.choose(rng)
        .ok_or_else(|| anyhow!("No {what} found to generate passages for"))
}

pub struct Generate {
    kind: GenerateKind,
    steps: Vec<Box<dyn Scaffold>>,
}

impl Generate {
    /// Plans `count` new entities. Random choices are made here, against the
    /// files currently on disk.
    pub fn new<R: Rng + ?Sized>(
        layout: &ProjectLayout,
        kind: GenerateKind,
        count: usize,
        prefix: &str,
        rng: &mut R,
    ) -> Result<Self> {
        validate_id(prefix, "prefix")?;

        let locations = list_ids(&layout.locations_dir(), ".location.ts")?;
        let events = list_ids(&layout.events_dir(), "")?;
        let characters = list_ids(&layout.characters_dir(), ".ts")?;

        let mut steps: Vec<Box<dyn Scaffold>> = Vec::with_capacity(count);
        for i in 0..count {
            let step: Box<dyn Scaffold> = match kind {
                GenerateKind::Characters => Box::new(CreateEntity::new(
                    EntityKind::Character,
                    &format!("Character {i}"),
                    Some(&format!("{prefix}_{i}_character")),
                )?),
                GenerateKind::SideCharacters => Box::new(CreateEntity::new(
                    EntityKind::SideCharacter,
                    &format!("Side Character {i}"),
                    Some(&format!("{prefix}_{i}_sideCharacter")),
                )?),
                GenerateKind::Locations => Box::new(CreateEntity::new(
                    EntityKind::Location,
                    &format!("Location {i}"),
                    Some(&format!("{prefix}_{i}_location")),
                )?),
                GenerateKind::Events => {
                    let mut args = EventArgs::new(&format!("{prefix}_{i}_event"), &format!("Event {i}"));
                    args.description = format!("Description of event {i}");
                    args.start = EVENT_START.to_string();
                    args.end = EVENT_END.to_string();
                    args.location = locations
                        .choose(rng)
                        .cloned()
                        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
                    Box::new(CreateEvent::new(args)?)
                }
                GenerateKind::Passages => {
                    let event = pick(&events, rng, "events")?;
                    let character = pick(&characters, rng, "characters")?;
                    let passage = PassageRef::new(event, character, &format!("{prefix}_{i}_passage"))?;
                    let link = existing_passages(&layout.passage_folder(event, character))?
                        .choose(rng)
                        .cloned();
                    Box::new(CreatePassage::new(
                        passage,
                        PassageKind::Screen,
                        Some(format!("Title of ScreenPassage {i}")),
                        link,
                    ))
                }
            };
            steps.push(step);
        }
        Ok(Self { kind, steps })
    }
}

impl Scaffold for Generate {
    fn name(&self) -> String {
        format!("generate {} {}", self.steps.len(), self.kind)
    }

    fn targets(&self, layout: &ProjectLayout) -> Vec<PathBuf> {
        self.steps
            .iter()
            .flat_map(|step| step.targets(layout))
            .collect()
    }

    fn plan(&self, tx: &mut Transaction<'_>) -> Result<()> {
        for step in &self.steps {
            step.plan(tx).with_context(|| format!("Step '{}' failed", step.name()))?;
        }
        Ok(())
    }
}
