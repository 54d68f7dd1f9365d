//! Passages live in `events/<event>/<character>.passages/<passage>.<kind>.ts`
//! and are listed in the event's passage map, which the register loads
//! lazily.

use super::Scaffold;
use crate::layout::ProjectLayout;
use crate::naming::{PassageRef, validate_id, validate_text};
use crate::registry;
use crate::templates::PassageKind;
use crate::workspace::Transaction;
use anyhow::{Context, Result, anyhow, bail};
use std::fs;
use std::path::{Path, PathBuf};

/// The passage file of `passage`, whatever its kind.
fn find_passage_file(folder: &Path, passage: &str) -> Result<Option<PathBuf>> {
    if !folder.is_dir() {
        return Ok(None);
    }
    let prefix = format!("{passage}.");
    for entry in fs::read_dir(folder).with_context(|| format!("Failed to list '{}'", folder.display()))? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(".ts"));
        if matches {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Passage ids already present in a character's passage folder.
pub fn existing_passages(folder: &Path) -> Result<Vec<String>> {
    if !folder.is_dir() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for entry in fs::read_dir(folder).with_context(|| format!("Failed to list '{}'", folder.display()))? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if let Some((id, _)) = name.split_once('.')
            && name.ends_with(".ts")
        {
            ids.push(id.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

fn passage_module(layout: &ProjectLayout, passage: &PassageRef, file: &Path) -> String {
    ProjectLayout::import_path(&layout.event_dir(&passage.event), file)
}

pub struct CreatePassage {
    passage: PassageRef,
    kind: PassageKind,
    title: Option<String>,
    link: Option<String>,
}

impl CreatePassage {
    /// `link` is the passage id (within the same event and character) that a
    /// screen links to or a transition leads to.
    pub fn new(passage: PassageRef, kind: PassageKind, title: Option<String>, link: Option<String>) -> Self {
        Self {
            passage,
            kind,
            title,
            link,
        }
    }
}

impl Scaffold for CreatePassage {
    fn name(&self) -> String {
        format!("create passage {}", self.passage)
    }

    fn targets(&self, layout: &ProjectLayout) -> Vec<PathBuf> {
        vec![
            layout.event_passages_file(&self.passage.event),
            layout.passage_folder(&self.passage.event, &self.passage.character),
            layout.character_file(&self.passage.character),
        ]
    }

    fn plan(&self, tx: &mut Transaction<'_>) -> Result<()> {
        let layout = tx.layout();
        if let Some(title) = &self.title {
            validate_text(title, "passage title")?;
        }
        if let Some(link) = &self.link {
            validate_id(link, "linked passage")?;
        }
        let PassageRef { event, character, .. } = &self.passage;
        if !layout.event_dir(event).is_dir() {
            bail!("There is no event with the id '{event}'");
        }
        if !layout.character_file(character).exists() {
            bail!("There is no character with the id '{character}'");
        }

        let folder = layout.passage_folder(event, character);
        if let Some(existing) = find_passage_file(&folder, &self.passage.passage)? {
            bail!(
                "The passage '{}' already exists at '{}'",
                self.passage,
                existing.display()
            );
        }

        let file = layout.passage_file(&self.passage, self.kind);
        let content = self
            .kind
            .render(&self.passage, self.title.as_deref(), self.link.as_deref());
        tx.create(&file, content)?;

        let module = passage_module(layout, &self.passage, &file);
        tx.update(&layout.event_passages_file(event), |source| {
            registry::add_passage(&self.passage, &module, source)
        })
    }
}

/// Deletes a passage file, and its folder when it was the last passage of the
/// character, and drops the passage from the event's passage map.
pub struct RemovePassage {
    passage: PassageRef,
}

impl RemovePassage {
    pub fn new(passage: PassageRef) -> Self {
        Self { passage }
    }
}

impl Scaffold for RemovePassage {
    fn name(&self) -> String {
        format!("remove passage {}", self.passage)
    }

    fn targets(&self, layout: &ProjectLayout) -> Vec<PathBuf> {
        vec![
            layout.event_passages_file(&self.passage.event),
            layout.passage_folder(&self.passage.event, &self.passage.character),
        ]
    }

    fn plan(&self, tx: &mut Transaction<'_>) -> Result<()> {
        let layout = tx.layout();
        let folder = layout.passage_folder(&self.passage.event, &self.passage.character);
        let file = find_passage_file(&folder, &self.passage.passage)?
            .ok_or_else(|| anyhow!("There is no passage '{}'", self.passage))?;

        if existing_passages(&folder)?.len() == 1 {
            tx.delete_dir(&folder)?;
        } else {
            tx.delete_file(&file)?;
        }

        let module = passage_module(layout, &self.passage, &file);
        tx.update(&layout.event_passages_file(&self.passage.event), |source| {
            registry::remove_passage(&self.passage, &module, source)
        })
    }
}
