//! File locations of a game project.

use crate::config::Config;
use crate::naming::PassageRef;
use crate::templates::PassageKind;
use std::path::{Path, PathBuf};

/// Folder suffix of a character's passages inside an event folder.
pub const PASSAGES_FOLDER_SUFFIX: &str = ".passages";

#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    config: Config,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(&self.config.data_dir)
    }

    pub fn register_file(&self) -> PathBuf {
        self.data_dir().join(&self.config.register_file)
    }

    pub fn world_state_file(&self) -> PathBuf {
        self.data_dir().join(&self.config.world_state_file)
    }

    pub fn characters_dir(&self) -> PathBuf {
        self.data_dir().join(&self.config.characters_dir)
    }

    pub fn character_file(&self, id: &str) -> PathBuf {
        self.characters_dir().join(format!("{id}.ts"))
    }

    pub fn side_characters_dir(&self) -> PathBuf {
        self.data_dir().join(&self.config.side_characters_dir)
    }

    pub fn side_character_file(&self, id: &str) -> PathBuf {
        self.side_characters_dir().join(format!("{id}.ts"))
    }

    pub fn locations_dir(&self) -> PathBuf {
        self.data_dir().join(&self.config.locations_dir)
    }

    pub fn location_file(&self, id: &str) -> PathBuf {
        self.locations_dir().join(format!("{id}.location.ts"))
    }

    pub fn events_dir(&self) -> PathBuf {
        self.data_dir().join(&self.config.events_dir)
    }

    pub fn event_dir(&self, id: &str) -> PathBuf {
        self.events_dir().join(id)
    }

    pub fn event_file(&self, id: &str) -> PathBuf {
        self.event_dir(id).join(format!("{id}.event.ts"))
    }

    pub fn event_passages_file(&self, id: &str) -> PathBuf {
        self.event_dir(id).join(format!("{id}.passages.ts"))
    }

    pub fn passage_folder(&self, event: &str, character: &str) -> PathBuf {
        self.event_dir(event)
            .join(format!("{character}{PASSAGES_FOLDER_SUFFIX}"))
    }

    pub fn passage_file(&self, passage: &PassageRef, kind: PassageKind) -> PathBuf {
        self.passage_folder(&passage.event, &passage.character)
            .join(format!("{}.{}.ts", passage.passage, kind.file_tag()))
    }

    pub fn races_file(&self) -> PathBuf {
        self.data_dir().join(&self.config.races_file)
    }

    /// Import specifier of a data-dir path relative to `from_dir`, without
    /// the `.ts` extension: `./characters/thomas`.
    pub fn import_path(from_dir: &Path, target: &Path) -> String {
        let relative = target.strip_prefix(from_dir).unwrap_or(target);
        let mut specifier = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        if let Some(stripped) = specifier.strip_suffix(".ts") {
            specifier = stripped.to_string();
        }
        format!("./{specifier}")
    }
}
