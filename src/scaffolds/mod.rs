//! # Scaffold Trait
//!
//! A scaffold is one create, remove or generate operation over the project
//! files. It names the paths it may touch and stages its changes on a
//! [`Transaction`]; the [`crate::workspace::Workspace`] decides whether and
//! how they are written.

use crate::layout::ProjectLayout;
use crate::workspace::Transaction;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub mod entity;
pub mod event;
pub mod generate;
pub mod passage;
pub mod race;

pub use self::entity::{CreateEntity, RemoveEntity};
pub use self::event::{CreateEvent, RemoveEvent};
pub use self::generate::{Generate, GenerateKind};
pub use self::passage::{CreatePassage, RemovePassage};
pub use self::race::{CreateRace, RemoveRace};

pub trait Scaffold {
    /// Short description used in reports and log lines.
    fn name(&self) -> String;

    /// Files and folders the scaffold may read, write or delete. A folder
    /// covers everything inside it.
    fn targets(&self, layout: &ProjectLayout) -> Vec<PathBuf>;

    /// Stages every change. Nothing is written when this fails.
    fn plan(&self, tx: &mut Transaction<'_>) -> Result<()>;
}

/// Import specifier of `file` as seen from the registry files.
pub(crate) fn data_module(layout: &ProjectLayout, file: &Path) -> String {
    ProjectLayout::import_path(&layout.data_dir(), file)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::Config;
    use crate::layout::ProjectLayout;
    use crate::workspace::Workspace;
    use std::fs;
    use tempfile::Builder;

    pub const REGISTER: &str = "export const register = {
\tcharacters: {
\t},
\tsideCharacters: {
\t},
\tlocations: {
\t},
\tevents: {
\t},
\tpassages: {
\t},
};
";

    pub const WORLD_STATE: &str = "export type TWorldState = {
\tcharacters: {
\t};
\tsideCharacters: {
\t};
\tlocations: {
\t};
\tevents: {
\t};
};
";

    /// A project with empty registry files and no entities.
    pub fn setup_project() -> (tempfile::TempDir, Workspace) {
        let tmp_dir = Builder::new().prefix("scaffold-test-").tempdir().unwrap();
        let layout = ProjectLayout::new(tmp_dir.path(), Config::default());
        fs::create_dir_all(layout.data_dir()).unwrap();
        fs::write(layout.register_file(), REGISTER).unwrap();
        fs::write(layout.world_state_file(), WORLD_STATE).unwrap();
        (tmp_dir, Workspace::new(layout))
    }
}
