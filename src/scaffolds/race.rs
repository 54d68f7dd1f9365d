use super::Scaffold;
use crate::layout::ProjectLayout;
use crate::naming::{id_from_name, validate_id, validate_text};
use crate::registry;
use crate::templates;
use crate::workspace::Transaction;
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Adds a race to the races file, seeding the file when it does not exist.
pub struct CreateRace {
    id: String,
    name: String,
    description: String,
}

impl CreateRace {
    pub fn new(name: &str, description: &str, id: Option<&str>) -> Result<Self> {
        let id = id.map(str::to_string).unwrap_or_else(|| id_from_name(name));
        validate_id(&id, "race")?;
        validate_text(name, "race name")?;
        validate_text(description, "race description")?;
        Ok(Self {
            id,
            name: name.trim().to_string(),
            description: description.to_string(),
        })
    }
}

impl Scaffold for CreateRace {
    fn name(&self) -> String {
        format!("create race {}", self.id)
    }

    fn targets(&self, layout: &ProjectLayout) -> Vec<PathBuf> {
        vec![layout.races_file()]
    }

    fn plan(&self, tx: &mut Transaction<'_>) -> Result<()> {
        let races_file = tx.layout().races_file();
        if !tx.exists(&races_file) {
            info!(path = %races_file.display(), "seeding races file");
            tx.create(&races_file, templates::races_file())?;
        }
        tx.update(&races_file, |source| {
            registry::add_race(&self.id, &self.name, &self.description, source)
        })
    }
}

pub struct RemoveRace {
    id: String,
}

impl RemoveRace {
    pub fn new(id: &str) -> Result<Self> {
        validate_id(id, "race")?;
        Ok(Self { id: id.to_string() })
    }
}

impl Scaffold for RemoveRace {
    fn name(&self) -> String {
        format!("remove race {}", self.id)
    }

    fn targets(&self, layout: &ProjectLayout) -> Vec<PathBuf> {
        vec![layout.races_file()]
    }

    fn plan(&self, tx: &mut Transaction<'_>) -> Result<()> {
        let races_file = tx.layout().races_file();
        tx.update(&races_file, |source| registry::remove_race(&self.id, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PatchError;
    use crate::scaffolds::testing::setup_project;
    use std::fs;

    #[test]
    fn test_create_race_seeds_races_file() {
        let (_tmp_dir, workspace) = setup_project();
        let races_file = workspace.layout().races_file();
        assert!(!races_file.exists());

        let scaffold = CreateRace::new("Wood Elf", "Lives in trees", None).unwrap();
        let report = workspace.apply(&scaffold).unwrap();
        assert_eq!(report.changes.len(), 1);

        let races = fs::read_to_string(&races_file).unwrap();
        assert!(races.contains("\thuman: {"));
        assert!(races.contains(
            "\twood_elf: {\n\t\tname: _('Wood Elf'),\n\t\tdescription: _('Lives in trees'),\n\t},\n};"
        ));
    }

    #[test]
    fn test_description_with_brace_is_rejected() {
        let (_tmp_dir, workspace) = setup_project();
        let err = CreateRace::new("Elf", "wears a } cloak", None).err().unwrap();
        assert!(err.to_string().contains("Invalid race description"));
        assert!(CreateRace::new("O'Elf", "", Some("oelf")).is_err());
        assert!(!workspace.layout().races_file().exists());
    }

    #[test]
    fn test_remove_race() {
        let (_tmp_dir, workspace) = setup_project();
        let races_file = workspace.layout().races_file();
        workspace.apply(&CreateRace::new("Elf", "", None).unwrap()).unwrap();
        workspace.apply(&RemoveRace::new("elf").unwrap()).unwrap();
        assert_eq!(fs::read_to_string(&races_file).unwrap(), templates::races_file());

        let err = workspace.apply(&RemoveRace::new("elf").unwrap()).unwrap_err();
        assert!(err.chain().any(|cause| matches!(
            cause.downcast_ref::<PatchError>(),
            Some(PatchError::EntryNotFound { .. })
        )));
    }
}
