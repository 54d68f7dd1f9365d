use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the optional per-project config file, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "worldsmith.toml";

/// Where the game's data files live, relative to the project root.
///
/// Every directory except `data_dir` is relative to `data_dir`, because the
/// import lines written into the registry are relative to it as well.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub data_dir: String,
    pub register_file: String,
    pub world_state_file: String,
    pub characters_dir: String,
    pub side_characters_dir: String,
    pub locations_dir: String,
    pub events_dir: String,
    pub races_file: String,
    /// Print a diff of every modified file after a scaffold ran.
    pub show_diff: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: "src/data".to_string(),
            register_file: "register.ts".to_string(),
            world_state_file: "TWorldState.ts".to_string(),
            characters_dir: "characters".to_string(),
            side_characters_dir: "sideCharacters".to_string(),
            locations_dir: "locations".to_string(),
            events_dir: "events".to_string(),
            races_file: "races/races.ts".to_string(),
            show_diff: true,
        }
    }
}

impl Config {
    /// Replaces empty string fields with their defaults.
    fn fill_missing(self) -> Self {
        let default_config = Config::default();
        let pick = |value: String, fallback: String| if value.trim().is_empty() { fallback } else { value };
        Config {
            data_dir: pick(self.data_dir, default_config.data_dir),
            register_file: pick(self.register_file, default_config.register_file),
            world_state_file: pick(self.world_state_file, default_config.world_state_file),
            characters_dir: pick(self.characters_dir, default_config.characters_dir),
            side_characters_dir: pick(self.side_characters_dir, default_config.side_characters_dir),
            locations_dir: pick(self.locations_dir, default_config.locations_dir),
            events_dir: pick(self.events_dir, default_config.events_dir),
            races_file: pick(self.races_file, default_config.races_file),
            show_diff: self.show_diff,
        }
    }
}

fn read_config(path: &Path) -> Result<(Config, String)> {
    let config_string = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config: Config = toml::from_str(&config_string)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    Ok((config.fill_missing(), config_string))
}

/// Resolves the configuration for a project.
///
/// An explicit `--config` file wins, then `worldsmith.toml` in the project
/// root, then the global config file.
pub fn load(explicit: Option<&Path>, project_root: &Path) -> Result<Config> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "using explicit config");
        return Ok(read_config(path)?.0);
    }

    let project_config = project_root.join(PROJECT_CONFIG_FILE);
    if project_config.is_file() {
        debug!(path = %project_config.display(), "using project config");
        return Ok(read_config(&project_config)?.0);
    }

    load_or_create()
}

fn global_config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::new();
    Ok(xdg_dirs.place_config_file("worldsmith/config.toml")?)
}

/// Loads the global config file, creating it with defaults on first use.
pub fn load_or_create() -> Result<Config> {
    load_or_create_at(&global_config_path()?)
}

pub fn load_or_create_at(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        let default_config = Config::default();
        let toml_string = toml::to_string_pretty(&default_config)?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(config_path, toml_string)?;

        info!("Created default config at: {}", config_path.display());
        return Ok(default_config);
    }

    let (final_config, config_string) = read_config(config_path)?;

    // Write the completed config back so that every option is visible to the user.
    let final_toml_string = toml::to_string_pretty(&final_config)?;
    if final_toml_string != config_string {
        fs::write(config_path, final_toml_string)?;
    }

    Ok(final_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    #[test]
    fn test_load_or_create_writes_defaults() {
        let tmp_dir = Builder::new().prefix("config-test-").tempdir().unwrap();
        let path = tmp_dir.path().join("nested/config.toml");

        let config = load_or_create_at(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = load_or_create_at(&path).unwrap();
        assert_eq!(reloaded, Config::default());
    }

    #[test]
    fn test_missing_fields_are_filled_and_written_back() {
        let tmp_dir = Builder::new().prefix("config-test-").tempdir().unwrap();
        let path = tmp_dir.path().join("config.toml");
        fs::write(&path, "data_dir = \"game/data\"\nevents_dir = \"\"\n").unwrap();

        let config = load_or_create_at(&path).unwrap();
        assert_eq!(config.data_dir, "game/data");
        assert_eq!(config.events_dir, "events");
        assert_eq!(config.register_file, "register.ts");

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("register_file = \"register.ts\""));
        assert!(written.contains("events_dir = \"events\""));
    }

    #[test]
    fn test_project_config_takes_precedence() {
        let tmp_dir = Builder::new().prefix("config-test-").tempdir().unwrap();
        fs::write(
            tmp_dir.path().join(PROJECT_CONFIG_FILE),
            "data_dir = \"content\"\nshow_diff = false\n",
        )
        .unwrap();

        let config = load(None, tmp_dir.path()).unwrap();
        assert_eq!(config.data_dir, "content");
        assert!(!config.show_diff);
    }

    #[test]
    fn test_explicit_config_must_parse() {
        let tmp_dir = Builder::new().prefix("config-test-").tempdir().unwrap();
        let path = tmp_dir.path().join("broken.toml");
        fs::write(&path, "data_dir = [").unwrap();

        let result = load(Some(&path), tmp_dir.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse config file"));
    }
}
