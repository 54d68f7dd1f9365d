use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use worldsmith::scaffolds::GenerateKind;
use worldsmith::templates::PassageKind;

/// Scaffolds and removes characters, locations, events and passages in a
/// narrative game's TypeScript data files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root. Data paths from the config are relative to it.
    #[arg(long, global = true, default_value = ".")]
    pub project: PathBuf,

    /// Config file to use instead of `worldsmith.toml` or the user config.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show what would change without writing anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new entity and register it.
    #[command(subcommand)]
    Create(CreateCommand),
    /// Delete an entity and unregister it.
    #[command(subcommand)]
    Remove(RemoveCommand),
    /// Create placeholder entities in bulk.
    Generate {
        kind: GenerateKind,
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long, default_value = "generated")]
        prefix: String,
        /// Seed for reproducible random picks.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args, Debug)]
pub struct NamedArgs {
    /// Display name, also used to derive the id.
    pub name: String,
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CreateCommand {
    Character(NamedArgs),
    SideCharacter(NamedArgs),
    Location(NamedArgs),
    Event {
        title: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// Start time, e.g. `2.1. 8:00`.
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Location id.
        #[arg(long)]
        location: Option<String>,
    },
    Race {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        id: Option<String>,
    },
    Passage {
        event: String,
        character: String,
        passage: String,
        #[arg(long, value_enum, default_value_t = PassageKind::Screen)]
        kind: PassageKind,
        #[arg(long)]
        title: Option<String>,
        /// Passage id (same event and character) to link or lead to.
        #[arg(long)]
        link: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RemoveCommand {
    Character { id: String },
    SideCharacter { id: String },
    Location { id: String },
    Race { id: String },
    Event {
        id: String,
        /// Also delete the event's passages.
        #[arg(long)]
        force: bool,
    },
    Passage {
        /// Full passage id, `<event>-<character>-<passage>`.
        id: String,
    },
}
