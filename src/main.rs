//! worldsmith CLI.
//!
//! Logging: set `RUST_LOG=worldsmith=debug` (or pass `-v`) to see what a
//! scaffold reads and writes on stderr.

mod cli;

use anyhow::Result;
use clap::Parser;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use worldsmith::config;
use worldsmith::layout::ProjectLayout;
use worldsmith::naming::{PassageRef, id_from_name};
use worldsmith::registry::EntityKind;
use worldsmith::scaffolds::{
    CreateEntity, CreateEvent, CreatePassage, CreateRace, Generate, RemoveEntity, RemoveEvent,
    RemovePassage, RemoveRace, Scaffold,
};
use worldsmith::templates::EventArgs;
use worldsmith::workspace::Workspace;

use crate::cli::{Cli, Command, CreateCommand, RemoveCommand};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "worldsmith=debug"
        } else {
            "worldsmith=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", style("error:").red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref(), &cli.project)?;
    let show_diff = config.show_diff;
    let workspace = Workspace::new(ProjectLayout::new(cli.project.clone(), config));

    let scaffold = build_scaffold(cli.command, workspace.layout())?;
    let report = if cli.dry_run {
        workspace.preview(scaffold.as_ref())?
    } else {
        workspace.apply(scaffold.as_ref())?
    };

    let rendered = report.render(workspace.layout().root(), show_diff);
    if cli.dry_run {
        println!("{}", style(rendered).dim());
    } else {
        println!("{rendered}");
    }
    Ok(())
}

fn build_scaffold(command: Command, layout: &ProjectLayout) -> Result<Box<dyn Scaffold>> {
    let scaffold: Box<dyn Scaffold> = match command {
        Command::Create(create) => match create {
            CreateCommand::Character(args) => Box::new(CreateEntity::new(
                EntityKind::Character,
                &args.name,
                args.id.as_deref(),
            )?),
            CreateCommand::SideCharacter(args) => Box::new(CreateEntity::new(
                EntityKind::SideCharacter,
                &args.name,
                args.id.as_deref(),
            )?),
            CreateCommand::Location(args) => Box::new(CreateEntity::new(
                EntityKind::Location,
                &args.name,
                args.id.as_deref(),
            )?),
            CreateCommand::Event {
                title,
                id,
                description,
                start,
                end,
                location,
            } => {
                let id = id.unwrap_or_else(|| id_from_name(&title));
                let mut args = EventArgs::new(&id, title.trim());
                args.description = description;
                if let Some(start) = start {
                    args.start = start;
                }
                if let Some(end) = end {
                    args.end = end;
                }
                if let Some(location) = location {
                    args.location = location;
                }
                Box::new(CreateEvent::new(args)?)
            }
            CreateCommand::Race { name, description, id } => {
                Box::new(CreateRace::new(&name, &description, id.as_deref())?)
            }
            CreateCommand::Passage {
                event,
                character,
                passage,
                kind,
                title,
                link,
            } => Box::new(CreatePassage::new(
                PassageRef::new(&event, &character, &passage)?,
                kind,
                title,
                link,
            )),
        },
        Command::Remove(remove) => match remove {
            RemoveCommand::Character { id } => Box::new(RemoveEntity::new(EntityKind::Character, &id)?),
            RemoveCommand::SideCharacter { id } => {
                Box::new(RemoveEntity::new(EntityKind::SideCharacter, &id)?)
            }
            RemoveCommand::Location { id } => Box::new(RemoveEntity::new(EntityKind::Location, &id)?),
            RemoveCommand::Race { id } => Box::new(RemoveRace::new(&id)?),
            RemoveCommand::Event { id, force } => Box::new(RemoveEvent::new(&id, force)?),
            RemoveCommand::Passage { id } => Box::new(RemovePassage::new(PassageRef::parse(&id)?)),
        },
        Command::Generate {
            kind,
            count,
            prefix,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Box::new(Generate::new(layout, kind, count, &prefix, &mut rng)?)
        }
    };
    Ok(scaffold)
}
