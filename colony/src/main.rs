//! Per-tick creep AI for a screeps-style colony.
//!
//! State lives under `.colony/` (config, creep memory, world snapshot). Each
//! `tick` reloads it, runs every creep once against the simulated host and
//! writes it back, so runs are resumable and deterministic.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use colony::core::loadout::CompositionError;
use colony::core::memory::Assignment;
use colony::core::types::{ObjectId, Part, Role};
use colony::exit_codes;
use colony::io::config::load_config;
use colony::io::host::SpawnError;
use colony::io::init::{ColonyPaths, InitOptions, init_colony};
use colony::looping::run_ticks;
use colony::spawn::{SpawnOptions, compose_for_role, spawn_creep};
use colony::tick::run_tick;

#[derive(Parser)]
#[command(name = "colony", version, about = "Per-tick creep AI for a screeps-style colony")]
struct Cli {
    /// Directory holding `.colony/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Log task selection and actions (ignored when `RUST_LOG` is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.colony/` with default config, empty memory and a sample world.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Run one tick for every creep.
    Tick,
    /// Run several ticks, printing one summary line each.
    Run {
        #[arg(long, default_value_t = 1)]
        ticks: u32,
    },
    /// Print the body a role would get for an energy budget.
    Compose {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        energy: u32,
        /// Use the long-distance pattern.
        #[arg(long)]
        remote: bool,
    },
    /// Create a creep in a room and record its memory.
    Spawn(SpawnArgs),
}

#[derive(Args)]
struct SpawnArgs {
    #[arg(long)]
    role: Role,
    #[arg(long)]
    room: String,
    /// Post the creep at a world object (e.g. a source).
    #[arg(long, conflicts_with = "assign_mission")]
    assign_object: Option<String>,
    /// Post the creep at a mission's location while it is active.
    #[arg(long)]
    assign_mission: Option<String>,
    /// Use the long-distance pattern.
    #[arg(long)]
    remote: bool,
    /// Deposit into links instead of containers.
    #[arg(long)]
    linked: bool,
}

impl SpawnArgs {
    fn options(&self) -> SpawnOptions {
        let assignment = match (&self.assign_object, &self.assign_mission) {
            (Some(id), _) => Some(Assignment::object(ObjectId::new(id.as_str()))),
            (None, Some(name)) => Some(Assignment::mission(name.as_str())),
            (None, None) => None,
        }
        .map(|assignment| {
            if self.linked {
                assignment.linked()
            } else {
                assignment
            }
        });
        SpawnOptions {
            role: self.role,
            room: self.room.clone(),
            assignment,
            remote: self.remote,
        }
    }
}

#[derive(Serialize)]
struct ComposeOutput<'a> {
    role: Role,
    parts: &'a [Part],
    repeats: usize,
    cost: u32,
}

fn main() {
    let cli = Cli::parse();
    colony::logging::init(cli.verbose);
    if let Err(err) = run(&cli) {
        eprintln!("{:#}", err);
        std::process::exit(exit_code_for(&err));
    }
    std::process::exit(exit_codes::OK);
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Init { force } => cmd_init(&cli.root, *force),
        Command::Tick => cmd_tick(&cli.root),
        Command::Run { ticks } => cmd_run(&cli.root, *ticks),
        Command::Compose {
            role,
            energy,
            remote,
        } => cmd_compose(&cli.root, *role, *energy, *remote),
        Command::Spawn(args) => cmd_spawn(&cli.root, args),
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<CompositionError>().is_some() {
        return exit_codes::UNAFFORDABLE;
    }
    if let Some(SpawnError::InsufficientEnergy { .. }) = err.downcast_ref::<SpawnError>() {
        return exit_codes::UNAFFORDABLE;
    }
    exit_codes::INVALID
}

fn cmd_init(root: &Path, force: bool) -> Result<()> {
    let paths = init_colony(root, &InitOptions { force })?;
    println!("initialized {}", paths.colony_dir.display());
    Ok(())
}

fn cmd_tick(root: &Path) -> Result<()> {
    let report = run_tick(root)?;
    println!("{}", report.summary());
    Ok(())
}

fn cmd_run(root: &Path, ticks: u32) -> Result<()> {
    let outcome = run_ticks(root, ticks, |report| println!("{}", report.summary()))?;
    println!(
        "ran {} ticks, {} creep failures",
        outcome.ticks_run, outcome.failures
    );
    Ok(())
}

fn cmd_compose(root: &Path, role: Role, energy: u32, remote: bool) -> Result<()> {
    let config = load_config(&ColonyPaths::new(root).config_path)?;
    let loadout = compose_for_role(&config, role, energy, remote)?;
    let output = ComposeOutput {
        role,
        parts: &loadout.parts,
        repeats: loadout.repeats,
        cost: loadout.cost(),
    };
    println!(
        "{}",
        serde_json::to_string(&output).context("serialize loadout")?
    );
    Ok(())
}

fn cmd_spawn(root: &Path, args: &SpawnArgs) -> Result<()> {
    let request = spawn_creep(root, &args.options())?;
    println!("{} ({} parts)", request.name, request.body.len());
    Ok(())
}
