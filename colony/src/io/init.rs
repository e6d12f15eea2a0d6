//! Initialization helpers for `.colony/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use super::config::{ColonyConfig, write_config};
use super::memory_store::{Memory, write_memory};
use super::world_store::write_world;
use crate::core::types::{ObjectId, Owner, Pos};
use crate::core::world::{RoomState, Source, Structure, StructureKind, World};

const WORLD_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/world/v1.schema.json"
));

/// Room used by the sample world written on init.
pub const SAMPLE_ROOM: &str = "W1N1";

/// All canonical paths within `.colony/` for a project root.
#[derive(Debug, Clone)]
pub struct ColonyPaths {
    pub root: PathBuf,
    pub colony_dir: PathBuf,
    pub ticks_dir: PathBuf,
    pub gitignore_path: PathBuf,
    pub config_path: PathBuf,
    pub memory_path: PathBuf,
    pub world_path: PathBuf,
    pub schema_path: PathBuf,
}

impl ColonyPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let colony_dir = root.join(".colony");
        Self {
            root: root.clone(),
            colony_dir: colony_dir.clone(),
            ticks_dir: colony_dir.join("ticks"),
            gitignore_path: colony_dir.join(".gitignore"),
            config_path: colony_dir.join("config.toml"),
            memory_path: colony_dir.join("memory.json"),
            world_path: colony_dir.join("world.json"),
            schema_path: colony_dir.join("world.schema.json"),
        }
    }

    /// Report path for `tick`.
    pub fn tick_log_path(&self, tick: u32) -> PathBuf {
        self.ticks_dir.join(format!("{tick}.json"))
    }

    /// Fail early with a pointer to `colony init` when the state dir is missing.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.colony_dir.is_dir() {
            return Err(anyhow!(
                "missing {} (run `colony init` first)",
                self.colony_dir.display()
            ));
        }
        Ok(())
    }
}

/// Options for `init_colony`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing colony-owned files.
    pub force: bool,
}

/// Create `.colony/` scaffolding in `root`.
///
/// Fails if `.colony/` already exists unless `options.force` is set.
pub fn init_colony(root: &Path, options: &InitOptions) -> Result<ColonyPaths> {
    let paths = ColonyPaths::new(root);
    if paths.colony_dir.exists() && !options.force {
        return Err(anyhow!(
            "colony init: .colony already exists (use --force to overwrite)"
        ));
    }
    if paths.colony_dir.exists() && !paths.colony_dir.is_dir() {
        return Err(anyhow!(
            "colony init: .colony exists but is not a directory"
        ));
    }

    create_dir(&paths.colony_dir)?;
    create_dir(&paths.ticks_dir)?;

    write_file(&paths.gitignore_path, COLONY_GITIGNORE)?;
    write_file(&paths.schema_path, WORLD_SCHEMA)?;
    write_config(&paths.config_path, &ColonyConfig::default())?;
    write_memory(&paths.memory_path, &Memory::default())?;
    write_world(&paths.world_path, &sample_world())?;

    Ok(paths)
}

/// One owned room with a spawn, a source and an empty container beside it.
pub fn sample_world() -> World {
    let at = |x, y| Pos::new(SAMPLE_ROOM, x, y);
    let mut world = World::empty(0);
    world.rooms.push(RoomState {
        name: SAMPLE_ROOM.to_string(),
        energy_available: 550,
        energy_capacity_available: 550,
    });
    world.structures.push(Structure {
        id: ObjectId::new("spawn1"),
        kind: StructureKind::Spawn,
        owner: Owner::Mine,
        pos: at(25, 25),
        hits: StructureKind::Spawn.initial_hits(),
        hits_max: StructureKind::Spawn.initial_hits(),
        energy: 300,
        energy_capacity: StructureKind::Spawn.energy_capacity(),
    });
    world.structures.push(Structure {
        id: ObjectId::new("container1"),
        kind: StructureKind::Container,
        owner: Owner::Mine,
        pos: at(30, 21),
        hits: StructureKind::Container.initial_hits(),
        hits_max: StructureKind::Container.initial_hits(),
        energy: 0,
        energy_capacity: StructureKind::Container.energy_capacity(),
    });
    world.sources.push(Source {
        id: ObjectId::new("source1"),
        pos: at(30, 20),
        energy: 3_000,
        energy_capacity: 3_000,
    });
    world
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("write file {}", path.display()))
}

const COLONY_GITIGNORE: &str = "ticks/\n";
