//! Test-only builders for world snapshots and colony state directories.

use std::path::Path;

use anyhow::Result;
use tempfile::TempDir;

use crate::core::types::{CREEP_LIFE_TIME, ObjectId, Owner, Part, Pos};
use crate::core::world::{BodyPart, ConstructionSite, Creep, Source, Structure, StructureKind, World};
use crate::io::config::{ColonyConfig, write_config};
use crate::io::init::{ColonyPaths, InitOptions, init_colony};
use crate::io::memory_store::{Memory, load_memory, write_memory};
use crate::io::world_store::{load_world, write_world};

/// Default test room.
pub const ROOM: &str = "W1N1";

pub fn pos(x: i32, y: i32) -> Pos {
    Pos::new(ROOM, x, y)
}

pub fn body(parts: &[Part]) -> Vec<BodyPart> {
    parts.iter().copied().map(BodyPart::new).collect()
}

/// Own creep with a full lifetime and nothing carried.
pub fn creep(name: &str, pos: Pos, body: Vec<BodyPart>) -> Creep {
    Creep {
        name: name.to_string(),
        owner: Owner::Mine,
        pos,
        body,
        energy: 0,
        ticks_to_live: CREEP_LIFE_TIME,
    }
}

pub fn guard_creep(name: &str, pos: Pos) -> Creep {
    creep(
        name,
        pos,
        body(&[Part::Tough, Part::Attack, Part::Move, Part::Work, Part::Carry]),
    )
}

/// Three-repeat miner (150 carry capacity) holding `energy`.
pub fn miner_creep(name: &str, pos: Pos, energy: u32) -> Creep {
    let pattern = [Part::Work, Part::Work, Part::Carry, Part::Move];
    let parts: Vec<Part> = pattern.iter().copied().cycle().take(pattern.len() * 3).collect();
    let mut miner = creep(name, pos, body(&parts));
    miner.energy = energy;
    miner
}

pub fn hostile_creep(name: &str, pos: Pos) -> Creep {
    Creep {
        owner: Owner::Hostile,
        ..creep(name, pos, body(&[Part::Attack, Part::Move]))
    }
}

fn structure(id: &str, kind: StructureKind, owner: Owner, pos: Pos, energy: u32) -> Structure {
    Structure {
        id: ObjectId::new(id),
        kind,
        owner,
        pos,
        hits: kind.initial_hits(),
        hits_max: kind.initial_hits(),
        energy,
        energy_capacity: kind.energy_capacity(),
    }
}

pub fn container(id: &str, pos: Pos, energy: u32) -> Structure {
    structure(id, StructureKind::Container, Owner::Mine, pos, energy)
}

pub fn link(id: &str, pos: Pos, energy: u32) -> Structure {
    structure(id, StructureKind::Link, Owner::Mine, pos, energy)
}

pub fn spawn(id: &str, pos: Pos) -> Structure {
    structure(id, StructureKind::Spawn, Owner::Mine, pos, 300)
}

pub fn hostile_structure(id: &str, kind: StructureKind, pos: Pos) -> Structure {
    structure(id, kind, Owner::Hostile, pos, 0)
}

fn site(id: &str, kind: StructureKind, owner: Owner, pos: Pos) -> ConstructionSite {
    ConstructionSite {
        id: ObjectId::new(id),
        kind,
        owner,
        pos,
        progress: 0,
        progress_total: 5_000,
    }
}

pub fn own_site(id: &str, pos: Pos) -> ConstructionSite {
    site(id, StructureKind::Extension, Owner::Mine, pos)
}

pub fn own_container_site(id: &str, pos: Pos) -> ConstructionSite {
    site(id, StructureKind::Container, Owner::Mine, pos)
}

pub fn hostile_site(id: &str, pos: Pos) -> ConstructionSite {
    site(id, StructureKind::Spawn, Owner::Hostile, pos)
}

pub fn source(id: &str, pos: Pos) -> Source {
    Source {
        id: ObjectId::new(id),
        pos,
        energy: 3_000,
        energy_capacity: 3_000,
    }
}

/// Temporary colony state directory, initialized with defaults.
pub struct TestColony {
    dir: TempDir,
}

impl TestColony {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        init_colony(dir.path(), &InitOptions { force: false })?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> ColonyPaths {
        ColonyPaths::new(self.root())
    }

    pub fn write_world(&self, world: &World) -> Result<()> {
        write_world(&self.paths().world_path, world)
    }

    pub fn read_world(&self) -> Result<World> {
        let paths = self.paths();
        load_world(&paths.schema_path, &paths.world_path)
    }

    pub fn write_memory(&self, memory: &Memory) -> Result<()> {
        write_memory(&self.paths().memory_path, memory)
    }

    pub fn read_memory(&self) -> Result<Memory> {
        load_memory(&self.paths().memory_path)
    }

    pub fn write_config(&self, config: &ColonyConfig) -> Result<()> {
        write_config(&self.paths().config_path, config)
    }
}
