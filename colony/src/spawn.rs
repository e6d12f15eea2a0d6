//! Creep creation: compose a body, hand it to the spawner, persist memory.

use std::path::Path;

use anyhow::{Result, anyhow};
use tracing::info;

use crate::core::loadout::{CompositionError, Loadout, compose_affordable};
use crate::core::memory::Assignment;
use crate::core::roles::{CreateRequest, Policies, SpawnRequest};
use crate::core::types::Role;
use crate::io::config::{ColonyConfig, load_config};
use crate::io::host::{SimHost, Spawner};
use crate::io::init::ColonyPaths;
use crate::io::memory_store::{Memory, load_or_default_memory, write_memory};
use crate::io::world_store::{load_world, write_world};

/// What to create and where.
#[derive(Debug, Clone)]
pub struct SpawnOptions {
    pub role: Role,
    /// Room whose spawn builds the creep.
    pub room: String,
    pub assignment: Option<Assignment>,
    pub remote: bool,
}

/// Body `role` would get for `energy` under `config`.
pub fn compose_for_role(
    config: &ColonyConfig,
    role: Role,
    energy: u32,
    remote: bool,
) -> Result<Loadout, CompositionError> {
    let policies = Policies::new(&config.role_settings());
    let (pattern, repetition_limit) = policies.for_role(role).loadout(remote);
    compose_affordable(energy, &pattern, config.size_cap, repetition_limit)
}

/// Size a creep against `energy_budget` and build its initial memory.
pub fn plan_creep(
    config: &ColonyConfig,
    name: String,
    energy_budget: u32,
    options: &SpawnOptions,
) -> Result<SpawnRequest, CompositionError> {
    let policies = Policies::new(&config.role_settings());
    policies.for_role(options.role).create(&CreateRequest {
        name,
        energy_budget,
        size_cap: config.size_cap,
        origin: options.room.clone(),
        assignment: options.assignment.clone(),
        remote: options.remote,
    })
}

/// Create one creep through `spawner`, recording its memory under a fresh name.
///
/// The body is sized against the room's energy capacity; the spawner decides
/// whether the energy on hand covers it.
pub fn spawn_with<S: Spawner>(
    spawner: &mut S,
    config: &ColonyConfig,
    memory: &mut Memory,
    energy_budget: u32,
    options: &SpawnOptions,
) -> Result<SpawnRequest> {
    let name = memory.next_name(options.role);
    let request = plan_creep(config, name, energy_budget, options)?;
    let spawned = spawner.spawn(&request)?;
    memory.encode(&spawned, &request.memory)?;
    info!(creep = %spawned, role = %options.role, parts = request.body.len(), "creep created");
    Ok(request)
}

/// `colony spawn`: create a creep in the `.colony/` world under `root`.
pub fn spawn_creep(root: &Path, options: &SpawnOptions) -> Result<SpawnRequest> {
    let paths = ColonyPaths::new(root);
    paths.ensure_initialized()?;
    let config = load_config(&paths.config_path)?;
    let world = load_world(&paths.schema_path, &paths.world_path)?;
    let mut memory = load_or_default_memory(&paths.memory_path)?;

    let budget = world
        .room(&options.room)
        .map(|room| room.energy_capacity_available)
        .ok_or_else(|| anyhow!("unknown room {}", options.room))?;
    let mut host = SimHost::new(world);
    let request = spawn_with(&mut host, &config, &mut memory, budget, options)?;

    write_memory(&paths.memory_path, &memory)?;
    write_world(&paths.world_path, host.world())?;
    Ok(request)
}
