//! Orchestration for a single `colony tick`.
//!
//! Every own creep decides against the same start-of-tick snapshot. Intents
//! go to the host as they are produced; memory is decoded before and encoded
//! after each creep. A creep that cannot run is reported and skipped, and the
//! rest of the tick carries on.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::core::coordinator::RoomWorkQueue;
use crate::core::roles::{CreepContext, Policies};
use crate::core::run_loop::run_creep;
use crate::core::task::Task;
use crate::core::types::Owner;
use crate::core::world::{Creep, TickIntel, World};
use crate::io::config::{ColonyConfig, load_config};
use crate::io::host::{Host, SimHost};
use crate::io::init::ColonyPaths;
use crate::io::memory_store::{Memory, load_or_default_memory, write_memory};
use crate::io::tick_log::{CreepReport, TickReport, write_tick_report};
use crate::io::world_store::{load_world, write_world};

/// Run every own creep in `world` once, applying intents through `host`.
///
/// Fills `tick`, `creeps` and `replacements_due` of the returned report.
pub fn run_creeps<H: Host>(
    world: &World,
    memory: &mut Memory,
    policies: &Policies,
    host: &mut H,
) -> TickReport {
    let intel = TickIntel::gather(world);
    let mut report = TickReport {
        tick: world.tick,
        ..TickReport::default()
    };

    for creep in world.creeps.iter().filter(|creep| creep.owner == Owner::Mine) {
        let (entry, replacement_due) = run_one(creep, world, &intel, memory, policies, host);
        if replacement_due {
            report.replacements_due.push(creep.name.clone());
        }
        report.creeps.push(entry);
    }
    report
}

fn run_one<H: Host>(
    creep: &Creep,
    world: &World,
    intel: &TickIntel,
    memory: &mut Memory,
    policies: &Policies,
    host: &mut H,
) -> (CreepReport, bool) {
    let mut creep_memory = match memory.decode(&creep.name) {
        Ok(Some(creep_memory)) => creep_memory,
        Ok(None) => {
            warn!(creep = %creep.name, "no memory record; skipping creep");
            return (CreepReport::failed(&creep.name, None, "no memory record"), false);
        }
        Err(err) => {
            warn!(creep = %creep.name, error = %format!("{err:#}"), "undecodable memory; skipping creep");
            return (CreepReport::failed(&creep.name, None, format!("{err:#}")), false);
        }
    };

    let role = creep_memory.role;
    let tick = {
        let mut ctx = CreepContext {
            creep,
            memory: &mut creep_memory,
            world,
            intel,
            coordinator: &RoomWorkQueue,
        };
        run_creep(&mut ctx, policies.for_role(role))
    };
    let result = tick
        .intent
        .as_ref()
        .map(|intent| host.apply(&creep.name, intent));

    if let Err(err) = memory.encode(&creep.name, &creep_memory) {
        warn!(creep = %creep.name, error = %format!("{err:#}"), "failed to store memory");
        return (CreepReport::failed(&creep.name, Some(role), format!("{err:#}")), false);
    }

    let replace_at = creep_memory.data.replace_at;
    let replacement_due = replace_at > 0 && creep.age() >= replace_at;
    if replacement_due {
        info!(creep = %creep.name, %role, age = creep.age(), "replacement due");
    }

    let report = CreepReport {
        name: creep.name.clone(),
        role: Some(role),
        task: creep_memory.task.as_ref().map(|task| task.name().to_string()),
        target: creep_memory.task.as_ref().and_then(Task::target).cloned(),
        intent: tick.intent,
        result,
        outcome: tick.outcome,
    };
    (report, replacement_due)
}

/// Advance the simulated `world` by one tick.
///
/// Returns the next tick's world. Memory of creeps that did not survive the
/// tick is forgotten.
pub fn advance(world: World, memory: &mut Memory, config: &ColonyConfig) -> (World, TickReport) {
    let policies = Policies::new(&config.role_settings());
    let mut host = SimHost::new(world);
    let snapshot = host.world().clone();

    let mut report = run_creeps(&snapshot, memory, &policies, &mut host);
    report.expired = host.finish_tick();
    report.completed_missions = host.retire_missions();

    let world = host.into_world();
    report.forgotten = memory.forget_missing(|name| world.creep(name).is_some());
    (world, report)
}

/// Run one tick against the `.colony/` state under `root`.
pub fn run_tick(root: &Path) -> Result<TickReport> {
    let paths = ColonyPaths::new(root);
    paths.ensure_initialized()?;
    let config = load_config(&paths.config_path)?;
    let world = load_world(&paths.schema_path, &paths.world_path)?;
    let mut memory = load_or_default_memory(&paths.memory_path)?;

    let (world, report) = advance(world, &mut memory, &config);

    write_memory(&paths.memory_path, &memory)?;
    write_world(&paths.world_path, &world)?;
    if config.write_tick_logs {
        write_tick_report(&paths.tick_log_path(report.tick), &report)?;
    }
    debug!(
        tick = report.tick,
        creeps = report.creeps.len(),
        failed = report.failures(),
        "tick complete"
    );
    Ok(report)
}
