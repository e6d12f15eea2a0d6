//! Miner: stationary harvester for container mining.
//!
//! Fills the container (or link) next to its source and never leaves it, so
//! hostiles do not interrupt it.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::loadout::LoadoutPattern;
use crate::core::roles::{CreepContext, RolePolicy};
use crate::core::task::Task;
use crate::core::types::{Owner, Part, Role};
use crate::core::world::{Structure, StructureKind, World};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerSettings {
    pub repetition_limit: usize,
    /// Miners may build construction sites of their own storage kind.
    pub allow_build: bool,
    pub replace_lead_ticks: u32,
    pub repair_range: u32,
    pub build_range: u32,
    pub link_range: u32,
    pub container_range: u32,
}

impl Default for MinerSettings {
    fn default() -> Self {
        Self {
            repetition_limit: 3,
            allow_build: true,
            replace_lead_ticks: 10,
            repair_range: 3,
            build_range: 2,
            link_range: 2,
            container_range: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MinerPolicy {
    settings: MinerSettings,
}

impl MinerPolicy {
    pub fn new(settings: MinerSettings) -> Self {
        Self { settings }
    }

    fn harvest(&self, ctx: &CreepContext<'_>) -> Option<Task> {
        let Some(source) = ctx.assignment().and_then(|assignment| assignment.source) else {
            info!(creep = %ctx.creep.name, "miner has no source at its assignment");
            return None;
        };
        Some(Task::harvest(source).quiet())
    }

    fn damaged_container(&self, ctx: &CreepContext<'_>) -> Option<Task> {
        ctx.world
            .structures_in_range(&ctx.creep.pos, self.settings.repair_range, |s| {
                s.kind == StructureKind::Container && s.owner != Owner::Hostile && s.is_damaged()
            })
            .next()
            .map(|container| Task::repair(container.id.clone()))
    }

    fn container_site(&self, ctx: &CreepContext<'_>) -> Option<Task> {
        let range = self.settings.build_range;
        let sites = ctx.world.sites.iter().filter(|site| {
            site.owner == Owner::Mine
                && site.kind == StructureKind::Container
                && site.pos.in_range_to(&ctx.creep.pos, range)
        });
        World::closest_by_range(&ctx.creep.pos, sites, |site| &site.pos)
            .map(|site| Task::build(site.id.clone()))
    }

    fn deposit_link(&self, ctx: &CreepContext<'_>) -> Option<Task> {
        let link = least_full(ctx.world.structures_in_range(
            &ctx.creep.pos,
            self.settings.link_range,
            |s| s.kind == StructureKind::Link && s.owner == Owner::Mine && s.free_capacity() > 0,
        ));
        if link.is_none() {
            info!(creep = %ctx.creep.name, "no link with spare capacity in range");
        }
        link.map(|link| Task::deposit(link.id.clone()))
    }

    fn deposit_container(&self, ctx: &CreepContext<'_>) -> Option<Task> {
        let container = least_full(ctx.world.structures_in_range(
            &ctx.creep.pos,
            self.settings.container_range,
            |s| {
                s.kind == StructureKind::Container
                    && s.owner != Owner::Hostile
                    && s.free_capacity() > 0
            },
        ));
        match container {
            Some(container) => Some(Task::deposit(container.id.clone())),
            None => {
                warn!(creep = %ctx.creep.name, pos = %ctx.creep.pos, "no container; dropping energy");
                Some(Task::drop_energy())
            }
        }
    }
}

fn least_full<'a>(structures: impl Iterator<Item = &'a Structure>) -> Option<&'a Structure> {
    structures.min_by_key(|s| s.energy)
}

impl RolePolicy for MinerPolicy {
    fn role(&self) -> Role {
        Role::Miner
    }

    fn loadout(&self, remote: bool) -> (LoadoutPattern, usize) {
        let pattern = if remote {
            // Extra move part for long-distance travel.
            LoadoutPattern::repeating(&[Part::Work, Part::Work, Part::Carry, Part::Move, Part::Move])
        } else {
            LoadoutPattern::repeating(&[Part::Work, Part::Work, Part::Carry, Part::Move])
        };
        (pattern, self.settings.repetition_limit)
    }

    fn replace_lead_ticks(&self) -> u32 {
        self.settings.replace_lead_ticks
    }

    fn decide(&self, ctx: &mut CreepContext<'_>) -> Option<Task> {
        if ctx.creep.energy == 0 {
            return self.harvest(ctx);
        }

        // First delivery marks the commute as done.
        ctx.stamp_replacement(self.settings.replace_lead_ticks);

        if let Some(task) = self.damaged_container(ctx) {
            return Some(task);
        }
        if self.settings.allow_build {
            if let Some(task) = self.container_site(ctx) {
                return Some(task);
            }
        }

        let linked = ctx.assignment().is_some_and(|assignment| assignment.linked);
        if linked {
            self.deposit_link(ctx)
        } else {
            self.deposit_container(ctx)
        }
    }
}
