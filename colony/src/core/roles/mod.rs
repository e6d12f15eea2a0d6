//! Per-role decision policies.
//!
//! Each [`Role`] maps to exactly one [`RolePolicy`] through [`Policies`]. A
//! policy sizes the body at creation time and, every tick the current task
//! is missing, invalid or interrupted, picks the replacement.

pub mod guard;
pub mod miner;

use serde::{Deserialize, Serialize};

use crate::core::coordinator::Coordinator;
use crate::core::loadout::{CompositionError, LoadoutPattern, compose_affordable};
use crate::core::memory::{Assignment, CreepMemory, ResolvedAssignment};
use crate::core::task::Task;
use crate::core::types::{Part, Role};
use crate::core::world::{Creep, TickIntel, World};

pub use guard::{GuardPolicy, GuardSettings};
pub use miner::{MinerPolicy, MinerSettings};

/// Everything a policy may look at (and the memory it may update) for one creep.
pub struct CreepContext<'a> {
    pub creep: &'a Creep,
    pub memory: &'a mut CreepMemory,
    pub world: &'a World,
    pub intel: &'a TickIntel,
    pub coordinator: &'a dyn Coordinator,
}

impl CreepContext<'_> {
    pub fn assignment(&self) -> Option<ResolvedAssignment> {
        self.memory.assignment.as_ref()?.resolve(self.world)
    }

    /// Stamp the replacement age once; later calls are no-ops.
    pub fn stamp_replacement(&mut self, lead_ticks: u32) {
        if self.memory.data.replace_at == 0 {
            self.memory.data.replace_at = self.creep.age() + lead_ticks;
        }
    }
}

/// Inputs for sizing a new creep.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub name: String,
    /// Room energy capacity the body is sized against.
    pub energy_budget: u32,
    pub size_cap: usize,
    pub origin: String,
    pub assignment: Option<Assignment>,
    /// Long-distance variant (miners only).
    pub remote: bool,
}

/// A fully specified creep, ready for the spawner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub name: String,
    pub body: Vec<Part>,
    pub memory: CreepMemory,
}

pub trait RolePolicy {
    fn role(&self) -> Role;

    /// Body pattern and repetition limit for a new creep.
    fn loadout(&self, remote: bool) -> (LoadoutPattern, usize);

    /// Extra age, past the moment of stamping, before a replacement is due.
    fn replace_lead_ticks(&self) -> u32;

    /// Distance from the assignment at which an idle creep stamps its
    /// replacement age, if the role stamps on arrival at all.
    fn arrival_range(&self) -> Option<u32> {
        None
    }

    /// Whether a still-valid `current` task must be dropped this tick.
    fn interrupts(&self, _ctx: &CreepContext<'_>, _current: &Task) -> bool {
        false
    }

    fn decide(&self, ctx: &mut CreepContext<'_>) -> Option<Task>;

    fn create(&self, request: &CreateRequest) -> Result<SpawnRequest, CompositionError> {
        let (pattern, repetition_limit) = self.loadout(request.remote);
        let loadout = compose_affordable(
            request.energy_budget,
            &pattern,
            request.size_cap,
            repetition_limit,
        )?;
        let mut memory = CreepMemory::new(
            self.role(),
            request.assignment.clone(),
            request.origin.clone(),
        );
        memory.data.remote = request.remote;
        Ok(SpawnRequest {
            name: request.name.clone(),
            body: loadout.parts,
            memory,
        })
    }
}

/// Settings for every role, as stored in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleSettings {
    pub guard: GuardSettings,
    pub miner: MinerSettings,
}

/// One policy per role; dispatch is a closed match on [`Role`].
#[derive(Debug, Clone)]
pub struct Policies {
    guard: GuardPolicy,
    miner: MinerPolicy,
}

impl Policies {
    pub fn new(settings: &RoleSettings) -> Self {
        Self {
            guard: GuardPolicy::new(settings.guard.clone()),
            miner: MinerPolicy::new(settings.miner.clone()),
        }
    }

    pub fn for_role(&self, role: Role) -> &dyn RolePolicy {
        match role {
            Role::Guard => &self.guard,
            Role::Miner => &self.miner,
        }
    }
}

impl Default for Policies {
    fn default() -> Self {
        Self::new(&RoleSettings::default())
    }
}
