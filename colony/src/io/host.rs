//! Host collaborators: applying intents to the world and creating creeps.
//!
//! The live game would implement [`Host`] and [`Spawner`] itself. [`SimHost`]
//! implements both over an owned [`World`] so the colony can run ticks
//! against `.colony/world.json`.

use thiserror::Error;
use tracing::{debug, info};

use crate::core::intent::{ActionResult, Intent};
use crate::core::mission::completed_missions;
use crate::core::roles::SpawnRequest;
use crate::core::types::{ObjectId, Owner, Part, Pos, body_cost};
use crate::core::world::{BodyPart, Creep, DroppedEnergy, Structure, StructureKind, World};

/// Energy harvested per active work part.
pub const HARVEST_POWER: u32 = 2;
/// Construction progress per active work part.
pub const BUILD_POWER: u32 = 5;
/// Hits restored per active work part (each costs one energy).
pub const REPAIR_POWER: u32 = 100;
pub const ATTACK_POWER: u32 = 30;
pub const RANGED_ATTACK_POWER: u32 = 10;

/// Applies one creep intent to the world.
pub trait Host {
    fn apply(&mut self, creep: &str, intent: &Intent) -> ActionResult;
}

/// Creates creeps from fully specified requests.
pub trait Spawner {
    /// Returns the name of the new creep.
    fn spawn(&mut self, request: &SpawnRequest) -> Result<String, SpawnError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("room {room} has {available} energy, body costs {cost}")]
    InsufficientEnergy {
        room: String,
        cost: u32,
        available: u32,
    },
    #[error("creep name {0} is already taken")]
    NameTaken(String),
    #[error("room {0} has no spawn")]
    NoSpawn(String),
}

/// In-process host over an owned world snapshot.
#[derive(Debug, Clone)]
pub struct SimHost {
    world: World,
}

impl SimHost {
    pub fn new(world: World) -> Self {
        Self { world }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    /// Advance to the next tick: age every creep and remove the expired ones.
    pub fn finish_tick(&mut self) -> Vec<String> {
        self.world.tick += 1;
        let mut expired = Vec::new();
        self.world.creeps.retain_mut(|creep| {
            creep.ticks_to_live = creep.ticks_to_live.saturating_sub(1);
            if creep.ticks_to_live == 0 {
                expired.push(creep.name.clone());
                return false;
            }
            true
        });
        for name in &expired {
            debug!(creep = %name, "creep expired");
        }
        expired
    }

    /// Remove missions whose objective has been met. Returns their names.
    pub fn retire_missions(&mut self) -> Vec<String> {
        let completed = completed_missions(&self.world);
        if completed.is_empty() {
            return completed;
        }
        self.world
            .missions
            .retain(|mission| !completed.contains(&mission.name));
        for name in &completed {
            info!(mission = %name, "mission complete");
        }
        completed
    }

    fn creep_index(&self, name: &str) -> Option<usize> {
        self.world
            .creeps
            .iter()
            .position(|creep| creep.name == name && creep.owner == Owner::Mine)
    }

    fn structure_index(&self, id: &ObjectId) -> Option<usize> {
        self.world.structures.iter().position(|s| &s.id == id)
    }

    fn move_to(&mut self, actor: usize, goal: &Pos, range: u32) -> ActionResult {
        let creep = &mut self.world.creeps[actor];
        if creep.pos.in_range_to(goal, range) {
            return ActionResult::Ok;
        }
        if !creep.has_active(Part::Move) {
            return ActionResult::NoBodypart;
        }
        creep.pos = creep.pos.step_toward(goal);
        ActionResult::Ok
    }

    fn attack(&mut self, actor: usize, target: &ObjectId) -> ActionResult {
        let creep = &self.world.creeps[actor];
        let (range, damage) = if creep.has_active(Part::Attack) {
            (1, ATTACK_POWER * active(creep, Part::Attack))
        } else if creep.has_active(Part::RangedAttack) {
            (3, RANGED_ATTACK_POWER * active(creep, Part::RangedAttack))
        } else {
            return ActionResult::NoBodypart;
        };
        let from = creep.pos.clone();

        if let Some(index) = self
            .world
            .creeps
            .iter()
            .position(|c| c.name == target.as_str() && c.owner == Owner::Hostile)
        {
            if !from.in_range_to(&self.world.creeps[index].pos, range) {
                return ActionResult::NotInRange;
            }
            damage_body(&mut self.world.creeps[index].body, damage);
            if self.world.creeps[index].hits() == 0 {
                let dead = self.world.creeps.remove(index);
                debug!(creep = %dead.name, "hostile creep destroyed");
            }
            return ActionResult::Ok;
        }

        if let Some(index) = self.structure_index(target) {
            let structure = &mut self.world.structures[index];
            if structure.owner != Owner::Hostile {
                return ActionResult::InvalidTarget;
            }
            if !from.in_range_to(&structure.pos, range) {
                return ActionResult::NotInRange;
            }
            structure.hits = structure.hits.saturating_sub(damage);
            if structure.hits == 0 {
                let destroyed = self.world.structures.remove(index);
                debug!(structure = %destroyed.id, "hostile structure destroyed");
            }
            return ActionResult::Ok;
        }

        if let Some(index) = self.world.sites.iter().position(|s| &s.id == target) {
            let site = &self.world.sites[index];
            if site.owner != Owner::Hostile {
                return ActionResult::InvalidTarget;
            }
            if !from.in_range_to(&site.pos, range) {
                return ActionResult::NotInRange;
            }
            self.world.sites.remove(index);
            return ActionResult::Ok;
        }

        ActionResult::InvalidTarget
    }

    fn harvest(&mut self, actor: usize, target: &ObjectId) -> ActionResult {
        let work = active(&self.world.creeps[actor], Part::Work);
        if work == 0 {
            return ActionResult::NoBodypart;
        }
        let Some(index) = self.world.sources.iter().position(|s| &s.id == target) else {
            return ActionResult::InvalidTarget;
        };
        let creep = &mut self.world.creeps[actor];
        let source = &mut self.world.sources[index];
        if !creep.pos.in_range_to(&source.pos, 1) {
            return ActionResult::NotInRange;
        }
        if source.energy == 0 {
            return ActionResult::Empty;
        }
        let free = creep.free_capacity();
        if free == 0 {
            return ActionResult::Full;
        }
        let amount = (HARVEST_POWER * work).min(source.energy).min(free);
        source.energy -= amount;
        creep.energy += amount;
        ActionResult::Ok
    }

    fn build(&mut self, actor: usize, target: &ObjectId) -> ActionResult {
        let work = active(&self.world.creeps[actor], Part::Work);
        if work == 0 {
            return ActionResult::NoBodypart;
        }
        let Some(index) = self.world.sites.iter().position(|s| &s.id == target) else {
            return ActionResult::InvalidTarget;
        };
        let creep = &mut self.world.creeps[actor];
        let site = &mut self.world.sites[index];
        if site.owner == Owner::Hostile {
            return ActionResult::InvalidTarget;
        }
        if !creep.pos.in_range_to(&site.pos, 3) {
            return ActionResult::NotInRange;
        }
        if creep.energy == 0 {
            return ActionResult::Empty;
        }
        let amount = (BUILD_POWER * work).min(creep.energy).min(site.remaining());
        creep.energy -= amount;
        site.progress += amount;
        if site.remaining() == 0 {
            let site = self.world.sites.remove(index);
            debug!(structure = %site.id, kind = ?site.kind, "construction complete");
            self.world
                .structures
                .push(completed_structure(site.id, site.kind, site.owner, site.pos));
        }
        ActionResult::Ok
    }

    fn repair(&mut self, actor: usize, target: &ObjectId) -> ActionResult {
        let work = active(&self.world.creeps[actor], Part::Work);
        if work == 0 {
            return ActionResult::NoBodypart;
        }
        let Some(index) = self.structure_index(target) else {
            return ActionResult::InvalidTarget;
        };
        let creep = &mut self.world.creeps[actor];
        let structure = &mut self.world.structures[index];
        if structure.owner == Owner::Hostile || !structure.is_damaged() {
            return ActionResult::InvalidTarget;
        }
        if !creep.pos.in_range_to(&structure.pos, 3) {
            return ActionResult::NotInRange;
        }
        if creep.energy == 0 {
            return ActionResult::Empty;
        }
        let spent = work.min(creep.energy);
        creep.energy -= spent;
        structure.hits = (structure.hits + REPAIR_POWER * spent).min(structure.hits_max);
        ActionResult::Ok
    }

    fn transfer(&mut self, actor: usize, target: &ObjectId) -> ActionResult {
        let Some(index) = self.structure_index(target) else {
            return ActionResult::InvalidTarget;
        };
        let creep = &mut self.world.creeps[actor];
        let structure = &mut self.world.structures[index];
        if !creep.pos.in_range_to(&structure.pos, 1) {
            return ActionResult::NotInRange;
        }
        if creep.energy == 0 {
            return ActionResult::Empty;
        }
        let free = structure.free_capacity();
        if free == 0 {
            return ActionResult::Full;
        }
        let amount = creep.energy.min(free);
        creep.energy -= amount;
        structure.energy += amount;
        ActionResult::Ok
    }

    fn withdraw(&mut self, actor: usize, target: &ObjectId) -> ActionResult {
        let Some(index) = self.structure_index(target) else {
            return ActionResult::InvalidTarget;
        };
        let creep = &mut self.world.creeps[actor];
        let structure = &mut self.world.structures[index];
        if structure.owner == Owner::Hostile {
            return ActionResult::InvalidTarget;
        }
        if !creep.pos.in_range_to(&structure.pos, 1) {
            return ActionResult::NotInRange;
        }
        if structure.energy == 0 {
            return ActionResult::Empty;
        }
        let free = creep.free_capacity();
        if free == 0 {
            return ActionResult::Full;
        }
        let amount = structure.energy.min(free);
        structure.energy -= amount;
        creep.energy += amount;
        ActionResult::Ok
    }

    fn drop_energy(&mut self, actor: usize) -> ActionResult {
        let creep = &mut self.world.creeps[actor];
        if creep.energy == 0 {
            return ActionResult::Empty;
        }
        let amount = std::mem::take(&mut creep.energy);
        let pos = creep.pos.clone();
        match self.world.dropped.iter_mut().find(|pile| pile.pos == pos) {
            Some(pile) => pile.amount += amount,
            None => self.world.dropped.push(DroppedEnergy { pos, amount }),
        }
        ActionResult::Ok
    }
}

impl Host for SimHost {
    fn apply(&mut self, creep: &str, intent: &Intent) -> ActionResult {
        let Some(actor) = self.creep_index(creep) else {
            return ActionResult::InvalidTarget;
        };
        let result = match intent {
            Intent::MoveTo { goal, range } => self.move_to(actor, goal, *range),
            Intent::Attack { target } => self.attack(actor, target),
            Intent::Harvest { target } => self.harvest(actor, target),
            Intent::Build { target } => self.build(actor, target),
            Intent::Repair { target } => self.repair(actor, target),
            Intent::Transfer { target } => self.transfer(actor, target),
            Intent::Withdraw { target } => self.withdraw(actor, target),
            Intent::Drop => self.drop_energy(actor),
        };
        debug!(creep, action = intent.name(), ?result, "intent applied");
        result
    }
}

impl Spawner for SimHost {
    fn spawn(&mut self, request: &SpawnRequest) -> Result<String, SpawnError> {
        let room_name = request.memory.data.origin.as_str();
        if self.world.creep(&request.name).is_some() {
            return Err(SpawnError::NameTaken(request.name.clone()));
        }
        let spawn_pos = self
            .world
            .structures
            .iter()
            .find(|s| {
                s.kind == StructureKind::Spawn && s.owner == Owner::Mine && s.pos.room == room_name
            })
            .map(|s| s.pos.clone())
            .ok_or_else(|| SpawnError::NoSpawn(room_name.to_string()))?;

        let cost = body_cost(&request.body);
        let available = self
            .world
            .room(room_name)
            .map_or(0, |room| room.energy_available);
        if available < cost {
            return Err(SpawnError::InsufficientEnergy {
                room: room_name.to_string(),
                cost,
                available,
            });
        }
        if let Some(room) = self.world.rooms.iter_mut().find(|room| room.name == room_name) {
            room.energy_available -= cost;
        }

        let mut creep = Creep {
            name: request.name.clone(),
            owner: Owner::Mine,
            pos: spawn_pos,
            body: request.body.iter().copied().map(BodyPart::new).collect(),
            energy: 0,
            ticks_to_live: 0,
        };
        creep.ticks_to_live = creep.lifetime();
        info!(creep = %creep.name, room = room_name, cost, parts = creep.body.len(), "creep spawned");
        self.world.creeps.push(creep);
        Ok(request.name.clone())
    }
}

fn active(creep: &Creep, part: Part) -> u32 {
    u32::try_from(creep.active_parts(part)).unwrap_or(u32::MAX)
}

/// Damage lands on the first parts of the body first.
fn damage_body(body: &mut [BodyPart], mut damage: u32) {
    for body_part in body.iter_mut() {
        if damage == 0 {
            break;
        }
        let dealt = body_part.hits.min(damage);
        body_part.hits -= dealt;
        damage -= dealt;
    }
}

fn completed_structure(
    id: ObjectId,
    kind: StructureKind,
    owner: Owner,
    pos: Pos,
) -> Structure {
    Structure {
        id,
        kind,
        owner,
        pos,
        hits: kind.initial_hits(),
        hits_max: kind.initial_hits(),
        energy: 0,
        energy_capacity: kind.energy_capacity(),
    }
}
