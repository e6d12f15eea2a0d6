//! Guard: walks to its post and attacks anything hostile in the room.
//!
//! Meant for low-level invaders. Between fights a guard with work and carry
//! parts recharges from containers and takes generic room work.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::loadout::LoadoutPattern;
use crate::core::roles::{CreepContext, RolePolicy};
use crate::core::target::{HOSTILE_PRIORITY, resolve};
use crate::core::task::{Task, TaskKind};
use crate::core::types::{Owner, Part, Role};
use crate::core::world::{StructureKind, World};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardSettings {
    pub repetition_limit: usize,
    /// Range to the post within which the replacement age is stamped.
    pub arrival_range: u32,
    pub replace_lead_ticks: u32,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            repetition_limit: 4,
            arrival_range: 5,
            replace_lead_ticks: 25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GuardPolicy {
    settings: GuardSettings,
}

impl GuardPolicy {
    pub fn new(settings: GuardSettings) -> Self {
        Self { settings }
    }

    fn attack(&self, ctx: &CreepContext<'_>) -> Option<Task> {
        let target = resolve(ctx.world, &ctx.creep.pos, &HOSTILE_PRIORITY)?;
        let task = Task::attack(target);
        task.is_valid_task_kind(ctx.creep).then_some(task)
    }

    fn recharge(&self, ctx: &CreepContext<'_>) -> Option<Task> {
        let room = ctx.creep.pos.room.as_str();
        let containers = ctx.world.structures.iter().filter(|s| {
            s.kind == StructureKind::Container
                && s.owner != Owner::Hostile
                && s.pos.room == room
                && s.energy > 0
        });
        World::closest_by_range(&ctx.creep.pos, containers, |s| &s.pos)
            .map(|container| Task::recharge(container.id.clone()))
    }
}

impl RolePolicy for GuardPolicy {
    fn role(&self) -> Role {
        Role::Guard
    }

    fn loadout(&self, _remote: bool) -> (LoadoutPattern, usize) {
        let pattern = LoadoutPattern::repeating(&[Part::Attack, Part::Move])
            .with_prefix(&[Part::Tough])
            .with_suffix(&[Part::Work, Part::Carry]);
        (pattern, self.settings.repetition_limit)
    }

    fn replace_lead_ticks(&self) -> u32 {
        self.settings.replace_lead_ticks
    }

    fn arrival_range(&self) -> Option<u32> {
        Some(self.settings.arrival_range)
    }

    /// Hostiles in the room preempt anything that is not already an attack,
    /// as long as the guard still has something to attack with.
    fn interrupts(&self, ctx: &CreepContext<'_>, current: &Task) -> bool {
        ctx.intel.has_hostiles(&ctx.creep.pos.room)
            && !matches!(current.kind(), TaskKind::Attack { .. })
            && (ctx.creep.has_active(Part::Attack) || ctx.creep.has_active(Part::RangedAttack))
    }

    fn decide(&self, ctx: &mut CreepContext<'_>) -> Option<Task> {
        // Outside the assigned room the run loop walks the guard there.
        if let Some(assignment) = ctx.assignment() {
            if !ctx.creep.pos.same_room(&assignment.pos) {
                return None;
            }
        }

        // Only hostile creeps raise the alarm, so leftover structures and
        // sites are never hunted once the creeps are gone.
        if ctx.intel.has_hostiles(&ctx.creep.pos.room) {
            if let Some(task) = self.attack(ctx) {
                return Some(task);
            }
        }

        if ctx.creep.has_active(Part::Carry) && ctx.creep.has_active(Part::Work) {
            if ctx.creep.energy == 0 {
                return self.recharge(ctx);
            }
            let task = ctx.coordinator.request_task(ctx.creep, ctx.world);
            ctx.memory.data.working = task.is_some();
            debug!(creep = %ctx.creep.name, task = ?task.as_ref().map(Task::name), "guard requested room work");
            return task;
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinator::RoomWorkQueue;
    use crate::core::memory::{Assignment, CreepMemory};
    use crate::core::types::{ObjectId, Pos};
    use crate::core::world::{Creep, TickIntel};
    use crate::test_support::{container, guard_creep, hostile_creep, hostile_structure, own_site, pos};

    fn decide(creep: &Creep, memory: &mut CreepMemory, world: &World) -> Option<Task> {
        let intel = TickIntel::gather(world);
        let mut ctx = CreepContext {
            creep,
            memory,
            world,
            intel: &intel,
            coordinator: &RoomWorkQueue,
        };
        GuardPolicy::new(GuardSettings::default()).decide(&mut ctx)
    }

    #[test]
    fn attacks_nearest_hostile_creep_before_structures() {
        let mut world = World::empty(1);
        world
            .structures
            .push(hostile_structure("spawn", StructureKind::Spawn, pos(11, 11)));
        world.creeps.push(hostile_creep("a", pos(30, 30)));
        world.creeps.push(hostile_creep("b", pos(20, 20)));
        let guard = guard_creep("g", pos(10, 10));
        let mut memory = CreepMemory::new(Role::Guard, None, "W1N1");

        let task = decide(&guard, &mut memory, &world).expect("task");
        assert_eq!(task, Task::attack(ObjectId::new("b")));
    }

    #[test]
    fn abstains_outside_assigned_room() {
        let mut world = World::empty(1);
        world.creeps.push(hostile_creep("a", pos(12, 12)));
        let guard = guard_creep("g", pos(10, 10));
        let mut memory = CreepMemory::new(
            Role::Guard,
            Some(Assignment::position(Pos::new("W2N1", 25, 25))),
            "W1N1",
        );

        assert_eq!(decide(&guard, &mut memory, &world), None);
    }

    #[test]
    fn empty_worker_guard_recharges_from_container() {
        let mut world = World::empty(1);
        world.structures.push(container("c1", pos(14, 14), 500));
        let guard = guard_creep("g", pos(10, 10));
        let mut memory = CreepMemory::new(Role::Guard, None, "W1N1");

        let task = decide(&guard, &mut memory, &world).expect("task");
        assert_eq!(task, Task::recharge(ObjectId::new("c1")));
    }

    #[test]
    fn loaded_worker_guard_takes_room_work() {
        let mut world = World::empty(1);
        world.sites.push(own_site("site", pos(12, 12)));
        let mut guard = guard_creep("g", pos(10, 10));
        guard.energy = 50;
        let mut memory = CreepMemory::new(Role::Guard, None, "W1N1");

        let task = decide(&guard, &mut memory, &world).expect("task");
        assert_eq!(task, Task::build(ObjectId::new("site")));
        assert!(memory.data.working);
    }

    #[test]
    fn interrupts_non_attack_tasks_when_hostiles_appear() {
        let mut world = World::empty(1);
        let guard = guard_creep("g", pos(10, 10));
        let mut memory = CreepMemory::new(Role::Guard, None, "W1N1");
        let policy = GuardPolicy::new(GuardSettings::default());
        let repair = Task::repair(ObjectId::new("c1"));

        let quiet = TickIntel::gather(&world);
        let ctx = CreepContext {
            creep: &guard,
            memory: &mut memory,
            world: &world,
            intel: &quiet,
            coordinator: &RoomWorkQueue,
        };
        assert!(!policy.interrupts(&ctx, &repair));

        world.creeps.push(hostile_creep("a", pos(20, 20)));
        let alarmed = TickIntel::gather(&world);
        let ctx = CreepContext {
            creep: &guard,
            memory: &mut memory,
            world: &world,
            intel: &alarmed,
            coordinator: &RoomWorkQueue,
        };
        assert!(policy.interrupts(&ctx, &repair));
        assert!(!policy.interrupts(&ctx, &Task::attack(ObjectId::new("a"))));
    }

    #[test]
    fn disarmed_guard_is_not_interrupted_by_hostiles() {
        let mut world = World::empty(1);
        world.creeps.push(hostile_creep("a", pos(20, 20)));
        let mut guard = guard_creep("g", pos(10, 10));
        guard.body[1].hits = 0;
        let mut memory = CreepMemory::new(Role::Guard, None, "W1N1");
        let intel = TickIntel::gather(&world);
        let ctx = CreepContext {
            creep: &guard,
            memory: &mut memory,
            world: &world,
            intel: &intel,
            coordinator: &RoomWorkQueue,
        };

        let policy = GuardPolicy::new(GuardSettings::default());
        assert!(!policy.interrupts(&ctx, &Task::build(ObjectId::new("site"))));
    }
}
