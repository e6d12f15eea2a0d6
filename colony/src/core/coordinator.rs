//! Room-level source of generic work for creeps with spare capacity.

use crate::core::task::Task;
use crate::core::types::Owner;
use crate::core::world::{Creep, World};

/// Hands out generic work to creeps whose role has nothing specific to do.
pub trait Coordinator {
    fn request_task(&self, creep: &Creep, world: &World) -> Option<Task>;
}

/// Default coordinator: repair the nearest damaged own structure in the room,
/// otherwise build the nearest own construction site.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomWorkQueue;

impl Coordinator for RoomWorkQueue {
    fn request_task(&self, creep: &Creep, world: &World) -> Option<Task> {
        let room = creep.pos.room.as_str();
        let damaged = world
            .structures
            .iter()
            .filter(|s| s.owner == Owner::Mine && s.pos.room == room && s.is_damaged());
        if let Some(structure) = World::closest_by_range(&creep.pos, damaged, |s| &s.pos) {
            return Some(Task::repair(structure.id.clone()));
        }
        let sites = world
            .sites
            .iter()
            .filter(|site| site.owner == Owner::Mine && site.pos.room == room);
        World::closest_by_range(&creep.pos, sites, |site| &site.pos)
            .map(|site| Task::build(site.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::TaskKind;
    use crate::core::types::{ObjectId, Part};
    use crate::test_support::{body, container, creep, own_site, pos};

    #[test]
    fn repair_takes_precedence_over_build() {
        let mut world = World::empty(1);
        world.sites.push(own_site("site", pos(11, 10)));
        let mut damaged = container("c1", pos(30, 30), 0);
        damaged.hits = 10;
        world.structures.push(damaged);

        let worker = creep("w", pos(10, 10), body(&[Part::Work, Part::Carry, Part::Move]));
        let task = RoomWorkQueue.request_task(&worker, &world).expect("task");
        assert_eq!(
            task.kind(),
            &TaskKind::Repair {
                target: ObjectId::new("c1")
            }
        );
    }

    #[test]
    fn no_work_yields_none() {
        let world = World::empty(1);
        let worker = creep("w", pos(10, 10), body(&[Part::Work, Part::Carry, Part::Move]));
        assert_eq!(RoomWorkQueue.request_task(&worker, &world), None);
    }
}
