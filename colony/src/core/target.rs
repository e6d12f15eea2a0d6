//! Category-ordered target resolution.

use crate::core::types::{ObjectId, Owner, Pos};
use crate::core::world::{StructureKind, World};

/// A family of candidate targets in the creep's room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetCategory {
    HostileCreeps,
    HostileSpawns,
    /// Hostile structures that can still take damage.
    HostileStructures,
    HostileConstructionSites,
}

/// Guard attack priority.
pub const HOSTILE_PRIORITY: [TargetCategory; 4] = [
    TargetCategory::HostileCreeps,
    TargetCategory::HostileSpawns,
    TargetCategory::HostileStructures,
    TargetCategory::HostileConstructionSites,
];

/// Nearest match of the first category that yields any match.
///
/// Categories are never scored against each other: a distant hostile creep
/// beats an adjacent hostile spawn when creeps are listed first.
pub fn resolve(world: &World, from: &Pos, categories: &[TargetCategory]) -> Option<ObjectId> {
    categories
        .iter()
        .find_map(|category| closest_in_category(world, from, *category))
}

fn closest_in_category(world: &World, from: &Pos, category: TargetCategory) -> Option<ObjectId> {
    let room = from.room.as_str();
    match category {
        TargetCategory::HostileCreeps => {
            World::closest_by_range(from, world.hostile_creeps_in(room), |c| &c.pos)
                .map(|creep| creep.id())
        }
        TargetCategory::HostileSpawns => World::closest_by_range(
            from,
            world
                .hostile_structures_in(room)
                .filter(|s| s.kind == StructureKind::Spawn),
            |s| &s.pos,
        )
        .map(|s| s.id.clone()),
        TargetCategory::HostileStructures => World::closest_by_range(
            from,
            world.hostile_structures_in(room).filter(|s| s.hits > 0),
            |s| &s.pos,
        )
        .map(|s| s.id.clone()),
        TargetCategory::HostileConstructionSites => World::closest_by_range(
            from,
            world
                .sites
                .iter()
                .filter(|site| site.owner == Owner::Hostile && site.pos.room == room),
            |site| &site.pos,
        )
        .map(|site| site.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{hostile_creep, hostile_site, hostile_structure, pos};

    #[test]
    fn creeps_outrank_nearer_structures() {
        let mut world = World::empty(1);
        world
            .structures
            .push(hostile_structure("spawn", StructureKind::Spawn, pos(11, 10)));
        world.creeps.push(hostile_creep("far", pos(40, 40)));
        world.creeps.push(hostile_creep("near", pos(20, 20)));

        let target = resolve(&world, &pos(10, 10), &HOSTILE_PRIORITY);
        assert_eq!(target, Some(ObjectId::new("near")));
    }

    #[test]
    fn falls_through_to_later_categories() {
        let mut world = World::empty(1);
        world
            .structures
            .push(hostile_structure("tower", StructureKind::Tower, pos(12, 10)));
        world.sites.push(hostile_site("site", pos(11, 10)));

        let target = resolve(&world, &pos(10, 10), &HOSTILE_PRIORITY);
        assert_eq!(target, Some(ObjectId::new("tower")));
    }

    #[test]
    fn ignores_hostiles_in_other_rooms() {
        let mut world = World::empty(1);
        let mut elsewhere = hostile_creep("elsewhere", pos(10, 10));
        elsewhere.pos.room = "W2N1".to_string();
        world.creeps.push(elsewhere);

        assert_eq!(resolve(&world, &pos(10, 10), &HOSTILE_PRIORITY), None);
    }
}
