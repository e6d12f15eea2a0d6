//! Externally placed combat missions.
//!
//! Missions are created and removed by the host; the colony only reads their
//! location and whether they are still active.

use serde::{Deserialize, Serialize};

use crate::core::types::Pos;
use crate::core::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    /// Clear a room of hostile creeps and structures.
    Destroy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub name: String,
    pub kind: MissionKind,
    pub pos: Pos,
}

impl Mission {
    /// A destroy mission completes once its room has no hostiles of any kind.
    pub fn is_complete(&self, world: &World) -> bool {
        match self.kind {
            MissionKind::Destroy => {
                world.hostile_creeps_in(&self.pos.room).next().is_none()
                    && world.hostile_structures_in(&self.pos.room).next().is_none()
            }
        }
    }

    pub fn is_active(&self, world: &World) -> bool {
        !self.is_complete(world)
    }
}

/// Names of missions whose objective has been met.
pub fn completed_missions(world: &World) -> Vec<String> {
    world
        .missions
        .iter()
        .filter(|mission| mission.is_complete(world))
        .map(|mission| mission.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{hostile_creep, hostile_structure, pos};
    use crate::core::world::StructureKind;

    fn destroy(name: &str) -> Mission {
        Mission {
            name: name.to_string(),
            kind: MissionKind::Destroy,
            pos: pos(25, 25),
        }
    }

    #[test]
    fn destroy_mission_stays_active_while_hostile_structures_remain() {
        let mut world = World::empty(1);
        world.missions.push(destroy("raid"));
        world
            .structures
            .push(hostile_structure("tower", StructureKind::Tower, pos(30, 30)));
        assert!(world.missions[0].is_active(&world));
        assert!(completed_missions(&world).is_empty());
    }

    #[test]
    fn destroy_mission_completes_in_cleared_room() {
        let mut world = World::empty(1);
        world.missions.push(destroy("raid"));
        world.creeps.push(hostile_creep("invader", pos(3, 3)));
        assert!(world.missions[0].is_active(&world));

        world.creeps.clear();
        assert_eq!(completed_missions(&world), vec!["raid".to_string()]);
    }
}
