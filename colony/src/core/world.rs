//! Per-tick snapshot of the world a creep acts in.
//!
//! The host hands the colony one [`World`] per tick. Core logic only reads it;
//! mutations travel back to the host as intents.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::mission::Mission;
use crate::core::types::{CARRY_CAPACITY, CREEP_CLAIM_LIFE_TIME, CREEP_LIFE_TIME, ObjectId, Owner, PART_HITS, Part, Pos};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub tick: u32,
    #[serde(default)]
    pub rooms: Vec<RoomState>,
    #[serde(default)]
    pub creeps: Vec<Creep>,
    #[serde(default)]
    pub structures: Vec<Structure>,
    #[serde(default)]
    pub sites: Vec<ConstructionSite>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub dropped: Vec<DroppedEnergy>,
    #[serde(default)]
    pub missions: Vec<Mission>,
}

/// Spawn energy bookkeeping of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    pub name: String,
    pub energy_available: u32,
    pub energy_capacity_available: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPart {
    pub part: Part,
    #[serde(default = "full_part_hits")]
    pub hits: u32,
}

fn full_part_hits() -> u32 {
    PART_HITS
}

impl BodyPart {
    pub fn new(part: Part) -> Self {
        Self {
            part,
            hits: PART_HITS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creep {
    pub name: String,
    #[serde(default)]
    pub owner: Owner,
    pub pos: Pos,
    pub body: Vec<BodyPart>,
    #[serde(default)]
    pub energy: u32,
    pub ticks_to_live: u32,
}

impl Creep {
    pub fn id(&self) -> ObjectId {
        ObjectId::new(self.name.clone())
    }

    /// Number of parts of `part` that still have hit points.
    pub fn active_parts(&self, part: Part) -> usize {
        self.body
            .iter()
            .filter(|body_part| body_part.part == part && body_part.hits > 0)
            .count()
    }

    pub fn has_active(&self, part: Part) -> bool {
        self.active_parts(part) > 0
    }

    pub fn hits(&self) -> u32 {
        self.body.iter().map(|body_part| body_part.hits).sum()
    }

    pub fn carry_capacity(&self) -> u32 {
        self.active_parts(Part::Carry) as u32 * CARRY_CAPACITY
    }

    pub fn free_capacity(&self) -> u32 {
        self.carry_capacity().saturating_sub(self.energy)
    }

    pub fn lifetime(&self) -> u32 {
        if self.body.iter().any(|body_part| body_part.part == Part::Claim) {
            CREEP_CLAIM_LIFE_TIME
        } else {
            CREEP_LIFE_TIME
        }
    }

    /// Ticks elapsed since the creep was created.
    pub fn age(&self) -> u32 {
        self.lifetime().saturating_sub(self.ticks_to_live)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    Spawn,
    Extension,
    Container,
    Link,
    Storage,
    Tower,
    Road,
    Wall,
    Rampart,
}

impl StructureKind {
    /// Hit points of a freshly completed structure.
    pub fn initial_hits(self) -> u32 {
        match self {
            StructureKind::Spawn => 5_000,
            StructureKind::Extension => 1_000,
            StructureKind::Container => 250_000,
            StructureKind::Link => 1_000,
            StructureKind::Storage => 10_000,
            StructureKind::Tower => 3_000,
            StructureKind::Road => 5_000,
            StructureKind::Wall | StructureKind::Rampart => 1,
        }
    }

    pub fn energy_capacity(self) -> u32 {
        match self {
            StructureKind::Spawn => 300,
            StructureKind::Extension => 50,
            StructureKind::Container => 2_000,
            StructureKind::Link => 800,
            StructureKind::Storage => 1_000_000,
            StructureKind::Tower => 1_000,
            StructureKind::Road | StructureKind::Wall | StructureKind::Rampart => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub id: ObjectId,
    pub kind: StructureKind,
    #[serde(default)]
    pub owner: Owner,
    pub pos: Pos,
    pub hits: u32,
    pub hits_max: u32,
    #[serde(default)]
    pub energy: u32,
    #[serde(default)]
    pub energy_capacity: u32,
}

impl Structure {
    pub fn is_damaged(&self) -> bool {
        self.hits < self.hits_max
    }

    pub fn free_capacity(&self) -> u32 {
        self.energy_capacity.saturating_sub(self.energy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionSite {
    pub id: ObjectId,
    pub kind: StructureKind,
    #[serde(default)]
    pub owner: Owner,
    pub pos: Pos,
    #[serde(default)]
    pub progress: u32,
    pub progress_total: u32,
}

impl ConstructionSite {
    pub fn remaining(&self) -> u32 {
        self.progress_total.saturating_sub(self.progress)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: ObjectId,
    pub pos: Pos,
    pub energy: u32,
    pub energy_capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedEnergy {
    pub pos: Pos,
    pub amount: u32,
}

/// Borrowed view of any world object addressable by id.
#[derive(Debug, Clone, Copy)]
pub enum ObjectRef<'a> {
    Creep(&'a Creep),
    Structure(&'a Structure),
    Site(&'a ConstructionSite),
    Source(&'a Source),
}

impl ObjectRef<'_> {
    pub fn pos(&self) -> &Pos {
        match self {
            ObjectRef::Creep(creep) => &creep.pos,
            ObjectRef::Structure(structure) => &structure.pos,
            ObjectRef::Site(site) => &site.pos,
            ObjectRef::Source(source) => &source.pos,
        }
    }
}

impl World {
    pub fn empty(tick: u32) -> Self {
        Self {
            tick,
            rooms: Vec::new(),
            creeps: Vec::new(),
            structures: Vec::new(),
            sites: Vec::new(),
            sources: Vec::new(),
            dropped: Vec::new(),
            missions: Vec::new(),
        }
    }

    pub fn creep(&self, name: &str) -> Option<&Creep> {
        self.creeps.iter().find(|creep| creep.name == name)
    }

    pub fn room(&self, name: &str) -> Option<&RoomState> {
        self.rooms.iter().find(|room| room.name == name)
    }

    /// Resolve an id against every object collection.
    pub fn object(&self, id: &ObjectId) -> Option<ObjectRef<'_>> {
        if let Some(structure) = self.structures.iter().find(|s| &s.id == id) {
            return Some(ObjectRef::Structure(structure));
        }
        if let Some(site) = self.sites.iter().find(|s| &s.id == id) {
            return Some(ObjectRef::Site(site));
        }
        if let Some(source) = self.sources.iter().find(|s| &s.id == id) {
            return Some(ObjectRef::Source(source));
        }
        self.creeps
            .iter()
            .find(|creep| creep.name == id.0)
            .map(ObjectRef::Creep)
    }

    pub fn structure(&self, id: &ObjectId) -> Option<&Structure> {
        self.structures.iter().find(|s| &s.id == id)
    }

    pub fn site(&self, id: &ObjectId) -> Option<&ConstructionSite> {
        self.sites.iter().find(|s| &s.id == id)
    }

    pub fn source(&self, id: &ObjectId) -> Option<&Source> {
        self.sources.iter().find(|s| &s.id == id)
    }

    pub fn source_at(&self, pos: &Pos) -> Option<&Source> {
        self.sources.iter().find(|s| &s.pos == pos)
    }

    pub fn hostile_creeps_in(&self, room: &str) -> impl Iterator<Item = &Creep> {
        self.creeps
            .iter()
            .filter(move |creep| creep.owner == Owner::Hostile && creep.pos.room == room)
    }

    pub fn hostile_structures_in(&self, room: &str) -> impl Iterator<Item = &Structure> {
        self.structures
            .iter()
            .filter(move |s| s.owner == Owner::Hostile && s.pos.room == room)
    }

    /// Structures within `range` of `pos` matching `filter`.
    pub fn structures_in_range<'a, F>(
        &'a self,
        pos: &'a Pos,
        range: u32,
        filter: F,
    ) -> impl Iterator<Item = &'a Structure>
    where
        F: Fn(&Structure) -> bool + 'a,
    {
        self.structures
            .iter()
            .filter(move |s| s.pos.in_range_to(pos, range) && filter(s))
    }

    /// Among `candidates`, the one closest to `from` by range; ties keep the first.
    pub fn closest_by_range<'a, T, I>(from: &Pos, candidates: I, pos_of: impl Fn(&T) -> &Pos) -> Option<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut best: Option<(u32, &'a T)> = None;
        for candidate in candidates {
            let range = from.range_to(pos_of(candidate));
            if range == u32::MAX {
                continue;
            }
            match best {
                Some((best_range, _)) if best_range <= range => {}
                _ => best = Some((range, candidate)),
            }
        }
        best.map(|(_, candidate)| candidate)
    }
}

/// Read-only facts computed once per tick and shared by every creep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickIntel {
    hostile_rooms: BTreeSet<String>,
}

impl TickIntel {
    pub fn gather(world: &World) -> Self {
        let hostile_rooms = world
            .creeps
            .iter()
            .filter(|creep| creep.owner == Owner::Hostile)
            .map(|creep| creep.pos.room.clone())
            .collect();
        Self { hostile_rooms }
    }

    pub fn has_hostiles(&self, room: &str) -> bool {
        self.hostile_rooms.contains(room)
    }
}
