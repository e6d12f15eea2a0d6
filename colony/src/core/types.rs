//! Shared deterministic types for colony core logic.
//!
//! These types define stable contracts between core components and the
//! persisted state. They must not depend on external state or I/O.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hard upper bound on the number of parts a single creep may carry.
pub const MAX_CREEP_SIZE: usize = 50;
/// Lifetime of a creep without claim parts.
pub const CREEP_LIFE_TIME: u32 = 1500;
/// Lifetime of a creep carrying at least one claim part.
pub const CREEP_CLAIM_LIFE_TIME: u32 = 600;
/// Resource units held per active carry part.
pub const CARRY_CAPACITY: u32 = 50;
/// Hit points of a single body part.
pub const PART_HITS: u32 = 100;

/// Stable identifier of a world object (structure, creep, site, source).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tile inside a named room.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub room: String,
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(room: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            room: room.into(),
            x,
            y,
        }
    }

    pub fn same_room(&self, other: &Pos) -> bool {
        self.room == other.room
    }

    /// Chebyshev distance; `u32::MAX` across rooms.
    pub fn range_to(&self, other: &Pos) -> u32 {
        if !self.same_room(other) {
            return u32::MAX;
        }
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    pub fn in_range_to(&self, other: &Pos, range: u32) -> bool {
        self.range_to(other) <= range
    }

    /// The adjacent tile one step closer to `goal` (or `goal`'s room entry).
    pub fn step_toward(&self, goal: &Pos) -> Pos {
        if !self.same_room(goal) {
            return Pos::new(goal.room.clone(), self.x, self.y);
        }
        Pos::new(
            self.room.clone(),
            self.x + (goal.x - self.x).signum(),
            self.y + (goal.y - self.y).signum(),
        )
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{},{}", self.room, self.x, self.y)
    }
}

/// Capability unit a creep body is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Move,
    Work,
    Carry,
    Attack,
    RangedAttack,
    Heal,
    Tough,
    Claim,
}

impl Part {
    /// Energy cost of one unit of this part.
    pub fn cost(self) -> u32 {
        match self {
            Part::Move | Part::Carry => 50,
            Part::Work => 100,
            Part::Attack => 80,
            Part::RangedAttack => 150,
            Part::Heal => 250,
            Part::Tough => 10,
            Part::Claim => 600,
        }
    }
}

/// Total energy cost of a body.
pub fn body_cost(parts: &[Part]) -> u32 {
    parts.iter().map(|part| part.cost()).sum()
}

/// Who controls a world object, relative to this colony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    #[default]
    Mine,
    Hostile,
    Neutral,
}

/// Agent class; selects the role policy driving a creep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guard,
    Miner,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guard => "guard",
            Role::Miner => "miner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guard" => Ok(Role::Guard),
            "miner" => Ok(Role::Miner),
            other => Err(format!("unknown role '{other}' (expected guard or miner)")),
        }
    }
}
