//! Persisted per-creep memory records.
//!
//! Nothing survives between ticks except what is stored here. The run loop
//! decodes a record at the top of a tick and the tick orchestration encodes it
//! back once the creep has acted.

use serde::{Deserialize, Serialize};

use crate::core::task::Task;
use crate::core::types::{ObjectId, Pos, Role};
use crate::core::world::World;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreepMemory {
    pub role: Role,
    pub task: Option<Task>,
    pub assignment: Option<Assignment>,
    #[serde(default)]
    pub data: CreepData,
}

impl CreepMemory {
    pub fn new(role: Role, assignment: Option<Assignment>, origin: impl Into<String>) -> Self {
        Self {
            role,
            task: None,
            assignment,
            data: CreepData {
                origin: origin.into(),
                ..CreepData::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreepData {
    /// Room the creep was created in.
    #[serde(default)]
    pub origin: String,
    /// Age at which a replacement should be queued; `0` until stamped.
    #[serde(default)]
    pub replace_at: u32,
    /// Miner built with the long-distance pattern.
    #[serde(default)]
    pub remote: bool,
    /// Set while a guard works on a coordinator-issued task.
    #[serde(default)]
    pub working: bool,
}

/// What a creep's post refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRef {
    Object(ObjectId),
    Position(Pos),
    Mission(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(flatten)]
    pub target: AssignmentRef,
    /// Miner deposits into links instead of containers.
    #[serde(default)]
    pub linked: bool,
}

impl Assignment {
    pub fn object(id: ObjectId) -> Self {
        Self {
            target: AssignmentRef::Object(id),
            linked: false,
        }
    }

    pub fn position(pos: Pos) -> Self {
        Self {
            target: AssignmentRef::Position(pos),
            linked: false,
        }
    }

    pub fn mission(name: impl Into<String>) -> Self {
        Self {
            target: AssignmentRef::Mission(name.into()),
            linked: false,
        }
    }

    pub fn linked(mut self) -> Self {
        self.linked = true;
        self
    }

    /// Resolve against this tick's world. Missing objects and inactive
    /// missions resolve to `None`.
    pub fn resolve(&self, world: &World) -> Option<ResolvedAssignment> {
        let (pos, source, range) = match &self.target {
            AssignmentRef::Object(id) => {
                let pos = world.object(id)?.pos().clone();
                let source = world.source(id).map(|s| s.id.clone());
                (pos, source, 1)
            }
            AssignmentRef::Position(pos) => {
                let source = world.source_at(pos).map(|s| s.id.clone());
                (pos.clone(), source, 0)
            }
            AssignmentRef::Mission(name) => {
                let mission = world.missions.iter().find(|m| &m.name == name)?;
                if !mission.is_active(world) {
                    return None;
                }
                (mission.pos.clone(), None, 0)
            }
        };
        Some(ResolvedAssignment {
            pos,
            source,
            range,
            linked: self.linked,
        })
    }
}

/// An assignment bound to this tick's world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAssignment {
    pub pos: Pos,
    /// Energy source located at the assignment, if any.
    pub source: Option<ObjectId>,
    /// How close counts as being at the post. Objects cannot be stood on.
    pub range: u32,
    pub linked: bool,
}
