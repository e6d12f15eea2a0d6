//! Resumable, validity-checked units of creep work.
//!
//! A [`Task`] is persisted in creep memory between ticks and rebuilt from it
//! at the top of every tick. Before stepping, the run loop re-checks both the
//! task kind (does the creep still have the parts for it) and the target
//! (does it still exist in a usable state). Any failed check abandons the task.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::intent::Intent;
use crate::core::types::{ObjectId, Owner, Part};
use crate::core::world::{Creep, ObjectRef, World};

/// Closed set of task kinds, each carrying only what it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskKind {
    Harvest { target: ObjectId },
    Attack { target: ObjectId },
    Build { target: ObjectId },
    Repair { target: ObjectId },
    Deposit { target: ObjectId },
    Recharge { target: ObjectId },
    DropEnergy,
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Harvest { .. } => "harvest",
            TaskKind::Attack { .. } => "attack",
            TaskKind::Build { .. } => "build",
            TaskKind::Repair { .. } => "repair",
            TaskKind::Deposit { .. } => "deposit",
            TaskKind::Recharge { .. } => "recharge",
            TaskKind::DropEnergy => "drop_energy",
        }
    }

    pub fn target(&self) -> Option<&ObjectId> {
        match self {
            TaskKind::Harvest { target }
            | TaskKind::Attack { target }
            | TaskKind::Build { target }
            | TaskKind::Repair { target }
            | TaskKind::Deposit { target }
            | TaskKind::Recharge { target } => Some(target),
            TaskKind::DropEnergy => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOptions {
    /// Suppress per-step diagnostics.
    #[serde(default)]
    pub quiet: bool,
}

fn is_default_options(options: &TaskOptions) -> bool {
    options == &TaskOptions::default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    kind: TaskKind,
    #[serde(default, skip_serializing_if = "is_default_options")]
    options: TaskOptions,
    /// Steps executed so far.
    #[serde(default)]
    steps: u32,
}

impl Task {
    fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            options: TaskOptions::default(),
            steps: 0,
        }
    }

    pub fn harvest(target: ObjectId) -> Self {
        Self::new(TaskKind::Harvest { target })
    }

    pub fn attack(target: ObjectId) -> Self {
        Self::new(TaskKind::Attack { target })
    }

    pub fn build(target: ObjectId) -> Self {
        Self::new(TaskKind::Build { target })
    }

    pub fn repair(target: ObjectId) -> Self {
        Self::new(TaskKind::Repair { target })
    }

    pub fn deposit(target: ObjectId) -> Self {
        Self::new(TaskKind::Deposit { target })
    }

    pub fn recharge(target: ObjectId) -> Self {
        Self::new(TaskKind::Recharge { target })
    }

    pub fn drop_energy() -> Self {
        Self::new(TaskKind::DropEnergy)
    }

    pub fn quiet(mut self) -> Self {
        self.options.quiet = true;
        self
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn target(&self) -> Option<&ObjectId> {
        self.kind.target()
    }

    pub fn options(&self) -> &TaskOptions {
        &self.options
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Whether the creep can still perform this kind of work.
    ///
    /// Fails closed: losing the required parts invalidates the task.
    pub fn is_valid_task_kind(&self, creep: &Creep) -> bool {
        match &self.kind {
            TaskKind::Harvest { .. } => creep.has_active(Part::Work) && creep.free_capacity() > 0,
            TaskKind::Attack { .. } => {
                creep.has_active(Part::Attack) || creep.has_active(Part::RangedAttack)
            }
            TaskKind::Build { .. } | TaskKind::Repair { .. } => {
                creep.has_active(Part::Work) && creep.energy > 0
            }
            TaskKind::Deposit { .. } | TaskKind::DropEnergy => creep.energy > 0,
            TaskKind::Recharge { .. } => creep.free_capacity() > 0,
        }
    }

    /// Whether the bound target still exists and satisfies kind preconditions.
    pub fn is_valid_target(&self, world: &World) -> bool {
        match &self.kind {
            TaskKind::Harvest { target } => world
                .source(target)
                .is_some_and(|source| source.energy > 0),
            TaskKind::Attack { target } => match world.object(target) {
                Some(ObjectRef::Creep(creep)) => creep.owner == Owner::Hostile && creep.hits() > 0,
                Some(ObjectRef::Structure(structure)) => {
                    structure.owner == Owner::Hostile && structure.hits > 0
                }
                Some(ObjectRef::Site(site)) => site.owner == Owner::Hostile,
                Some(ObjectRef::Source(_)) | None => false,
            },
            TaskKind::Build { target } => world
                .site(target)
                .is_some_and(|site| site.owner == Owner::Mine && site.remaining() > 0),
            TaskKind::Repair { target } => world
                .structure(target)
                .is_some_and(|s| s.owner != Owner::Hostile && s.is_damaged()),
            TaskKind::Deposit { target } => world
                .structure(target)
                .is_some_and(|s| s.owner != Owner::Hostile && s.free_capacity() > 0),
            TaskKind::Recharge { target } => world
                .structure(target)
                .is_some_and(|s| s.owner != Owner::Hostile && s.energy > 0),
            TaskKind::DropEnergy => true,
        }
    }

    pub fn is_valid(&self, creep: &Creep, world: &World) -> bool {
        self.is_valid_task_kind(creep) && self.is_valid_target(world)
    }

    /// Range at which the task acts instead of moving.
    pub fn range(&self, creep: &Creep) -> u32 {
        match &self.kind {
            TaskKind::Attack { .. } if !creep.has_active(Part::Attack) => 3,
            TaskKind::Build { .. } | TaskKind::Repair { .. } => 3,
            TaskKind::DropEnergy => 0,
            _ => 1,
        }
    }

    /// One tick of work: move toward the target when out of range, act otherwise.
    ///
    /// Returns `None` only when the target cannot be resolved, which the next
    /// validity check turns into a replacement.
    pub fn step(&mut self, creep: &Creep, world: &World) -> Option<Intent> {
        let intent = match self.kind.target() {
            None => self.act(),
            Some(target) => {
                let target_pos = world.object(target)?.pos().clone();
                let range = self.range(creep);
                if creep.pos.in_range_to(&target_pos, range) {
                    self.act()
                } else {
                    Intent::MoveTo {
                        goal: target_pos,
                        range,
                    }
                }
            }
        };
        self.steps += 1;
        if !self.options.quiet {
            debug!(creep = %creep.name, task = self.name(), steps = self.steps, action = intent.name(), "task step");
        }
        Some(intent)
    }

    fn act(&self) -> Intent {
        match &self.kind {
            TaskKind::Harvest { target } => Intent::Harvest {
                target: target.clone(),
            },
            TaskKind::Attack { target } => Intent::Attack {
                target: target.clone(),
            },
            TaskKind::Build { target } => Intent::Build {
                target: target.clone(),
            },
            TaskKind::Repair { target } => Intent::Repair {
                target: target.clone(),
            },
            TaskKind::Deposit { target } => Intent::Transfer {
                target: target.clone(),
            },
            TaskKind::Recharge { target } => Intent::Withdraw {
                target: target.clone(),
            },
            TaskKind::DropEnergy => Intent::Drop,
        }
    }
}
