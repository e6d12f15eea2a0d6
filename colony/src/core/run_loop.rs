//! Per-creep, per-tick decision loop.
//!
//! 1. Re-validate the remembered task (kind + target) and ask the role whether
//!    it must be interrupted.
//! 2. If the task is gone, ask the role policy for a replacement.
//! 3. Step the task once, or walk toward the assignment, or idle.
//!
//! The loop only reads the world. Its effects are the returned intent and the
//! updated [`CreepMemory`](crate::core::memory::CreepMemory) in the context.

use serde::Serialize;
use tracing::{debug, info};

use crate::core::intent::Intent;
use crate::core::roles::{CreepContext, RolePolicy};
use crate::core::task::Task;

/// What the creep did this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The remembered task was still valid and stepped again.
    Continued { task: String },
    /// A new task was selected and stepped.
    Assigned {
        task: String,
        replaced: Option<String>,
    },
    /// No task; heading back to the assignment.
    Returning,
    /// No task and nowhere to go.
    Idle,
    /// The creep could not run this tick (e.g. its memory would not decode).
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreepTick {
    pub intent: Option<Intent>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl CreepTick {
    fn idle() -> Self {
        Self {
            intent: None,
            outcome: Outcome::Idle,
        }
    }
}

/// Run one tick for the creep in `ctx` under `policy`.
pub fn run_creep(ctx: &mut CreepContext<'_>, policy: &dyn RolePolicy) -> CreepTick {
    let (mut task, kept, replaced) = match ctx.memory.task.take() {
        Some(task) if keeps_task(ctx, policy, &task) => (Some(task), true, None),
        Some(stale) => {
            debug!(creep = %ctx.creep.name, task = stale.name(), "task dropped");
            (policy.decide(ctx), false, Some(stale.name().to_string()))
        }
        None => (policy.decide(ctx), false, None),
    };

    if let Some(current) = task.as_mut() {
        if let Some(intent) = current.step(ctx.creep, ctx.world) {
            let name = current.name().to_string();
            let outcome = if kept {
                Outcome::Continued { task: name }
            } else {
                debug!(creep = %ctx.creep.name, task = %name, target = ?current.target(), "task assigned");
                Outcome::Assigned {
                    task: name,
                    replaced,
                }
            };
            ctx.memory.task = task;
            return CreepTick {
                intent: Some(intent),
                outcome,
            };
        }
    }

    return_to_assignment(ctx, policy)
}

fn return_to_assignment(ctx: &mut CreepContext<'_>, policy: &dyn RolePolicy) -> CreepTick {
    let Some(assignment) = ctx.assignment() else {
        info!(creep = %ctx.creep.name, role = %policy.role(), "no task and no assignment; idling");
        return CreepTick::idle();
    };

    if let Some(range) = policy.arrival_range() {
        if ctx.creep.pos.in_range_to(&assignment.pos, range) {
            ctx.stamp_replacement(policy.replace_lead_ticks());
        }
    }

    if ctx.creep.pos.in_range_to(&assignment.pos, assignment.range) {
        info!(creep = %ctx.creep.name, role = %policy.role(), "at post with no task");
        return CreepTick::idle();
    }

    CreepTick {
        intent: Some(Intent::MoveTo {
            goal: assignment.pos,
            range: assignment.range,
        }),
        outcome: Outcome::Returning,
    }
}

/// Whether `task` would survive the validity and interrupt checks this tick.
pub fn keeps_task(ctx: &CreepContext<'_>, policy: &dyn RolePolicy, task: &Task) -> bool {
    task.is_valid(ctx.creep, ctx.world) && !policy.interrupts(ctx, task)
}
