//! Tick reports written to `.colony/ticks/`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::intent::{ActionResult, Intent};
use crate::core::run_loop::Outcome;
use crate::core::types::{ObjectId, Role};

/// What one creep did during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreepReport {
    pub name: String,
    pub role: Option<Role>,
    /// Task kind bound after the run loop, if any.
    pub task: Option<String>,
    pub target: Option<ObjectId>,
    pub intent: Option<Intent>,
    pub result: Option<ActionResult>,
    pub outcome: Outcome,
}

impl CreepReport {
    pub fn failed(name: &str, role: Option<Role>, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            role,
            task: None,
            target: None,
            intent: None,
            result: None,
            outcome: Outcome::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u32,
    pub creeps: Vec<CreepReport>,
    /// Creeps whose lifetime ran out at the end of the tick.
    pub expired: Vec<String>,
    /// Memory records dropped because their creep is gone.
    pub forgotten: Vec<String>,
    pub completed_missions: Vec<String>,
    /// Creeps old enough that a replacement should be queued.
    pub replacements_due: Vec<String>,
}

impl TickReport {
    pub fn failures(&self) -> usize {
        self.creeps.iter().filter(|creep| creep.is_failed()).count()
    }

    /// One-line summary for `colony run`.
    pub fn summary(&self) -> String {
        format!(
            "tick {}: {} creeps, {} failed, {} expired, {} replacements due",
            self.tick,
            self.creeps.len(),
            self.failures(),
            self.expired.len(),
            self.replacements_due.len()
        )
    }
}

/// Write `report` to `path`, creating the tick log directory if needed.
pub fn write_tick_report(path: &Path, report: &TickReport) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("create tick log dir {}", dir.display()))?;
    }
    let mut buf = serde_json::to_string_pretty(report)?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))
}
