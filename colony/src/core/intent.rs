//! World-mutation requests produced by stepping a task.

use serde::{Deserialize, Serialize};

use crate::core::types::{ObjectId, Pos};

/// One action a creep asks the host to perform this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Intent {
    /// Move one step toward `goal`, stopping once within `range`.
    MoveTo { goal: Pos, range: u32 },
    Attack { target: ObjectId },
    Harvest { target: ObjectId },
    Build { target: ObjectId },
    Repair { target: ObjectId },
    Transfer { target: ObjectId },
    Withdraw { target: ObjectId },
    Drop,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::MoveTo { .. } => "move_to",
            Intent::Attack { .. } => "attack",
            Intent::Harvest { .. } => "harvest",
            Intent::Build { .. } => "build",
            Intent::Repair { .. } => "repair",
            Intent::Transfer { .. } => "transfer",
            Intent::Withdraw { .. } => "withdraw",
            Intent::Drop => "drop",
        }
    }
}

/// Host verdict for an applied intent.
///
/// Only `Ok` mutates the world. The other variants are recoverable: the task
/// either keeps stepping or fails its validity checks next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionResult {
    Ok,
    NotInRange,
    Full,
    Empty,
    InvalidTarget,
    NoBodypart,
}
