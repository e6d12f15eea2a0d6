//! Multi-tick looping helper for `colony run`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::io::tick_log::TickReport;
use crate::tick::run_tick;

/// Summary of a loop invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    pub first_tick: Option<u32>,
    pub ticks_run: u32,
    /// Creep-ticks that ended in `Failed`, summed over the run.
    pub failures: usize,
}

/// Run `colony tick` `ticks` times, calling `on_tick` after each one.
///
/// Stops at the first error; creep-level failures are counted, not errors.
pub fn run_ticks<F: FnMut(&TickReport)>(
    root: &Path,
    ticks: u32,
    mut on_tick: F,
) -> Result<LoopOutcome> {
    let mut outcome = LoopOutcome {
        first_tick: None,
        ticks_run: 0,
        failures: 0,
    };
    for _ in 0..ticks {
        let report = run_tick(root)
            .with_context(|| format!("tick {} of {ticks}", outcome.ticks_run + 1))?;
        outcome.first_tick.get_or_insert(report.tick);
        outcome.ticks_run += 1;
        outcome.failures += report.failures();
        on_tick(&report);
    }
    Ok(outcome)
}
