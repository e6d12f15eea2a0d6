//! Per-tick creep AI for a screeps-style colony.
//!
//! Every tick each creep reloads its memory, re-validates its task, lets its
//! role pick a replacement when needed, steps the task once and stores its
//! memory again. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (body composition, targeting,
//!   tasks, role policies, the per-creep run loop). Reads a world snapshot and
//!   produces intents; never touches the filesystem.
//! - **[`io`]**: Side-effecting operations (state files, the simulated host
//!   that applies intents, tick reports).
//!
//! Orchestration modules ([`tick`], [`looping`], [`spawn`]) coordinate core
//! logic with I/O to implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod looping;
pub mod spawn;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tick;
