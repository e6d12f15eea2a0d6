//! Deterministic, pure logic shared by the colony.
//!
//! Core modules must be free of I/O side effects. They operate on the
//! in-memory world snapshot and creep memory, and return intents for the host
//! to apply.

pub mod coordinator;
pub mod intent;
pub mod loadout;
pub mod memory;
pub mod mission;
pub mod roles;
pub mod run_loop;
pub mod target;
pub mod task;
pub mod types;
pub mod world;
