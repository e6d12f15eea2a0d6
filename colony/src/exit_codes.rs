//! Stable exit codes for colony CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to missing/invalid state, config or arguments.
pub const INVALID: i32 = 1;
/// The energy budget cannot pay for the requested creep.
pub const UNAFFORDABLE: i32 = 2;
