//! Process exit codes
//!
//! Every failure class (usage, missing binary, execution, persistence)
//! collapses to a single nonzero code.

/// Output captured and persisted
pub const OK: i32 = 0;

/// Any failure
pub const FAILURE: i32 = 1;
