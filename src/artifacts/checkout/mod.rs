//! Checkout operations
//!
//! Switching the working directory from one snapshot to another is split into
//! planning and execution. Planning computes the file actions and detects
//! untracked files that would be overwritten. Nothing is written unless the
//! plan is free of conflicts.

pub mod migration;
