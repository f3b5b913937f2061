//! Working directory status
//!
//! Compares the working directory against the head commit's tree and the
//! staging area.
//!
//! ## Components
//!
//! - `file_change`: kinds of unstaged changes
//! - `inspector`: per-file comparison against an expected blob
//! - `status_info`: the full report, one sorted set per section

pub mod file_change;
pub mod inspector;
pub mod status_info;
