//! Merging one branch into another
//!
//! - `split_point`: common-ancestor discovery over the commit DAG
//! - `three_way`: per-path reconciliation rules and conflict content
//! - `merger`: the full merge, from precondition checks to the merge commit

pub mod merger;
pub mod split_point;
pub mod three_way;
