//! Version-control data structures and algorithms
//!
//! - `branch`: branch names and the branch-to-head mapping
//! - `checkout`: moving the working directory between snapshots
//! - `commit`: turning the stage into commits
//! - `core`: shared utilities (configuration, pager wrapper)
//! - `merge`: split-point discovery and three-way merging
//! - `objects`: content-addressed object types (blob, commit)
//! - `staging`: the binary record format of the staging area
//! - `status`: working directory status inspection

pub mod branch;
pub mod checkout;
pub mod commit;
pub mod core;
pub mod merge;
pub mod objects;
pub mod staging;
pub mod status;
