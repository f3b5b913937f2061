//! twig: a small content-addressed version-control engine
//!
//! The crate is organized the same way as the on-disk repository it manages:
//!
//! - `areas`: the persistent parts of a repository (object database, refs,
//!   staging area, working directory) and the `Repository` that ties them together
//! - `artifacts`: the data types and algorithms operating on those areas
//!   (objects, branches, staging records, checkout migrations, merges)
//! - `commands`: the user-facing operations, one per CLI subcommand
//! - `errors`: the typed failure taxonomy surfaced to the command layer

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

/// Name of the metadata directory at the root of every repository
pub const METADATA_DIR: &str = ".twig";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";
