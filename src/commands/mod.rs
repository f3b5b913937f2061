//! Command implementations
//!
//! Every subcommand of the `twig` binary is a method on `Repository`, defined
//! in its own module under `porcelain`. A command loads the branch state and
//! the stage, runs the operation, and saves both once at the end.

pub mod porcelain;
