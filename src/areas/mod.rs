//! Persistent parts of a repository
//!
//! - `database`: content-addressed store of blobs and commits
//! - `refs`: branch heads and HEAD
//! - `repository`: ties the areas together for the command layer
//! - `staging`: pending changes for the next commit
//! - `workspace`: working directory file operations

pub mod database;
pub mod refs;
pub mod repository;
pub mod staging;
pub mod workspace;
