//! Turning the staging area into commits

pub mod commit_writer;
