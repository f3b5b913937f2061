//! Failure taxonomy
//!
//! Every expected failure of a repository operation is a `TwigError`. They travel
//! inside `anyhow::Error` like every other error in the crate and are recovered
//! with `downcast_ref::<TwigError>()` where the caller needs to tell them apart.
//!
//! Precondition failures are always raised before the operation mutates the
//! working directory or any persisted record.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

/// Broad class of a failure, used by the binary to pick an exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed invocation or unusable repository location
    Usage,
    /// A check that guards a mutation did not hold
    Precondition,
    /// A looked-up object, commit or file does not exist
    NotFound,
}

#[derive(Debug, Error)]
pub enum TwigError {
    #[error("{0}")]
    Usage(String),

    #[error("Not in an initialized twig directory.")]
    NotARepository,

    #[error("A twig version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error(
        "There is an untracked file in the way; delete it, or add and commit it first.\n{}",
        format_paths(paths)
    )]
    UntrackedFileConflict { paths: Vec<PathBuf> },

    #[error("A branch with that name does not exist.")]
    NoSuchBranch(String),

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,

    #[error("A branch with that name already exists.")]
    BranchExists(String),

    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,

    #[error("No reason to remove the file.")]
    NothingToRemove(PathBuf),

    #[error("No changes added to the commit.")]
    EmptyStage,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("File does not exist.")]
    FileNotFound(PathBuf),

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("No commit with that id exists.")]
    NoSuchCommit(String),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(PathBuf),

    #[error("Found no commit with that message.")]
    NoCommitWithMessage(String),
}

impl TwigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TwigError::Usage(_) | TwigError::NotARepository | TwigError::AlreadyInitialized => {
                ErrorKind::Usage
            }
            TwigError::UncommittedChanges
            | TwigError::UntrackedFileConflict { .. }
            | TwigError::NoSuchBranch(_)
            | TwigError::SelfMerge
            | TwigError::AlreadyOnBranch
            | TwigError::BranchExists(_)
            | TwigError::RemoveCurrentBranch
            | TwigError::NothingToRemove(_)
            | TwigError::EmptyStage
            | TwigError::EmptyMessage
            | TwigError::FileNotFound(_) => ErrorKind::Precondition,
            TwigError::ObjectNotFound(_)
            | TwigError::NoSuchCommit(_)
            | TwigError::FileNotInCommit(_)
            | TwigError::NoCommitWithMessage(_) => ErrorKind::NotFound,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("\t{}", path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
