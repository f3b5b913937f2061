//! User-facing commands
//!
//! - `init`: create a repository with its initial commit
//! - `add`, `rm`: stage additions and removals
//! - `commit`: record the stage as a commit
//! - `log`: first-parent history, every commit, or commits by message
//! - `status`: branches, stage and working directory changes
//! - `checkout`: restore files or switch branches
//! - `branch`: create and remove branches
//! - `reset`: move the current branch to another commit
//! - `merge`: merge another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
