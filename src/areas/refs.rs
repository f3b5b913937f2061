//! Branch references and HEAD
//!
//! ## File Format
//!
//! - `HEAD`: `ref: refs/heads/<branch>`, naming the current branch
//! - `refs/heads/<branch>`: the 40-character ID of the branch head commit
//!
//! Branch names may contain `/`, which maps to nested directories.

use crate::areas::database::Database;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::repository_state::RepositoryState;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (`.twig`)
    path: Box<Path>,
}

impl Refs {
    /// Read HEAD and every branch head
    ///
    /// Every head must name a commit present in the object database.
    ///
    /// # Arguments
    ///
    /// * `database` - Store used to check that every head exists
    ///
    /// # Returns
    ///
    /// The branch heads and the branch HEAD points to
    pub fn load_state(&self, database: &Database) -> anyhow::Result<RepositoryState> {
        let current_branch = self.read_head()?;

        let mut branches = BTreeMap::new();
        for (branch, oid) in self.read_branches()? {
            if !database.contains(&oid) {
                return Err(TwigError::ObjectNotFound(oid))
                    .with_context(|| format!("branch {branch} points to a missing commit"));
            }
            branches.insert(branch, oid);
        }

        RepositoryState::from_parts(branches, current_branch)
    }

    /// Persist the state: one file per branch, stale branch files removed, HEAD last
    pub fn save_state(&self, state: &RepositoryState) -> anyhow::Result<()> {
        for (branch, oid) in state.branches() {
            let branch_path = self.branch_path(branch).into_boxed_path();
            let current = self.read_ref_file(&branch_path)?;

            if current.as_ref() != Some(oid) {
                self.update_ref_file(branch_path, oid.as_ref().to_string())?;
            }
        }

        for (branch, _) in self.read_branches()? {
            if state.head_of(&branch).is_none() {
                self.delete_branch_file(&branch)?;
            }
        }

        self.update_ref_file(
            self.head_path(),
            format!("ref: {}", state.current_branch().to_ref_path()),
        )
    }

    fn read_head(&self) -> anyhow::Result<BranchName> {
        let content = self.read_locked(&self.head_path())?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content)
            .with_context(|| format!("HEAD is not a symbolic reference: {content:?}"))?;

        BranchName::try_parse_ref_path(&symref_match[1])
    }

    fn read_branches(&self) -> anyhow::Result<Vec<(BranchName, ObjectId)>> {
        let heads_path = self.heads_path();
        let mut branches = Vec::new();

        for entry in WalkDir::new(&heads_path).min_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry
                .path()
                .strip_prefix(heads_path.as_ref())?
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let branch = BranchName::try_parse(name)?;

            if let Some(oid) = self.read_ref_file(entry.path())? {
                branches.push((branch, oid));
            }
        }

        Ok(branches)
    }

    fn read_ref_file(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = self.read_locked(path)?;
        let content = content.trim();

        if content.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ObjectId::try_parse(content.to_string())?))
        }
    }

    fn read_locked(&self, path: &Path) -> anyhow::Result<String> {
        let mut ref_file = std::fs::OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Shared, 0, 1)?;

        let mut content = String::new();
        lock.deref_mut()
            .read_to_string(&mut content)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;

        Ok(content)
    }

    fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn delete_branch_file(&self, branch: &BranchName) -> anyhow::Result<()> {
        let branch_path = self.branch_path(branch);

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        tracing::debug!(%branch, "deleted branch ref");

        self.prune_branch_empty_parent_dirs(&branch_path)
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn branch_path(&self, branch: &BranchName) -> PathBuf {
        self.heads_path().join(branch.as_ref())
    }
}
