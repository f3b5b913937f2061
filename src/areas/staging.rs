//! Staging area
//!
//! Records the changes that the next commit will apply on top of the head
//! commit's tree. Each staged path carries exactly one `StagedChange`. Content
//! staged for addition is snapshotted under `.twig/staging/<oid>` at `add`
//! time, so later edits to the working file do not leak into the commit.
//!
//! ## Persistence
//!
//! - `.twig/stage`: binary record of the staged changes (see `artifacts::staging`)
//! - `.twig/staging/`: snapshot contents, one file per distinct blob ID
//!
//! The stage file is read under a shared lock and written under an exclusive
//! one. Its trailing checksum is verified on every load.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::FileTree;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::staging::checksum::Checksum;
use crate::artifacts::staging::stage_entry::{ENTRY_FIXED_SIZE, StageEntry, StagedChange};
use crate::artifacts::staging::stage_header::StageHeader;
use crate::artifacts::staging::HEADER_SIZE;
use crate::errors::TwigError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct StagingArea {
    /// Path to the stage file (`.twig/stage`)
    path: Box<Path>,
    /// Directory holding staged snapshots (`.twig/staging`)
    snapshots_path: Box<Path>,
    entries: BTreeMap<PathBuf, StagedChange>,
    changed: bool,
}

impl StagingArea {
    pub fn new(path: Box<Path>, snapshots_path: Box<Path>) -> Self {
        StagingArea {
            path,
            snapshots_path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshots_path(&self) -> &Path {
        &self.snapshots_path
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn change_of(&self, path: &Path) -> Option<&StagedChange> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &StagedChange)> {
        self.entries.iter()
    }

    pub fn added(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths_matching(|change| matches!(change, StagedChange::Added(_)))
    }

    pub fn modified(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths_matching(|change| matches!(change, StagedChange::Modified(_)))
    }

    pub fn removed(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths_matching(|change| matches!(change, StagedChange::Removed))
    }

    fn paths_matching(
        &self,
        predicate: impl Fn(&StagedChange) -> bool,
    ) -> impl Iterator<Item = &PathBuf> {
        self.entries
            .iter()
            .filter(move |entry| predicate(entry.1))
            .map(|(path, _)| path)
    }

    /// Load the stage file from disk
    ///
    /// A missing or empty stage file means nothing is staged.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut stage_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut stage_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = Self::parse_header(&mut reader)?;
        for _ in 0..entries_count {
            let entry = Self::parse_entry(&mut reader)?;
            self.entries.insert(entry.path, entry.change);
        }

        reader
            .verify()
            .with_context(|| format!("Corrupt stage file {}", self.path.display()))
    }

    fn parse_header(reader: &mut Checksum) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = StageHeader::deserialize(std::io::Cursor::new(header_bytes))?;
        header.validate()?;

        Ok(header.entries_count)
    }

    fn parse_entry(reader: &mut Checksum) -> anyhow::Result<StageEntry> {
        let prefix = reader.read(ENTRY_FIXED_SIZE)?;
        let path_length = StageEntry::path_length(&prefix)?;
        let path = reader.read(path_length)?;

        let entry_bytes = [prefix.as_ref(), path.as_ref()].concat();
        StageEntry::deserialize(std::io::Cursor::new(entry_bytes))
    }

    /// Persist the staged changes if anything changed since loading
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut stage_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let lock = file_guard::lock(&mut stage_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        let header = StageHeader::with_count(u32::try_from(self.entries.len())?);
        writer.write(&header.serialize()?)?;

        for (path, change) in &self.entries {
            let entry = StageEntry::new(path.clone(), change.clone());
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }

    /// Stage the working copy of `path` against the head tree
    ///
    /// Content identical to the head version cancels any pending change.
    pub fn stage_add(
        &mut self,
        workspace: &Workspace,
        path: &Path,
        head_tree: &FileTree,
    ) -> anyhow::Result<()> {
        let content = workspace.read_file(path)?;
        self.stage_content(path, content, head_tree)
    }

    /// Stage arbitrary content for `path`, as `add` would for a file holding it
    pub fn stage_content(
        &mut self,
        path: &Path,
        content: Bytes,
        head_tree: &FileTree,
    ) -> anyhow::Result<()> {
        let blob = Blob::new(content);
        let oid = blob.object_id()?;

        if head_tree.get(path) == Some(&oid) {
            tracing::debug!(path = %path.display(), "content matches head, unstaging");
            self.discard(path)?;
            return Ok(());
        }

        self.write_snapshot(&oid, blob.content())?;
        let change = if head_tree.contains_key(path) {
            StagedChange::Modified(oid)
        } else {
            StagedChange::Added(oid)
        };
        tracing::debug!(path = %path.display(), ?change, "staged");

        self.replace(path, change)
    }

    /// Unstage or schedule `path` for removal
    ///
    /// A tracked file is deleted from the working directory only while it still
    /// holds the tracked content.
    pub fn stage_remove(
        &mut self,
        workspace: &Workspace,
        path: &Path,
        head_tree: &FileTree,
    ) -> anyhow::Result<()> {
        if let Some(StagedChange::Added(_)) = self.entries.get(path) {
            tracing::debug!(path = %path.display(), "unstaged addition");
            return self.discard(path);
        }

        let Some(tracked_oid) = head_tree.get(path) else {
            return Err(TwigError::NothingToRemove(path.to_path_buf()).into());
        };

        if workspace.hash_file(path)?.as_ref() == Some(tracked_oid) {
            workspace.remove_file(path)?;
        }

        self.stage_removal(path)
    }

    /// Schedule `path` for removal without touching the working directory
    pub fn stage_removal(&mut self, path: &Path) -> anyhow::Result<()> {
        tracing::debug!(path = %path.display(), "staged removal");
        self.replace(path, StagedChange::Removed)
    }

    /// The tree of the next commit: head overlaid with every staged change
    ///
    /// Staged snapshots are moved into the object database.
    ///
    /// # Arguments
    ///
    /// * `database` - Store receiving the staged blobs
    /// * `head_tree` - Tree of the current head commit
    ///
    /// # Returns
    ///
    /// The new tree, or `EmptyStage` if nothing is staged
    pub fn build_tree(
        &self,
        database: &Database,
        head_tree: &FileTree,
    ) -> anyhow::Result<FileTree> {
        if self.is_empty() {
            return Err(TwigError::EmptyStage.into());
        }

        let mut tree = head_tree.clone();
        for (path, change) in &self.entries {
            match change.snapshot() {
                Some(oid) => {
                    let stored = database.put(self.read_snapshot(oid)?)?;
                    if &stored != oid {
                        anyhow::bail!("Staged snapshot {oid} does not match its content");
                    }
                    tree.insert(path.clone(), stored);
                }
                None => {
                    tree.remove(path);
                }
            }
        }

        Ok(tree)
    }

    /// Drop every staged change and snapshot
    pub fn clear(&mut self) -> anyhow::Result<()> {
        if !self.entries.is_empty() {
            self.changed = true;
        }
        self.entries.clear();

        if self.snapshots_path.exists() {
            std::fs::remove_dir_all(&self.snapshots_path).with_context(|| {
                format!(
                    "Unable to clear staging directory {}",
                    self.snapshots_path.display()
                )
            })?;
        }
        std::fs::create_dir_all(&self.snapshots_path)?;

        Ok(())
    }

    fn replace(&mut self, path: &Path, change: StagedChange) -> anyhow::Result<()> {
        let previous = self.entries.insert(path.to_path_buf(), change);
        self.changed = true;

        if let Some(previous) = previous {
            self.release_snapshot(previous.snapshot())?;
        }

        Ok(())
    }

    fn discard(&mut self, path: &Path) -> anyhow::Result<()> {
        if let Some(previous) = self.entries.remove(path) {
            self.changed = true;
            self.release_snapshot(previous.snapshot())?;
        }

        Ok(())
    }

    // Snapshots are shared between paths staged with identical content.
    fn release_snapshot(&self, oid: Option<&ObjectId>) -> anyhow::Result<()> {
        let Some(oid) = oid else {
            return Ok(());
        };

        let still_referenced = self
            .entries
            .values()
            .any(|change| change.snapshot() == Some(oid));
        let snapshot_path = self.snapshots_path.join(oid.as_ref());

        if !still_referenced && snapshot_path.exists() {
            std::fs::remove_file(&snapshot_path).with_context(|| {
                format!("Unable to remove snapshot {}", snapshot_path.display())
            })?;
        }

        Ok(())
    }

    fn write_snapshot(&self, oid: &ObjectId, content: &[u8]) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.snapshots_path)?;
        std::fs::write(self.snapshots_path.join(oid.as_ref()), content)
            .with_context(|| format!("Unable to write snapshot {oid}"))
    }

    fn read_snapshot(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        let content = std::fs::read(self.snapshots_path.join(oid.as_ref()))
            .with_context(|| format!("Missing staged snapshot {oid}"))?;
        Ok(Bytes::from(content))
    }
}
