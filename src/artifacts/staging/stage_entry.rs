use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::OBJECT_ID_BYTES;
use anyhow::{Context, anyhow};
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Bytes preceding the path: kind, object ID and path length
pub const ENTRY_FIXED_SIZE: usize = 1 + OBJECT_ID_BYTES + 2;

/// Pending change of one path relative to the head commit
///
/// A path holds at most one change, so the added, modified and removed sets
/// of the stage are disjoint by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedChange {
    /// Path untracked at head, staged with this snapshot
    Added(ObjectId),
    /// Path tracked at head, staged with different content
    Modified(ObjectId),
    /// Path tracked at head, scheduled for untracking
    Removed,
}

impl StagedChange {
    pub fn snapshot(&self) -> Option<&ObjectId> {
        match self {
            StagedChange::Added(oid) | StagedChange::Modified(oid) => Some(oid),
            StagedChange::Removed => None,
        }
    }

    fn kind(&self) -> u8 {
        match self {
            StagedChange::Added(_) => 0,
            StagedChange::Modified(_) => 1,
            StagedChange::Removed => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEntry {
    pub path: PathBuf,
    pub change: StagedChange,
}

impl StageEntry {
    pub fn new(path: PathBuf, change: StagedChange) -> Self {
        StageEntry { path, change }
    }

    /// Length of the path suffix announced by the fixed-size prefix
    pub fn path_length(prefix: &[u8]) -> anyhow::Result<usize> {
        let mut length = prefix
            .get(ENTRY_FIXED_SIZE - 2..ENTRY_FIXED_SIZE)
            .context("Truncated stage entry")?;
        Ok(length.read_u16::<NetworkEndian>()? as usize)
    }
}

impl Packable for StageEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let path = self
            .path
            .to_str()
            .with_context(|| format!("Non UTF-8 path cannot be staged: {:?}", self.path))?;
        let path_length = u16::try_from(path.len())
            .with_context(|| format!("Path too long to stage: {path}"))?;

        let mut bytes = Vec::with_capacity(ENTRY_FIXED_SIZE + path.len());
        bytes.write_u8(self.change.kind())?;
        match self.change.snapshot() {
            Some(oid) => oid.write_h40_to(&mut bytes)?,
            None => bytes.write_all(&[0u8; OBJECT_ID_BYTES])?,
        }
        bytes.write_u16::<NetworkEndian>(path_length)?;
        bytes.write_all(path.as_bytes())?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for StageEntry {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let kind = reader.read_u8()?;
        let oid = ObjectId::read_h40_from(&mut reader)?;
        let path_length = reader.read_u16::<NetworkEndian>()? as usize;

        let mut path = vec![0u8; path_length];
        reader.read_exact(&mut path)?;
        let path = PathBuf::from(String::from_utf8(path)?);

        let change = match kind {
            0 => StagedChange::Added(oid),
            1 => StagedChange::Modified(oid),
            2 => StagedChange::Removed,
            other => return Err(anyhow!("Unknown stage entry kind {other}")),
        };

        Ok(StageEntry::new(path, change))
    }
}
