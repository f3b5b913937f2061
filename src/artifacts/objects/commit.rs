//! Commit object
//!
//! A commit records a complete snapshot of tracked files together with its
//! message, timestamp and parent commits.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! timestamp <unix-seconds> <timezone>
//! parent <parent-sha>          (zero, one or two lines)
//! file <blob-sha> <path>\0     (one line per tracked file)
//!
//! <commit message>
//! ```
//!
//! Paths are NUL-terminated rather than newline-terminated, so any valid
//! file name (newlines included) survives a round trip. Paths must be UTF-8.
//!
//! The object ID is not the hash of this record: it is computed over a
//! canonical form with sorted parents, so a merge commit gets the same ID
//! whichever side is recorded first.

use crate::artifacts::objects::object::{
    Object, Packable, Unpackable, digest_to_object_id, frame,
};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::PathBuf;

/// Snapshot of every tracked file, keyed by repository-relative path
pub type FileTree = BTreeMap<PathBuf, ObjectId>;

const LOG_DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Parent references of a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parents {
    /// The initial commit of a repository
    Root,
    Single(ObjectId),
    /// A merge commit: current branch head first, merged-in head second
    Merge(ObjectId, ObjectId),
}

impl Parents {
    pub fn first(&self) -> Option<&ObjectId> {
        match self {
            Parents::Root => None,
            Parents::Single(parent) | Parents::Merge(parent, _) => Some(parent),
        }
    }

    pub fn is_merge(&self) -> bool {
        matches!(self, Parents::Merge(..))
    }

    /// Parents in recorded order, first parent first
    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        let (first, second) = match self {
            Parents::Root => (None, None),
            Parents::Single(parent) => (Some(parent), None),
            Parents::Merge(first, second) => (Some(first), Some(second)),
        };
        first.into_iter().chain(second)
    }

    fn from_vec(mut parents: Vec<ObjectId>) -> anyhow::Result<Self> {
        match parents.len() {
            0 => Ok(Parents::Root),
            1 => Ok(Parents::Single(parents.remove(0))),
            2 => {
                let second = parents.remove(1);
                Ok(Parents::Merge(parents.remove(0), second))
            }
            n => Err(anyhow::anyhow!("Invalid commit object: {n} parents")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    message: String,
    timestamp: DateTime<FixedOffset>,
    parents: Parents,
    tree: FileTree,
}

impl Commit {
    pub fn new(
        message: String,
        timestamp: DateTime<FixedOffset>,
        parents: Parents,
        tree: FileTree,
    ) -> Self {
        Commit {
            message,
            timestamp,
            parents,
            tree,
        }
    }

    /// The commit every repository starts from: empty tree, epoch timestamp
    pub fn initial() -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH.fixed_offset();
        Commit::new(
            "initial commit".to_string(),
            epoch,
            Parents::Root,
            FileTree::new(),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn parents(&self) -> &Parents {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn into_tree(self) -> FileTree {
        self.tree
    }

    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(LOG_DATE_FORMAT).to_string()
    }

    fn body(&self) -> anyhow::Result<Vec<u8>> {
        let mut body = format!(
            "timestamp {} {}\n",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
        .into_bytes();
        for parent in self.parents.iter() {
            body.extend_from_slice(format!("parent {parent}\n").as_bytes());
        }
        for (path, oid) in &self.tree {
            let path = path
                .to_str()
                .with_context(|| format!("Path {} is not valid UTF-8", path.display()))?;
            if path.contains('\0') {
                anyhow::bail!("Path {path:?} contains a NUL byte");
            }
            body.extend_from_slice(format!("file {oid} {path}\0\n").as_bytes());
        }
        body.push(b'\n');
        body.extend_from_slice(self.message.as_bytes());

        Ok(body)
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(frame(self.object_type(), &self.body()?))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        let mut rest = content.as_slice();

        let timestamp = take_field(&mut rest, b'\n')?
            .strip_prefix("timestamp ")
            .context("Invalid commit object: missing timestamp line")?;
        let timestamp = parse_timestamp(timestamp)?;

        let mut parents = Vec::new();
        let mut tree = FileTree::new();
        loop {
            if let Some(message) = rest.strip_prefix(b"\n") {
                rest = message;
                break;
            } else if let Some(header) = rest.strip_prefix(b"parent ") {
                rest = header;
                let parent = take_field(&mut rest, b'\n')?;
                parents.push(ObjectId::try_parse(parent.to_string())?);
            } else if let Some(header) = rest.strip_prefix(b"file ") {
                rest = header;
                let oid = ObjectId::try_parse(take_field(&mut rest, b' ')?.to_string())?;
                let path = take_field(&mut rest, b'\0')?;
                rest = rest
                    .strip_prefix(b"\n")
                    .context("Invalid commit object: unterminated file line")?;
                tree.insert(PathBuf::from(path), oid);
            } else {
                anyhow::bail!("Invalid commit object: unexpected header");
            }
        }

        let message = String::from_utf8(rest.to_vec())
            .context("Invalid commit object: message is not UTF-8")?;

        Ok(Commit::new(
            message,
            timestamp,
            Parents::from_vec(parents)?,
            tree,
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn object_id(&self) -> anyhow::Result<ObjectId> {
        let mut parents = self.parents.iter().collect::<Vec<_>>();
        parents.sort();

        let mut hasher = Sha1::new();
        hasher.update(format!("{} {}\0", self.object_type(), self.message.len()));
        hasher.update(self.message.as_bytes());
        hasher.update(format!(
            "\0{} {}\0",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for parent in parents {
            hasher.update(parent.as_ref());
            hasher.update(b"\0");
        }
        for (path, oid) in &self.tree {
            hasher.update(path.as_os_str().as_encoded_bytes());
            hasher.update(b"\0");
            hasher.update(oid.as_ref());
            hasher.update(b"\0");
        }

        digest_to_object_id(hasher)
    }
}

/// Split off everything up to `delimiter`, consuming the delimiter too
fn take_field<'c>(rest: &mut &'c [u8], delimiter: u8) -> anyhow::Result<&'c str> {
    let end = rest
        .iter()
        .position(|&byte| byte == delimiter)
        .context("Invalid commit object: truncated header")?;
    let field = std::str::from_utf8(&rest[..end])
        .context("Invalid commit object: header is not UTF-8")?;
    *rest = &rest[end + 1..];

    Ok(field)
}

fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, timezone) = value
        .split_once(' ')
        .context("Invalid commit object: invalid timestamp line")?;
    let seconds = seconds
        .parse::<i64>()
        .context("Invalid commit object: invalid timestamp")?;

    let offset = *DateTime::parse_from_str(
        &format!("1970-01-01 00:00:00 {timezone}"),
        "%Y-%m-%d %H:%M:%S %z",
    )
    .context("Invalid commit object: invalid timezone")?
    .offset();

    let utc = Utc
        .timestamp_opt(seconds, 0)
        .single()
        .context("Invalid commit object: timestamp out of range")?;
    Ok(utc.with_timezone(&offset))
}
