use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::TwigError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Content-addressed store of blobs and commits under `.twig/objects`
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Persist an object unless a record with the same ID is already present
    ///
    /// The record is written to a temporary file first and renamed into place,
    /// so a reader never observes a partial object.
    ///
    /// # Arguments
    ///
    /// * `object` - Blob or commit to store
    ///
    /// # Returns
    ///
    /// The object ID, whether or not the record was written by this call
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            tracing::trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, object.serialize()?)?;
        tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    /// Store raw file content as a blob
    pub fn put(&self, content: Bytes) -> anyhow::Result<ObjectId> {
        self.store(&Blob::new(content))
    }

    /// Content of a stored blob
    ///
    /// # Returns
    ///
    /// The raw bytes, `ObjectNotFound` if no record exists, or an error if the
    /// record is not a blob
    pub fn get(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(Blob::deserialize(object_reader)?.into_content()),
            other => Err(anyhow::anyhow!("object {object_id} is a {other}, not a blob")),
        }
    }

    /// Read and parse a stored commit
    ///
    /// # Arguments
    ///
    /// * `object_id` - Full ID of the commit record
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Commit::deserialize(object_reader),
            other => Err(anyhow::anyhow!("object {object_id} is a {other}, not a commit")),
        }
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    /// Find all objects whose ID starts with the given prefix
    ///
    /// For prefixes of 2+ characters only the matching fan-out directory is
    /// searched. Shorter prefixes scan the whole store.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }

        let mut matches = if prefix.len() >= 2 {
            let dir_path = self.path.join(&prefix[..2]);
            Self::objects_in(&dir_path)?
        } else {
            self.all_objects()?
        };
        matches.retain(|oid| oid.starts_with(&prefix));
        matches.sort();

        Ok(matches)
    }

    /// Resolve a full or abbreviated commit ID
    ///
    /// Only commit records are considered. An empty, unknown or ambiguous
    /// prefix yields `NoSuchCommit`.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Leading hex characters of the commit ID, case-insensitive
    ///
    /// # Returns
    ///
    /// The full ID of the single matching commit
    pub fn resolve_commit(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let no_such_commit = || TwigError::NoSuchCommit(prefix.to_string());
        if prefix.is_empty() {
            return Err(no_such_commit().into());
        }

        let mut candidates = Vec::new();
        for oid in self.find_objects_by_prefix(prefix)? {
            if self.object_type(&oid)? == ObjectType::Commit {
                candidates.push(oid);
            }
        }

        match candidates.len() {
            1 => Ok(candidates.remove(0)),
            0 => Err(no_such_commit().into()),
            n => {
                tracing::debug!(prefix, candidates = n, "ambiguous commit prefix");
                Err(no_such_commit().into())
            }
        }
    }

    /// Every stored commit, in no particular order
    pub fn list_commits(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut commits = Vec::new();
        for oid in self.all_objects()? {
            let (object_type, object_reader) = self.parse_object_as_bytes(&oid)?;
            if object_type == ObjectType::Commit {
                commits.push((oid, Commit::deserialize(object_reader)?));
            }
        }

        Ok(commits)
    }

    fn all_objects(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut objects = Vec::new();
        if !self.path.exists() {
            return Ok(objects);
        }

        for entry in WalkDir::new(&self.path).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_dir() {
                objects.extend(Self::objects_in(entry.path())?);
            }
        }

        Ok(objects)
    }

    fn objects_in(dir_path: &Path) -> anyhow::Result<Vec<ObjectId>> {
        let mut objects = Vec::new();
        if !dir_path.is_dir() {
            return Ok(objects);
        }

        let dir_name = dir_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        for entry in WalkDir::new(dir_path).min_depth(1).max_depth(1) {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy();
            // temp files from interrupted writes fail to parse and are skipped
            if let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                objects.push(oid);
            }
        }

        Ok(objects)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, Cursor<Vec<u8>>)> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.is_file() {
            return Err(TwigError::ObjectNotFound(object_id.clone()).into());
        }

        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)
            .context(format!("Corrupt object record {object_id}"))?;

        Ok((object_type, object_reader))
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
