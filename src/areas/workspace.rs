use crate::METADATA_DIR;
use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [METADATA_DIR, ".", ".."];

/// The working directory, addressed by paths relative to its root
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every regular file below the root, sorted, excluding the metadata directory
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !Self::is_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(PathBuf::from)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .map(|name| IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()))
            .unwrap_or_default()
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);
        if !full_path.is_file() {
            return Err(TwigError::FileNotFound(file_path.to_path_buf()).into());
        }

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Bytes::from(content))
    }

    /// Blob ID the file would get if it were stored, `None` if it does not exist
    pub fn hash_file(&self, file_path: &Path) -> anyhow::Result<Option<ObjectId>> {
        if !self.exists(file_path) {
            return Ok(None);
        }

        let blob = Blob::new(self.read_file(file_path)?);
        Ok(Some(blob.object_id()?))
    }

    /// Write a file, creating parent directories and replacing whatever is in the way
    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if let Some(parent) = file_path.parent() {
            self.make_directory(parent)?;
        }
        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove existing directory: {:?}", file_path))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a file and any parent directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }
        self.prune_empty_parent_dirs(file_path)
    }

    fn prune_empty_parent_dirs(&self, file_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            let dir_path = self.path.join(parent);
            if dir_path.is_dir() && dir_path.read_dir()?.next().is_none() {
                std::fs::remove_dir(&dir_path).with_context(|| {
                    format!("Failed to remove empty directory: {:?}", parent)
                })?;
                self.prune_empty_parent_dirs(parent)?;
            }
        }

        Ok(())
    }

    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        // a regular file standing where a directory is needed gets replaced
        for ancestor in dir_path.ancestors().collect::<Vec<_>>().into_iter().rev() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }

            let full_path = self.path.join(ancestor);
            if full_path.is_file() {
                std::fs::remove_file(&full_path)
                    .with_context(|| format!("Failed to remove file: {:?}", ancestor))?;
            }
        }

        std::fs::create_dir_all(self.path.join(dir_path))
            .with_context(|| format!("Failed to create directory: {:?}", dir_path))?;

        Ok(())
    }

    // Deletions go first so that a deleted file never shadows a directory
    // another action needs to create.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for action in [ActionType::Delete, ActionType::Modify, ActionType::Add] {
            for (file_path, oid) in migration.actions_of(&action) {
                match (&action, oid) {
                    (ActionType::Delete, None) => self.remove_file(file_path)?,
                    (ActionType::Add | ActionType::Modify, Some(oid)) => {
                        let data = migration.load_blob_data(oid)?;
                        self.write_file(file_path, &data)?;
                    }
                    _ => anyhow::bail!("Invalid action and entry combination"),
                }
            }
        }

        Ok(())
    }
}
