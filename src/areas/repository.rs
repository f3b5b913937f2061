use crate::METADATA_DIR;
use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::areas::staging::StagingArea;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::repository_state::RepositoryState;
use crate::artifacts::core::config::Config;
use crate::errors::TwigError;
use std::cell::{RefCell, RefMut};
use std::path::{Component, Path, PathBuf};

/// A repository rooted at a working directory
///
/// The branch state and the stage are not cached here: every command loads
/// them, threads them through the operation and saves them once at the end.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    config: Config,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(
        path: &str,
        writer: Box<dyn std::io::Write>,
        config: Config,
    ) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let metadata_path = path.join(METADATA_DIR);

        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            config,
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(TwigError::NotARepository.into());
        }

        Ok(())
    }

    /// A fresh, not yet loaded, staging area
    pub fn staging(&self) -> StagingArea {
        let metadata_path = self.metadata_path();

        StagingArea::new(
            metadata_path.join("stage").into_boxed_path(),
            metadata_path.join("staging").into_boxed_path(),
        )
    }

    /// Load the branch state and the stage of an initialized repository
    pub fn load(&self) -> anyhow::Result<(RepositoryState, StagingArea)> {
        self.ensure_initialized()?;

        let state = self.refs.load_state(&self.database)?;
        let mut staging = self.staging();
        staging.rehydrate()?;

        Ok((state, staging))
    }

    /// Persist whatever the operation changed
    pub fn save(&self, state: &RepositoryState, staging: &mut StagingArea) -> anyhow::Result<()> {
        self.refs.save_state(state)?;
        staging.write_updates()
    }

    /// Turn a user-supplied path into one relative to the repository root
    pub fn relative_path(&self, path: &str) -> anyhow::Result<PathBuf> {
        let path = Path::new(path);
        let path = if path.is_absolute() {
            path.strip_prefix(&self.path).map_err(|_| {
                TwigError::Usage(format!("{} is outside the repository", path.display()))
            })?
        } else {
            path
        };

        let mut relative = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => relative.push(part),
                _ => {
                    return Err(TwigError::Usage(format!(
                        "{} is not a path inside the repository",
                        path.display()
                    ))
                    .into());
                }
            }
        }

        if relative.as_os_str().is_empty() {
            return Err(TwigError::Usage("expected a file path".to_string()).into());
        }

        Ok(relative)
    }
}
