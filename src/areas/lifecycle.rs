//! Repository layout: creating, opening and owning the on-disk stores
//!
//! A repository with a working tree keeps its git directory in `<path>/.git`;
//! a bare repository is the git directory itself. Either way the git
//! directory holds `HEAD`, `objects/` and `refs/`.

use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::signature::Signature;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::refs::ref_name::RefName;
use crate::artifacts::refs::reference::ReferenceTarget;
use crate::artifacts::refs::{HEAD_REF_NAME, HEADS_PREFIX};
use anyhow::Context;
use std::path::{Path, PathBuf};

const DEFAULT_BRANCH: &str = "master";
const GIT_DIR: &str = ".git";

/// Where the pieces of a repository live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDetails {
    pub repository_directory: PathBuf,
    pub database_directory: PathBuf,
    pub index_path: Option<PathBuf>,
    pub working_directory: Option<PathBuf>,
    pub is_bare: bool,
}

impl RepositoryDetails {
    /// Explicit layout; bare when there is no working directory
    pub fn new(
        repository_directory: PathBuf,
        database_directory: PathBuf,
        index_path: Option<PathBuf>,
        working_directory: Option<PathBuf>,
    ) -> Self {
        RepositoryDetails {
            is_bare: working_directory.is_none(),
            repository_directory,
            database_directory,
            index_path,
            working_directory,
        }
    }

    fn standard(git_dir: PathBuf, working_directory: Option<PathBuf>) -> Self {
        let index_path = working_directory.as_ref().map(|_| git_dir.join("index"));

        RepositoryDetails::new(
            git_dir.clone(),
            git_dir.join("objects"),
            index_path,
            working_directory,
        )
    }

    /// Find the git directory for `path`, which may be a working tree, its
    /// `.git` directory, or a bare repository.
    pub fn discover(path: &Path) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("repository path {} does not exist", path.display()))?;

        let dot_git = path.join(GIT_DIR);
        if Self::looks_like_git_dir(&dot_git) {
            return Ok(Self::standard(dot_git, Some(path)));
        }

        if Self::looks_like_git_dir(&path) {
            let working_directory = match path.file_name() {
                Some(name) if name == GIT_DIR => path.parent().map(Path::to_path_buf),
                _ => None,
            };
            return Ok(Self::standard(path, working_directory));
        }

        anyhow::bail!("not a git repository: {}", path.display())
    }

    fn looks_like_git_dir(path: &Path) -> bool {
        path.join(HEAD_REF_NAME).is_file() && path.join("objects").is_dir() && path.join("refs").is_dir()
    }
}

/// Owns the object database and reference store of one repository
#[derive(Debug)]
pub struct Lifecycle {
    details: RepositoryDetails,
    database: Database,
    refs: Refs,
}

impl Lifecycle {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        Self::from_details(RepositoryDetails::discover(path)?)
    }

    pub fn from_details(details: RepositoryDetails) -> anyhow::Result<Self> {
        if !details.database_directory.is_dir() {
            anyhow::bail!(
                "object database {} does not exist",
                details.database_directory.display()
            );
        }
        if !details.repository_directory.is_dir() {
            anyhow::bail!(
                "repository directory {} does not exist",
                details.repository_directory.display()
            );
        }

        let database = Database::new(details.database_directory.clone().into_boxed_path());
        let refs = Refs::new(details.repository_directory.clone().into_boxed_path());
        tracing::debug!(
            git_dir = %details.repository_directory.display(),
            bare = details.is_bare,
            "opened repository"
        );

        Ok(Lifecycle {
            details,
            database,
            refs,
        })
    }

    /// Create the repository layout at `path` (or reinitialise it, keeping
    /// an existing HEAD) and open it.
    pub fn init(path: &Path, is_bare: bool) -> anyhow::Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
        let path = path.canonicalize()?;

        let details = if is_bare {
            RepositoryDetails::standard(path, None)
        } else {
            RepositoryDetails::standard(path.join(GIT_DIR), Some(path))
        };

        std::fs::create_dir_all(&details.database_directory)
            .context("Failed to create objects directory")?;

        let refs = Refs::new(details.repository_directory.clone().into_boxed_path());
        std::fs::create_dir_all(refs.heads_path()).context("Failed to create refs/heads directory")?;
        std::fs::create_dir_all(refs.tags_path()).context("Failed to create refs/tags directory")?;

        if !refs.head_path().exists() {
            refs.update(
                &RefName::try_parse(HEAD_REF_NAME.to_string())?,
                &ReferenceTarget::Symbolic(format!("{HEADS_PREFIX}{DEFAULT_BRANCH}")),
            )
            .context("Failed to create initial HEAD reference")?;
        }

        tracing::info!(
            git_dir = %details.repository_directory.display(),
            bare = is_bare,
            "initialized repository"
        );

        Self::from_details(details)
    }

    pub fn details(&self) -> &RepositoryDetails {
        &self.details
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Write an annotated tag object and bind `refs/tags/<tag_name>` to it.
    ///
    /// The tagger identity is consumed. The reference is created exclusively;
    /// if that fails the tag object stays behind unreferenced.
    pub fn create_tag(
        &self,
        tag_name: &str,
        target: &ObjectId,
        target_type: ObjectType,
        tagger: Signature,
        message: &str,
    ) -> anyhow::Result<ObjectId> {
        let ref_name = RefName::for_tag(tag_name)?;
        let tag = Tag::new(
            target.clone(),
            target_type,
            tag_name.to_string(),
            Some(tagger),
            message.to_string(),
        );

        let tag_oid = self
            .database
            .store(&tag)
            .with_context(|| format!("Unable to store tag object {tag_name}"))?;
        self.refs
            .create(&ref_name, &ReferenceTarget::Direct(tag_oid.clone()))
            .with_context(|| format!("Unable to create reference {ref_name}"))?;

        tracing::debug!(tag = tag_name, oid = %tag_oid, target = %target, "created tag");
        Ok(tag_oid)
    }
}
