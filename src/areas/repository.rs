//! The repository facade
//!
//! [`Repository`] is the single entry point for callers. It resolves
//! identifiers (object ids or reference names) into decoded objects, exposes
//! raw reads of the object database and creates annotated tags.
//!
//! Everything returned owns its bytes; nothing borrows from the repository,
//! so results stay usable after the repository is dropped.

use crate::areas::database::Database;
use crate::areas::lifecycle::{Lifecycle, RepositoryDetails};
use crate::artifacts::errors::{RepositoryError, Result};
use crate::artifacts::objects::builder::ObjectBuilder;
use crate::artifacts::objects::object::{GitObject, Stored};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::raw_record::{Header, RawRecord};
use crate::artifacts::objects::resolver::ObjectResolver;
use crate::artifacts::objects::signature::Signature;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::refs::ref_name::RefName;
use crate::artifacts::refs::reference_manager::ReferenceManager;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Repository {
    lifecycle: Lifecycle,
    builder: ObjectBuilder,
    resolver: ObjectResolver,
    references: ReferenceManager,
}

impl Repository {
    /// Open the repository at `path` (a working tree, its `.git`, or a bare repository).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_lifecycle(Lifecycle::open(path.as_ref())?))
    }

    /// Open a repository whose directories are given explicitly.
    pub fn from_details(details: RepositoryDetails) -> Result<Self> {
        Ok(Self::from_lifecycle(Lifecycle::from_details(details)?))
    }

    /// Create a repository at `path` and return its git directory.
    pub fn init(path: impl AsRef<Path>, is_bare: bool) -> Result<PathBuf> {
        let lifecycle = Lifecycle::init(path.as_ref(), is_bare)?;

        Ok(lifecycle.details().repository_directory.clone())
    }

    fn from_lifecycle(lifecycle: Lifecycle) -> Self {
        let builder = ObjectBuilder;
        let resolver = ObjectResolver::new(lifecycle.database().clone(), builder);
        let references = ReferenceManager::new(lifecycle.refs().clone());

        Repository {
            lifecycle,
            builder,
            resolver,
            references,
        }
    }

    pub fn details(&self) -> &RepositoryDetails {
        self.lifecycle.details()
    }

    pub fn refs(&self) -> &ReferenceManager {
        &self.references
    }

    pub fn database(&self) -> &Database {
        self.lifecycle.database()
    }

    /// Resolve an object id or a reference name into a decoded object.
    ///
    /// An object id that is not stored is an error; a name that no reference
    /// answers to (including names that cannot be reference names) is `None`.
    /// With `expected` set, an object of another kind is an
    /// [`RepositoryError::UnexpectedType`].
    pub fn resolve(
        &self,
        identifier: &str,
        expected: Option<ObjectType>,
    ) -> Result<Option<GitObject>> {
        if ObjectId::is_valid(identifier) {
            tracing::debug!(identifier, "resolving as object id");
            let oid = Self::parse_address(identifier)?;

            return self.resolver.resolve(&oid, expected).map(Some);
        }

        let Some(reference) = self.references.dwim(identifier)? else {
            tracing::debug!(identifier, "no reference matches");
            return Ok(None);
        };
        tracing::debug!(identifier, reference = reference.name(), "resolving through reference");

        let oid = reference
            .target()
            .oid()
            .ok_or_else(|| RepositoryError::not_found(reference.name()))?;

        self.resolver.resolve(oid, expected).map(Some)
    }

    /// Create an annotated tag named `tag_name` pointing at the object `target_id`.
    ///
    /// Fails with [`RepositoryError::InvalidReferenceName`] when the name is
    /// malformed or `refs/tags/<tag_name>` already exists, and with
    /// [`RepositoryError::ObjectNotFound`] when the target is not stored;
    /// a tagger whose name or email would corrupt the identity line is a
    /// [`RepositoryError::InvalidSignature`]. None of these cases writes anything. Concurrent tag creation under the same
    /// name must be serialized by the caller to get these errors reliably.
    pub fn apply_tag(
        &self,
        target_id: &str,
        tag_name: &str,
        message: &str,
        signature: &Signature,
    ) -> Result<Stored<Tag>> {
        let _span = tracing::debug_span!("apply_tag", tag = tag_name, target = target_id).entered();

        let ref_name =
            RefName::for_tag(tag_name).map_err(|err| RepositoryError::InvalidReferenceName {
                name: tag_name.to_string(),
                reason: format!("{err:#}"),
            })?;

        signature
            .validate()
            .map_err(|err| RepositoryError::InvalidSignature {
                reason: format!("{err:#}"),
            })?;

        if let Some(existing) = self.references.lookup(ref_name.as_ref())? {
            return Err(RepositoryError::InvalidReferenceName {
                name: ref_name.to_string(),
                reason: format!("already exists and points to {}", existing.target()),
            });
        }

        let target_oid = Self::parse_address(target_id)?;
        let target = self
            .lifecycle
            .database()
            .lookup(&target_oid, None)?
            .ok_or_else(|| RepositoryError::not_found(&target_oid))?;

        let tag_oid = self.lifecycle.create_tag(
            tag_name,
            &target_oid,
            target.kind,
            signature.clone(),
            message,
        )?;

        let raw = self
            .lifecycle
            .database()
            .read(&tag_oid)?
            .ok_or_else(|| RepositoryError::not_found(&tag_oid))?;

        match self.builder.build_from(raw)? {
            GitObject::Tag(tag) => Ok(tag),
            other => Err(RepositoryError::UnexpectedType {
                oid: tag_oid,
                expected: ObjectType::Tag,
                actual: other.object_type(),
            }),
        }
    }

    pub fn read_header(&self, address: &str) -> Result<Header> {
        let oid = Self::parse_address(address)?;

        self.lifecycle
            .database()
            .read_header(&oid)?
            .ok_or_else(|| RepositoryError::not_found(&oid))
    }

    /// Read an object without decoding it; the payload is always present.
    pub fn read(&self, address: &str) -> Result<RawRecord> {
        let oid = Self::parse_address(address)?;

        self.lifecycle
            .database()
            .read(&oid)?
            .ok_or_else(|| RepositoryError::not_found(&oid))
    }

    pub fn exists(&self, address: &str) -> Result<bool> {
        let oid = Self::parse_address(address)?;

        Ok(self.lifecycle.database().exists(&oid))
    }

    fn parse_address(address: &str) -> Result<ObjectId> {
        ObjectId::try_parse(address.to_string()).map_err(|_| RepositoryError::malformed(address))
    }
}
