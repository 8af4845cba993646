//! Reference store (HEAD, branches, tags)
//!
//! References are human-readable names pointing at objects. They can be:
//! - Direct: containing a 40-character object id
//! - Symbolic: pointing to another reference (e.g., HEAD -> refs/heads/master)
//!
//! ## File Format
//!
//! Each loose reference is a text file under the git directory containing
//! either an object id or `ref: <name>`. References that git has packed are
//! read from `packed-refs` (`<oid> <name>` per line) when no loose file exists.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::refs::reference::{Reference, ReferenceTarget};
use crate::artifacts::refs::ref_name::RefName;
use crate::artifacts::refs::{HEAD_REF_NAME, MAX_SYMREF_DEPTH};
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// File-backed reference store rooted at the git directory
#[derive(Debug, Clone, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    /// Read a reference without following symbolic indirection.
    ///
    /// Top-level files of the git directory that are not pseudo refs
    /// (`config`, `description`, ...) are not references and read as `None`.
    pub fn read(&self, name: &RefName) -> anyhow::Result<Option<Reference>> {
        if !name.is_storable() {
            return Ok(None);
        }

        let ref_path = self.path.join(name.as_ref_path());

        if ref_path.is_file() {
            let content = std::fs::read_to_string(&ref_path)
                .with_context(|| format!("failed to read ref file at {:?}", ref_path))?;

            // an unborn branch is an empty file
            if content.trim().is_empty() {
                return Ok(None);
            }

            let target = ReferenceTarget::parse(&content)
                .with_context(|| format!("corrupt ref file at {:?}", ref_path))?;
            return Ok(Some(Reference::new(name.to_string(), target)));
        }

        Ok(self
            .read_packed_refs()?
            .remove(name.as_ref())
            .map(|oid| Reference::new(name.to_string(), ReferenceTarget::Direct(oid))))
    }

    /// Read a reference and follow symbolic references until an object id.
    ///
    /// The returned reference keeps the requested name with a direct target.
    /// A chain ending in a missing (or unborn) reference yields `None`.
    pub fn resolve(&self, name: &RefName) -> anyhow::Result<Option<Reference>> {
        let mut current = name.clone();

        for _ in 0..=MAX_SYMREF_DEPTH {
            match self.read(&current)? {
                None => return Ok(None),
                Some(reference) => match reference.target() {
                    ReferenceTarget::Direct(oid) => {
                        return Ok(Some(Reference::new(
                            name.to_string(),
                            ReferenceTarget::Direct(oid.clone()),
                        )));
                    }
                    ReferenceTarget::Symbolic(next) => {
                        current = RefName::try_parse(next.clone())?;
                    }
                },
            }
        }

        anyhow::bail!("symbolic reference {} is nested too deeply", name)
    }

    /// Create a reference that must not exist yet.
    ///
    /// The ref file is opened with `O_CREAT | O_EXCL`, so two concurrent
    /// creations of the same name cannot both succeed.
    pub fn create(&self, name: &RefName, target: &ReferenceTarget) -> anyhow::Result<()> {
        if self.read(name)?.is_some() {
            anyhow::bail!("reference {} already exists", name);
        }

        let ref_path = self.path.join(name.as_ref_path());
        std::fs::create_dir_all(ref_path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {:?}", ref_path)
        })?)?;

        let mut ref_file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&ref_path)
        {
            Ok(ref_file) => ref_file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                anyhow::bail!("reference {} already exists", name)
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to open ref file at {:?}", ref_path));
            }
        };

        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut()
            .write_all(format!("{}\n", target.to_raw()).as_bytes())?;

        tracing::debug!(reference = %name, target = %target, "created reference");
        Ok(())
    }

    /// Create or overwrite a reference.
    pub fn update(&self, name: &RefName, target: &ReferenceTarget) -> anyhow::Result<()> {
        let ref_path = self.path.join(name.as_ref_path());
        std::fs::create_dir_all(ref_path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {:?}", ref_path)
        })?)?;

        // open the ref file as WRONLY and CREAT to write the target to it
        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&ref_path)
            .with_context(|| format!("failed to open ref file at {:?}", ref_path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut()
            .write_all(format!("{}\n", target.to_raw()).as_bytes())?;

        tracing::debug!(reference = %name, target = %target, "updated reference");
        Ok(())
    }

    /// List loose and packed references whose name starts with `prefix`,
    /// sorted by name. A loose reference shadows a packed one.
    pub fn list(&self, prefix: &str) -> anyhow::Result<Vec<Reference>> {
        let mut references = self
            .read_packed_refs()?
            .into_iter()
            .map(|(name, oid)| (name.clone(), Reference::new(name, ReferenceTarget::Direct(oid))))
            .collect::<BTreeMap<_, _>>();

        let loose_names = WalkDir::new(self.refs_path())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                Some(relative_path.to_string_lossy().replace('\\', "/"))
            })
            .chain(std::iter::once(HEAD_REF_NAME.to_string()));

        for name in loose_names {
            let Ok(ref_name) = RefName::try_parse(name) else {
                continue;
            };
            if let Some(reference) = self.read(&ref_name)? {
                references.insert(ref_name.to_string(), reference);
            }
        }

        Ok(references
            .into_values()
            .filter(|reference| reference.name().starts_with(prefix))
            .collect())
    }

    fn read_packed_refs(&self) -> anyhow::Result<BTreeMap<String, ObjectId>> {
        let packed_path = self.path.join("packed-refs");

        let content = match std::fs::read_to_string(&packed_path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {:?}", packed_path));
            }
        };

        content
            .lines()
            // comments and peeled lines ("^<oid>") carry no names
            .filter(|line| !line.starts_with('#') && !line.starts_with('^') && !line.is_empty())
            .map(|line| -> anyhow::Result<(String, ObjectId)> {
                let (oid, name) = line
                    .split_once(' ')
                    .with_context(|| format!("corrupt packed-refs line: {line}"))?;
                Ok((name.to_string(), ObjectId::try_parse(oid.to_string())?))
            })
            .collect()
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

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }
}
