use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use std::io::{BufRead, Write};
use std::ops::Deref;

/// Encode the object body (everything after the `<type> <size>\0` header).
pub trait Packable {
    fn pack_payload(&self) -> Result<Bytes>;
}

/// Decode the object body; the header has already been consumed.
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    /// Full loose-object encoding: `<type> <size>\0<payload>`
    fn serialize(&self) -> Result<Bytes> {
        let payload = self.pack_payload()?;

        let mut object_bytes = Vec::with_capacity(payload.len() + 32);
        write!(object_bytes, "{} {}\0", self.object_type(), payload.len())?;
        object_bytes.write_all(&payload)?;

        Ok(Bytes::from(object_bytes))
    }
}

/// A decoded object together with the address it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored<T> {
    oid: ObjectId,
    object: T,
}

impl<T> Stored<T> {
    pub fn new(oid: ObjectId, object: T) -> Self {
        Stored { oid, object }
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }
}

impl<T> Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.object
    }
}

/// Every kind of object the database can hold, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitObject {
    Blob(Stored<Blob>),
    Tree(Stored<Tree>),
    Commit(Stored<Commit>),
    Tag(Stored<Tag>),
}

impl GitObject {
    pub fn oid(&self) -> &ObjectId {
        match self {
            GitObject::Blob(blob) => blob.oid(),
            GitObject::Tree(tree) => tree.oid(),
            GitObject::Commit(commit) => commit.oid(),
            GitObject::Tag(tag) => tag.oid(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            GitObject::Blob(_) => ObjectType::Blob,
            GitObject::Tree(_) => ObjectType::Tree,
            GitObject::Commit(_) => ObjectType::Commit,
            GitObject::Tag(_) => ObjectType::Tag,
        }
    }

    pub fn display(&self) -> String {
        match self {
            GitObject::Blob(blob) => blob.display(),
            GitObject::Tree(tree) => tree.display(),
            GitObject::Commit(commit) => commit.display(),
            GitObject::Tag(tag) => tag.display(),
        }
    }

    pub fn as_blob(&self) -> Option<&Stored<Blob>> {
        match self {
            GitObject::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Stored<Tree>> {
        match self {
            GitObject::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_commit(&self) -> Option<&Stored<Commit>> {
        match self {
            GitObject::Commit(commit) => Some(commit),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&Stored<Tag>> {
        match self {
            GitObject::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn into_tag(self) -> Option<Stored<Tag>> {
        match self {
            GitObject::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}
