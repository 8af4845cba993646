use crate::artifacts::errors::{RepositoryError, Result};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{GitObject, Stored, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::raw_record::RawRecord;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;

/// Turns raw records into typed objects according to their declared kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectBuilder;

impl ObjectBuilder {
    pub fn build_from(&self, raw: RawRecord) -> Result<GitObject> {
        let (header, payload) = raw.into_parts();
        let payload = payload.ok_or_else(|| RepositoryError::Decode {
            oid: header.oid.clone(),
            kind: header.kind,
            reason: "header-only record has no payload".to_string(),
        })?;
        let reader = payload.as_ref();

        let decoded = match header.kind {
            ObjectType::Blob => Blob::deserialize(reader)
                .map(|blob| GitObject::Blob(Stored::new(header.oid.clone(), blob))),
            ObjectType::Tree => Tree::deserialize(reader)
                .map(|tree| GitObject::Tree(Stored::new(header.oid.clone(), tree))),
            ObjectType::Commit => Commit::deserialize(reader)
                .map(|commit| GitObject::Commit(Stored::new(header.oid.clone(), commit))),
            ObjectType::Tag => Tag::deserialize(reader)
                .map(|tag| GitObject::Tag(Stored::new(header.oid.clone(), tag))),
        };

        decoded.map_err(|err| RepositoryError::Decode {
            oid: header.oid,
            kind: header.kind,
            reason: format!("{err:#}"),
        })
    }
}
