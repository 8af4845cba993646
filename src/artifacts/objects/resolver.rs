use crate::areas::database::Database;
use crate::artifacts::errors::{RepositoryError, Result};
use crate::artifacts::objects::builder::ObjectBuilder;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;

/// Reads an object by id and decodes it, optionally enforcing its kind.
///
/// Nothing is cached: every call re-reads and re-decodes from the database.
#[derive(Debug, Clone)]
pub struct ObjectResolver {
    database: Database,
    builder: ObjectBuilder,
}

impl ObjectResolver {
    pub fn new(database: Database, builder: ObjectBuilder) -> Self {
        ObjectResolver { database, builder }
    }

    pub fn resolve(&self, oid: &ObjectId, expected: Option<ObjectType>) -> Result<GitObject> {
        let raw = self
            .database
            .read(oid)?
            .ok_or_else(|| RepositoryError::not_found(oid))?;

        let object = self.builder.build_from(raw)?;

        match expected {
            Some(expected) if expected != object.object_type() => {
                Err(RepositoryError::UnexpectedType {
                    oid: oid.clone(),
                    expected,
                    actual: object.object_type(),
                })
            }
            _ => Ok(object),
        }
    }
}
