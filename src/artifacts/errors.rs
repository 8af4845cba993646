//! Error types surfaced by the repository facade.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use thiserror::Error;

/// Failures callers can tell apart programmatically.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The identifier is not a 40-character hexadecimal object id.
    #[error("malformed object id: {identifier}")]
    MalformedIdentifier { identifier: String },

    /// No object or reference is stored under this identifier.
    #[error("object not found: {identifier}")]
    ObjectNotFound { identifier: String },

    /// The object exists but is of a different kind than requested.
    #[error("object {oid} is a {actual}, not a {expected}")]
    UnexpectedType {
        oid: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    /// The payload of a stored object does not follow its kind's encoding.
    #[error("unable to decode {kind} {oid}: {reason}")]
    Decode {
        oid: ObjectId,
        kind: ObjectType,
        reason: String,
    },

    /// The reference name is unusable, either malformed or already taken.
    #[error("invalid reference name {name}: {reason}")]
    InvalidReferenceName { name: String, reason: String },

    /// The tagger identity cannot be written into an identity line.
    #[error("invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// I/O or storage failure inside the object database or reference store.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn not_found(identifier: impl ToString) -> Self {
        RepositoryError::ObjectNotFound {
            identifier: identifier.to_string(),
        }
    }

    pub fn malformed(identifier: impl ToString) -> Self {
        RepositoryError::MalformedIdentifier {
            identifier: identifier.to_string(),
        }
    }
}

/// Convenience type alias for facade operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
