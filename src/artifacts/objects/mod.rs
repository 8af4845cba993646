//! Git object types and operations
//!
//! Git stores all content as objects identified by SHA-1 hashes. There are four types:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Directory listing (names, modes, and object IDs)
//! - **Commit**: Snapshot with metadata (author, message, parent commits, tree)
//! - **Tag**: Annotated, named pointer to another object
//!
//! Objects are stored as `<type> <size>\0<content>`. [`raw_record`] carries
//! that undecoded form, [`builder`] decodes it and [`resolver`] ties reading
//! and decoding together.

pub mod blob;
pub mod builder;
pub mod commit;
pub mod entry_mode;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod raw_record;
pub mod resolver;
pub mod signature;
pub mod tag;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
