//! Plumbing commands (low-level Git operations)
//!
//! ## Commands
//!
//! - `init`: Create an empty repository
//! - `hash-object`: Compute object ID and optionally store in database
//! - `cat-file`: Inspect a stored object
//! - `rev-parse`: Turn an identifier into an object ID
//! - `tag`: List or create annotated tags

pub mod cat_file;
pub mod hash_object;
pub mod init;
pub mod rev_parse;
pub mod tag;
