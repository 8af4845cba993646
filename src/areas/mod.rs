//! Core repository components
//!
//! - `database`: loose object storage (zlib-compressed, content addressed)
//! - `refs`: file-backed reference store (HEAD, branches, tags, packed-refs)
//! - `lifecycle`: repository layout, creation and ownership of the stores
//! - `repository`: the facade callers go through

pub mod database;
pub mod lifecycle;
pub mod refs;
pub mod repository;
