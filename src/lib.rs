//! A git object store facade
//!
//! Opens a repository on disk, resolves object ids and reference names into
//! typed objects, gives raw access to stored records and creates annotated
//! tags.

pub mod areas;
pub mod artifacts;
pub mod commands;
