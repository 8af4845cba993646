//! Command implementations behind the `bit-odb` binary
//!
//! Every command is a method on [`Repository`](crate::areas::repository::Repository)
//! that writes its output to the given writer, so the binary passes stdout
//! and tests pass a buffer.

pub mod plumbing;
