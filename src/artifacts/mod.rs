//! Git data structures
//!
//! - `errors`: the error taxonomy of the facade
//! - `objects`: object ids, kinds, codecs and the resolver
//! - `refs`: reference names, targets and typed lookups

pub mod errors;
pub mod objects;
pub mod refs;
