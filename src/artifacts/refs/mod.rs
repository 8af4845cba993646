//! References: names pointing at objects or at other references
//!
//! - `ref_name`: reference name validation
//! - `reference`: the `Reference` value type
//! - `reference_manager`: typed lookups over the reference store

use regex::Regex;
use std::sync::LazyLock;

pub mod ref_name;
pub mod reference;
pub mod reference_manager;

pub const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.$|\.lock$|\.lock\/|\/\/|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
pub const SYMREF_REGEX: &str = r"^ref: (.+)$";
/// Names outside `refs/` that may be references (`HEAD`, `ORIG_HEAD`, ...)
pub const PSEUDO_REF_REGEX: &str = r"^[A-Z][A-Z0-9_]*$";

#[allow(clippy::expect_used)] // constant pattern
pub static INVALID_REF_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(INVALID_REF_NAME_REGEX).expect("ref name pattern compiles"));
#[allow(clippy::expect_used)] // constant pattern
pub static SYMREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SYMREF_REGEX).expect("symref pattern compiles"));
#[allow(clippy::expect_used)] // constant pattern
pub static PSEUDO_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PSEUDO_REF_REGEX).expect("pseudo ref pattern compiles"));

pub const REFS_PREFIX: &str = "refs/";
pub const HEAD_REF_NAME: &str = "HEAD";
pub const TAGS_PREFIX: &str = "refs/tags/";
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Symbolic references deeper than this are treated as broken.
pub const MAX_SYMREF_DEPTH: usize = 5;

pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};

/// Expansion rules for short names, tried in order (`%s` is the short name).
pub const DWIM_RULES: [&str; 6] = [
    "%s",
    "refs/%s",
    "refs/tags/%s",
    "refs/heads/%s",
    "refs/remotes/%s",
    "refs/remotes/%s/HEAD",
];
