use crate::artifacts::refs::{INVALID_REF_NAME, PSEUDO_REF, REFS_PREFIX, TAGS_PREFIX};
use anyhow::Context;

/// A syntactically valid reference name (`HEAD`, `refs/tags/v1`, `main`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("reference name cannot be empty");
        }

        if INVALID_REF_NAME.is_match(&name) || name == "@" {
            anyhow::bail!("invalid reference name: {}", name);
        }

        Ok(Self(name))
    }

    /// `refs/tags/<tag_name>`, validating the tag name as a path component
    pub fn for_tag(tag_name: &str) -> anyhow::Result<Self> {
        Self::try_parse(format!("{TAGS_PREFIX}{tag_name}"))
            .with_context(|| format!("invalid tag name: {tag_name}"))
    }

    pub fn is_valid(name: &str) -> bool {
        Self::try_parse(name.to_string()).is_ok()
    }

    /// Whether the name can denote a stored reference: anything under `refs/`,
    /// or an all-caps pseudo ref such as `HEAD`. Other top-level names in the
    /// git directory (`config`, `description`, `objects/...`) never are.
    pub fn is_storable(&self) -> bool {
        self.0.starts_with(REFS_PREFIX) || PSEUDO_REF.is_match(&self.0)
    }

    pub fn as_ref_path(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
