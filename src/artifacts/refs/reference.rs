use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::refs::SYMREF;
use derive_new::new;

/// What a reference points at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    /// Direct object ID
    Direct(ObjectId),
    /// Another reference, by name (e.g. HEAD -> refs/heads/master)
    Symbolic(String),
}

impl ReferenceTarget {
    /// Parse the content of a ref file: either `ref: <name>` or a full object id.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let content = content.trim();

        match SYMREF.captures(content) {
            Some(symref_match) => Ok(ReferenceTarget::Symbolic(symref_match[1].to_string())),
            None => Ok(ReferenceTarget::Direct(ObjectId::try_parse(
                content.to_string(),
            )?)),
        }
    }

    /// The content written to a ref file for this target (without newline).
    pub fn to_raw(&self) -> String {
        match self {
            ReferenceTarget::Direct(oid) => oid.to_string(),
            ReferenceTarget::Symbolic(name) => format!("ref: {name}"),
        }
    }

    pub fn oid(&self) -> Option<&ObjectId> {
        match self {
            ReferenceTarget::Direct(oid) => Some(oid),
            ReferenceTarget::Symbolic(_) => None,
        }
    }
}

impl std::fmt::Display for ReferenceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceTarget::Direct(oid) => write!(f, "{oid}"),
            ReferenceTarget::Symbolic(name) => write!(f, "{name}"),
        }
    }
}

/// A named pointer; replaced as a whole on write, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct Reference {
    name: String,
    target: ReferenceTarget,
}

impl Reference {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &ReferenceTarget {
        &self.target
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self.target, ReferenceTarget::Symbolic(_))
    }

    /// Name without the `refs/heads/`, `refs/tags/` or `refs/remotes/` prefix
    pub fn shorthand(&self) -> &str {
        ["refs/heads/", "refs/tags/", "refs/remotes/"]
            .iter()
            .find_map(|prefix| self.name.strip_prefix(*prefix))
            .unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbolic_content_is_parsed() {
        assert_eq!(
            ReferenceTarget::parse("ref: refs/heads/master\n").unwrap(),
            ReferenceTarget::Symbolic("refs/heads/master".into())
        );
    }

    #[test]
    fn direct_content_is_parsed() {
        let target =
            ReferenceTarget::parse("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391\n").unwrap();
        assert_eq!(
            target.oid().unwrap().as_ref(),
            "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"
        );
        assert_eq!(target.to_raw(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    }

    #[test]
    fn garbage_content_is_rejected() {
        assert!(ReferenceTarget::parse("not a ref").is_err());
    }

    #[test]
    fn shorthand_strips_namespace() {
        let oid = ObjectId::try_parse("a".repeat(40)).unwrap();
        let tag = Reference::new("refs/tags/v1".into(), ReferenceTarget::Direct(oid.clone()));
        let head = Reference::new("HEAD".into(), ReferenceTarget::Direct(oid));

        assert_eq!(tag.shorthand(), "v1");
        assert_eq!(head.shorthand(), "HEAD");
    }
}
