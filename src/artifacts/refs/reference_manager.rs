use crate::areas::refs::Refs;
use crate::artifacts::errors::{RepositoryError, Result};
use crate::artifacts::refs::ref_name::RefName;
use crate::artifacts::refs::reference::Reference;
use crate::artifacts::refs::{DWIM_RULES, REF_ALIASES};

/// Typed lookups over the reference store.
///
/// Lookups come in two flavours: [`lookup`](Self::lookup) reports
/// absence as `Ok(None)`, [`lookup_required`](Self::lookup_required) turns
/// absence into [`RepositoryError::ObjectNotFound`]. Neither checks that the
/// target object exists.
#[derive(Debug, Clone)]
pub struct ReferenceManager {
    refs: Refs,
}

impl ReferenceManager {
    pub fn new(refs: Refs) -> Self {
        ReferenceManager { refs }
    }

    /// Look up a full reference name, following symbolic references.
    pub fn lookup(&self, name: &str) -> Result<Option<Reference>> {
        let ref_name = Self::parse_name(name)?;

        Ok(self.refs.resolve(&ref_name)?)
    }

    pub fn lookup_required(&self, name: &str) -> Result<Reference> {
        self.lookup(name)?
            .ok_or_else(|| RepositoryError::not_found(name))
    }

    /// Expand a short name (`v1`, `master`, `origin/main`, `@`) the way git
    /// does and return the first reference that exists.
    ///
    /// A shorthand that cannot form a valid reference name matches nothing.
    pub fn dwim(&self, shorthand: &str) -> Result<Option<Reference>> {
        let shorthand = *REF_ALIASES.get(shorthand).unwrap_or(&shorthand);

        for rule in DWIM_RULES {
            let candidate = rule.replace("%s", shorthand);
            let Ok(ref_name) = RefName::try_parse(candidate) else {
                continue;
            };

            if let Some(reference) = self.refs.resolve(&ref_name)? {
                tracing::trace!(shorthand, reference = %ref_name, "expanded short reference name");
                return Ok(Some(reference));
            }
        }

        Ok(None)
    }

    /// References whose full name starts with `prefix` (`""` for all).
    pub fn list(&self, prefix: &str) -> Result<Vec<Reference>> {
        Ok(self.refs.list(prefix)?)
    }

    fn parse_name(name: &str) -> Result<RefName> {
        RefName::try_parse(name.to_string()).map_err(|err| RepositoryError::InvalidReferenceName {
            name: name.to_string(),
            reason: err.to_string(),
        })
    }
}
