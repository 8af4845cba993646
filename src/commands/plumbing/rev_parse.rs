use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;

impl Repository {
    /// Print the object id `identifier` names, optionally requiring its kind.
    pub fn rev_parse(
        &self,
        identifier: &str,
        expected: Option<ObjectType>,
        writer: &mut impl Write,
    ) -> anyhow::Result<()> {
        let object = self
            .resolve(identifier, expected)?
            .ok_or_else(|| anyhow::anyhow!("Not a valid object name {identifier}"))?;

        writeln!(writer, "{}", object.oid())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::errors::RepositoryError;
    use assert_fs::TempDir;

    #[test]
    fn unknown_name_is_reported() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Repository::init(dir.path(), true).unwrap();
        let repository = Repository::open(dir.path()).unwrap();

        // HEAD points at an unborn branch
        let err = repository.rev_parse("HEAD", None, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Not a valid object name HEAD"));

        let err = repository
            .rev_parse(&"0".repeat(40), None, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RepositoryError>(),
            Some(RepositoryError::ObjectNotFound { .. })
        ));
    }
}
