use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

/// What `cat-file` reports about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// `-t`: the kind
    Type,
    /// `-s`: the payload size in bytes
    Size,
    /// `-e`: nothing, only whether the object exists
    Exists,
    /// `-p`: the decoded content
    Pretty,
}

impl Repository {
    /// Returns `false` only when `mode` is [`CatFileMode::Exists`] and nothing is found.
    pub fn cat_file(
        &self,
        identifier: &str,
        mode: CatFileMode,
        writer: &mut impl Write,
    ) -> anyhow::Result<bool> {
        let address = match self.resolve_address(identifier)? {
            Some(address) => address,
            None if mode == CatFileMode::Exists => return Ok(false),
            None => anyhow::bail!("Not a valid object name {identifier}"),
        };

        match mode {
            CatFileMode::Type => {
                writeln!(writer, "{}", self.read_header(address.as_ref())?.kind)?;
            }
            CatFileMode::Size => {
                writeln!(writer, "{}", self.read_header(address.as_ref())?.length)?;
            }
            CatFileMode::Exists => return Ok(self.exists(address.as_ref())?),
            CatFileMode::Pretty => {
                let object = self
                    .resolve(address.as_ref(), None)?
                    .ok_or_else(|| anyhow::anyhow!("Not a valid object name {identifier}"))?;

                write!(writer, "{}", object.display())?;
            }
        }

        Ok(true)
    }

    // object ids are taken as-is, names go through the reference store
    fn resolve_address(&self, identifier: &str) -> anyhow::Result<Option<ObjectId>> {
        if ObjectId::is_valid(identifier) {
            return Ok(Some(ObjectId::try_parse(identifier.to_string())?));
        }

        Ok(self
            .refs()
            .dwim(identifier)?
            .and_then(|reference| reference.target().oid().cloned()))
    }
}
