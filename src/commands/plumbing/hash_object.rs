use crate::areas::database::Database;
use crate::areas::repository::Repository;
use crate::artifacts::objects::builder::ObjectBuilder;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::raw_record::{Header, RawRecord};
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Print the id `file` hashes to as an object of `kind`; store it when `write` is set.
    ///
    /// Non-blob payloads must decode as their kind.
    pub fn hash_object(
        &self,
        file: &Path,
        kind: ObjectType,
        write: bool,
        writer: &mut impl Write,
    ) -> anyhow::Result<()> {
        // read object file
        let payload = Bytes::from(
            std::fs::read(file).with_context(|| format!("Unable to read {}", file.display()))?,
        );

        // hash
        let object_id = Database::hash_raw(kind, &payload)?;

        if kind != ObjectType::Blob {
            let header = Header::new(object_id.clone(), kind, payload.len() as u64);
            ObjectBuilder.build_from(RawRecord::with_payload(header, payload.clone())?)?;
        }

        // write (if write is true) as compressed object file
        if write {
            self.database().store_raw(kind, &payload)?;
        }

        writeln!(writer, "{}", object_id)?;

        Ok(())
    }
}
