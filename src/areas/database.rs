//! Loose object database
//!
//! Every object lives in its own zlib-compressed file at
//! `objects/<xx>/<remaining-38-hex>`, holding `<type> <size>\0<payload>`.

use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::raw_record::{Header, RawRecord};
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Read only the `<type> <size>` envelope of an object.
    ///
    /// Inflation stops at the header terminator, so large payloads are not
    /// decompressed. Returns `None` when the object is absent.
    pub fn read_header(&self, object_id: &ObjectId) -> anyhow::Result<Option<Header>> {
        let Some(mut object_reader) = self.open_object(object_id)? else {
            return Ok(None);
        };

        let (kind, length) = ObjectType::parse_header(&mut object_reader)
            .with_context(|| format!("Corrupt object header in {object_id}"))?;

        Ok(Some(Header::new(object_id.clone(), kind, length)))
    }

    /// Read and inflate a whole object. Returns `None` when the object is absent.
    pub fn read(&self, object_id: &ObjectId) -> anyhow::Result<Option<RawRecord>> {
        let Some(mut object_reader) = self.open_object(object_id)? else {
            return Ok(None);
        };

        let (kind, length) = ObjectType::parse_header(&mut object_reader)
            .with_context(|| format!("Corrupt object header in {object_id}"))?;

        // the declared length is untrusted: grow as bytes arrive, stop one past it
        let mut payload = Vec::new();
        object_reader
            .take(length.saturating_add(1))
            .read_to_end(&mut payload)
            .with_context(|| format!("Unable to decompress object {object_id}"))?;

        let header = Header::new(object_id.clone(), kind, length);
        RawRecord::with_payload(header, payload.into()).map(Some)
    }

    /// Look an object up by id, optionally requiring a specific kind.
    pub fn lookup(
        &self,
        object_id: &ObjectId,
        expected: Option<ObjectType>,
    ) -> anyhow::Result<Option<Header>> {
        let header = self.read_header(object_id)?;

        if let (Some(header), Some(expected)) = (&header, expected)
            && header.kind != expected
        {
            anyhow::bail!("object {} is a {}, not a {}", object_id, header.kind, expected);
        }

        Ok(header)
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        self.write_serialized(object.serialize()?)
    }

    /// Store an already encoded payload under the given kind.
    pub fn store_raw(&self, kind: ObjectType, payload: &[u8]) -> anyhow::Result<ObjectId> {
        self.write_serialized(Self::encode_raw(kind, payload)?)
    }

    /// The id `payload` would be stored under, without writing anything.
    pub fn hash_raw(kind: ObjectType, payload: &[u8]) -> anyhow::Result<ObjectId> {
        Ok(ObjectId::hash(&Self::encode_raw(kind, payload)?))
    }

    fn encode_raw(kind: ObjectType, payload: &[u8]) -> anyhow::Result<Bytes> {
        let mut object_content = Vec::with_capacity(payload.len() + 32);
        write!(object_content, "{} {}\0", kind, payload.len())?;
        object_content.write_all(payload)?;

        Ok(object_content.into())
    }

    fn write_serialized(&self, object_content: Bytes) -> anyhow::Result<ObjectId> {
        let object_id = ObjectId::hash(&object_content);
        let object_path = self.path.join(object_id.to_path());

        // objects are immutable: an existing file already holds these bytes
        if object_path.exists() {
            tracing::trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, object_content)?;
        tracing::debug!(oid = %object_id, "stored object");

        Ok(object_id)
    }

    fn open_object(&self, object_id: &ObjectId) -> anyhow::Result<Option<impl BufRead + use<>>> {
        let object_path = self.path.join(object_id.to_path());

        match File::open(&object_path) {
            Ok(file) => Ok(Some(BufReader::new(flate2::bufread::ZlibDecoder::new(
                BufReader::new(file),
            )))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).context(format!(
                "Unable to read object file {}",
                object_path.display()
            )),
        }
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use assert_fs::TempDir;
    use rstest::{fixture, rstest};

    const EMPTY_BLOB_OID: &str = "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391";

    #[fixture]
    fn objects_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().to_path_buf().into_boxed_path())
    }

    #[rstest]
    fn stored_blob_is_found_at_its_hash(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let oid = database.store(&Blob::new(Bytes::new())).unwrap();

        assert_eq!(oid.as_ref(), EMPTY_BLOB_OID);
        assert!(database.exists(&oid));
        assert!(objects_dir.path().join(oid.to_path()).is_file());
    }

    #[rstest]
    fn hashing_matches_storing(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let hashed = Database::hash_raw(ObjectType::Blob, b"").unwrap();
        assert_eq!(hashed.as_ref(), EMPTY_BLOB_OID);
        assert!(!database.exists(&hashed));

        assert_eq!(database.store_raw(ObjectType::Blob, b"").unwrap(), hashed);
    }

    #[rstest]
    fn header_and_full_read_agree(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.store_raw(ObjectType::Blob, b"some content\n").unwrap();

        let header = database.read_header(&oid).unwrap().unwrap();
        let record = database.read(&oid).unwrap().unwrap();

        assert_eq!(&header, record.header());
        assert_eq!(header.length, 13);
        assert_eq!(record.payload().unwrap().as_ref(), b"some content\n");
    }

    #[rstest]
    fn absent_object_reads_as_none(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = ObjectId::try_parse(EMPTY_BLOB_OID.to_string()).unwrap();

        assert!(!database.exists(&oid));
        assert!(database.read_header(&oid).unwrap().is_none());
        assert!(database.read(&oid).unwrap().is_none());
        assert!(database.lookup(&oid, None).unwrap().is_none());
    }

    #[rstest]
    fn lookup_checks_the_expected_kind(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.store_raw(ObjectType::Blob, b"").unwrap();

        assert_eq!(
            database.lookup(&oid, Some(ObjectType::Blob)).unwrap().unwrap().kind,
            ObjectType::Blob
        );
        assert!(database.lookup(&oid, Some(ObjectType::Tag)).is_err());
    }

    #[rstest]
    fn storing_twice_is_a_no_op(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let first = database.store_raw(ObjectType::Blob, b"same").unwrap();
        let second = database.store(&Blob::new(Bytes::from_static(b"same"))).unwrap();

        assert_eq!(first, second);
    }

    #[rstest]
    fn corrupt_object_file_is_an_error(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = ObjectId::try_parse(EMPTY_BLOB_OID.to_string()).unwrap();
        let path = objects_dir.path().join(oid.to_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"definitely not zlib").unwrap();

        assert!(database.read(&oid).is_err());
    }

    #[rstest]
    fn oversized_declared_length_is_an_error(objects_dir: TempDir) {
        use flate2::Compression;
        use flate2::write::ZlibEncoder;

        let database = database(&objects_dir);
        let oid = ObjectId::try_parse(EMPTY_BLOB_OID.to_string()).unwrap();
        let path = objects_dir.path().join(oid.to_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"blob 18446744073709551615\0x").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        assert!(database.read(&oid).is_err());
    }
}
