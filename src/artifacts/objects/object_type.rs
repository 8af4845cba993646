use anyhow::Context;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
            ObjectType::Tag => "tag",
        }
    }

    /// Read the `<type> <size>\0` envelope from the start of an inflated object.
    ///
    /// The reader is left positioned at the first payload byte.
    pub fn parse_header(data_reader: &mut impl BufRead) -> anyhow::Result<(ObjectType, u64)> {
        let mut object_type = Vec::new();
        data_reader.read_until(b' ', &mut object_type)?;
        if object_type.pop() != Some(b' ') {
            anyhow::bail!("unexpected EOF in object type");
        }

        let object_type = String::from_utf8(object_type)?;
        let object_type = ObjectType::try_from(object_type.as_str())?;

        let mut size = Vec::new();
        data_reader.read_until(b'\0', &mut size)?;
        if size.pop() != Some(b'\0') {
            anyhow::bail!("unexpected EOF in object size");
        }

        let size = std::str::from_utf8(&size)?
            .parse::<u64>()
            .context("Invalid object size")?;

        Ok((object_type, size))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            "tag" => Ok(ObjectType::Tag),
            _ => Err(anyhow::anyhow!("Invalid object type: {value}")),
        }
    }
}

impl std::str::FromStr for ObjectType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        ObjectType::try_from(s)
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::{Cursor, Read};

    #[rstest]
    #[case(b"blob 0\0".as_slice(), ObjectType::Blob, 0)]
    #[case(b"tree 37\0".as_slice(), ObjectType::Tree, 37)]
    #[case(b"commit 212\0".as_slice(), ObjectType::Commit, 212)]
    #[case(b"tag 140\0".as_slice(), ObjectType::Tag, 140)]
    fn header_is_parsed(#[case] header: &[u8], #[case] kind: ObjectType, #[case] size: u64) {
        let mut reader = Cursor::new(header);
        assert_eq!(ObjectType::parse_header(&mut reader).unwrap(), (kind, size));
    }

    #[test]
    fn reader_is_left_at_payload() {
        let mut reader = Cursor::new(b"blob 5\0hello".as_slice());
        ObjectType::parse_header(&mut reader).unwrap();

        let mut payload = String::new();
        reader.read_to_string(&mut payload).unwrap();
        assert_eq!(payload, "hello");
    }

    #[rstest]
    #[case(b"blobby 0\0".as_slice())]
    #[case(b"blob".as_slice())]
    #[case(b"blob 12".as_slice())]
    #[case(b"blob twelve\0".as_slice())]
    fn malformed_header_is_rejected(#[case] header: &[u8]) {
        let mut reader = Cursor::new(header);
        assert!(ObjectType::parse_header(&mut reader).is_err());
    }
}
