//! Undecoded object envelopes as read from the object database

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;

/// `<type> <size>` of a stored object, tagged with the address it was read from
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Header {
    pub oid: ObjectId,
    pub kind: ObjectType,
    pub length: u64,
}

/// A stored object before type-specific decoding
///
/// `payload` is `None` for header-only reads. The bytes are owned, so a
/// record stays valid after the repository that produced it is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    header: Header,
    payload: Option<Bytes>,
}

impl RawRecord {
    pub fn header_only(header: Header) -> Self {
        RawRecord {
            header,
            payload: None,
        }
    }

    pub fn with_payload(header: Header, payload: Bytes) -> anyhow::Result<Self> {
        if payload.len() as u64 != header.length {
            anyhow::bail!(
                "object {} declares {} bytes but holds {}",
                header.oid,
                header.length,
                payload.len()
            );
        }

        Ok(RawRecord {
            header,
            payload: Some(payload),
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn oid(&self) -> &ObjectId {
        &self.header.oid
    }

    pub fn kind(&self) -> ObjectType {
        self.header.kind
    }

    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    pub fn into_parts(self) -> (Header, Option<Bytes>) {
        (self.header, self.payload)
    }
}
