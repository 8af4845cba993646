//! Git annotated tag object
//!
//! ## Format
//!
//! On disk:
//! ```text
//! tag <size>\0
//! object <target-sha>
//! type <target-type>
//! tag <name>
//! tagger <name> <email> <timestamp> <timezone>
//!
//! <tag message>
//! ```
//!
//! The `tagger` line is optional (very old tags omit it). The message is
//! kept byte for byte, trailing newline included.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::signature::Signature;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct Tag {
    target: ObjectId,
    target_type: ObjectType,
    name: String,
    tagger: Option<Signature>,
    message: String,
}

impl Tag {
    pub fn target(&self) -> &ObjectId {
        &self.target
    }

    pub fn target_type(&self) -> ObjectType {
        self.target_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tagger(&self) -> Option<&Signature> {
        self.tagger.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Packable for Tag {
    fn pack_payload(&self) -> anyhow::Result<Bytes> {
        Ok(self.display().into())
    }
}

impl Unpackable for Tag {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (headers, message) = match content.split_once("\n\n") {
            Some((headers, message)) => (headers, message),
            // a tag with an empty message may stop right after its headers
            None => (content.trim_end_matches('\n'), ""),
        };
        let mut lines = headers.lines();

        let target = lines
            .next()
            .and_then(|line| line.strip_prefix("object "))
            .context("Invalid tag object: invalid object line")?;
        let target = ObjectId::try_parse(target.to_string())?;

        let target_type = lines
            .next()
            .and_then(|line| line.strip_prefix("type "))
            .context("Invalid tag object: invalid type line")?;
        let target_type = ObjectType::try_from(target_type)?;

        let name = lines
            .next()
            .and_then(|line| line.strip_prefix("tag "))
            .context("Invalid tag object: invalid tag line")?
            .to_string();

        let tagger = match lines.next().map(|line| line.strip_prefix("tagger ")) {
            Some(Some(tagger)) => Some(Signature::try_from(tagger)?),
            Some(None) | None => None,
        };

        Ok(Tag {
            target,
            target_type,
            name,
            tagger,
            message: message.to_string(),
        })
    }
}

impl Object for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }

    fn display(&self) -> String {
        let mut lines = vec![
            format!("object {}", self.target),
            format!("type {}", self.target_type),
            format!("tag {}", self.name),
        ];
        if let Some(tagger) = &self.tagger {
            lines.push(format!("tagger {}", tagger.display()));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}
