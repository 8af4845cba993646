use crate::areas::repository::Repository;
use crate::artifacts::objects::signature::Signature;
use crate::artifacts::refs::TAGS_PREFIX;
use std::io::Write;

impl Repository {
    /// Print the short name of every tag, sorted.
    pub fn list_tags(&self, writer: &mut impl Write) -> anyhow::Result<()> {
        for reference in self.refs().list(TAGS_PREFIX)? {
            writeln!(writer, "{}", reference.shorthand())?;
        }

        Ok(())
    }

    /// Create an annotated tag on whatever `target` names and print the tag's id.
    pub fn tag(
        &self,
        tag_name: &str,
        target: &str,
        message: &str,
        tagger: &Signature,
        writer: &mut impl Write,
    ) -> anyhow::Result<()> {
        let target_object = self
            .resolve(target, None)?
            .ok_or_else(|| anyhow::anyhow!("Failed to resolve '{target}' as a valid ref."))?;

        let tag = self.apply_tag(target_object.oid().as_ref(), tag_name, message, tagger)?;

        writeln!(writer, "{}", tag.oid())?;

        Ok(())
    }
}
