use crate::areas::repository::Repository;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub fn init_repository(
        path: &Path,
        is_bare: bool,
        writer: &mut impl Write,
    ) -> anyhow::Result<()> {
        let git_dir = Repository::init(path, is_bare)?;

        writeln!(
            writer,
            "Initialized empty Git repository in {}",
            git_dir.display()
        )?;

        Ok(())
    }
}
