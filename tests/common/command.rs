use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use bit_odb::areas::refs::Refs;
use bit_odb::areas::repository::Repository;
use bit_odb::artifacts::objects::blob::Blob;
use bit_odb::artifacts::objects::commit::Commit;
use bit_odb::artifacts::objects::entry_mode::EntryMode;
use bit_odb::artifacts::objects::signature::Signature;
use bit_odb::artifacts::objects::tree::{Tree, TreeEntry};
use bit_odb::artifacts::refs::ref_name::RefName;
use bit_odb::artifacts::refs::reference::ReferenceTarget;
use bytes::Bytes;
use derive_new::new;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

/// A repository whose `master` holds one commit of one file
#[derive(Debug, new)]
pub struct CommittedRepository {
    pub dir: TempDir,
    pub blob: String,
    pub tree: String,
    pub commit: String,
}

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

#[fixture]
pub fn committed_repository(init_repository_dir: TempDir) -> CommittedRepository {
    let repository =
        Repository::open(init_repository_dir.path()).expect("Failed to open repository");
    let database = repository.database();

    let blob = database
        .store(&Blob::new(Bytes::from_static(b"one\n")))
        .expect("Failed to store blob");
    let tree = database
        .store(&Tree::new(vec![TreeEntry::new(
            "1.txt".to_string(),
            blob.clone(),
            EntryMode::Regular,
        )]))
        .expect("Failed to store tree");
    let commit = database
        .store(&Commit::new(
            vec![],
            tree.clone(),
            fake_author(),
            "Initial commit\n".to_string(),
        ))
        .expect("Failed to store commit");

    Refs::new(
        repository
            .details()
            .repository_directory
            .clone()
            .into_boxed_path(),
    )
    .update(
        &RefName::try_parse("refs/heads/master".to_string()).expect("valid ref name"),
        &ReferenceTarget::Direct(commit.clone()),
    )
    .expect("Failed to update master");

    CommittedRepository::new(
        init_repository_dir,
        blob.to_string(),
        tree.to_string(),
        commit.to_string(),
    )
}

pub fn fake_author() -> Signature {
    let when = chrono::DateTime::parse_from_str(AUTHOR_DATE, "%Y-%m-%d %H:%M:%S %z")
        .expect("valid author date");

    Signature::new_with_timestamp(
        "fake_user".to_string(),
        "fake_email@email.com".to_string(),
        when,
    )
}

pub fn run_bit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bit-odb").expect("Failed to find bit-odb binary");
    cmd.env_remove("BIT_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn bit_tag(dir: &Path, name: &str, target: &str, message: &str) -> Command {
    let mut cmd = run_bit_command(dir, &["tag", name, target, "-m", message]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", "fake_user"),
        ("GIT_AUTHOR_EMAIL", "fake_email@email.com"),
        ("GIT_AUTHOR_DATE", AUTHOR_DATE), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Run a command that must succeed and return its stdout without the trailing newline
pub fn stdout_of(mut cmd: Command) -> Result<String, Box<dyn std::error::Error>> {
    let output = cmd.assert().success().get_output().stdout.clone();

    Ok(String::from_utf8(output)?.trim_end().to_string())
}
