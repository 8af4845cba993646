use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;
use common::command::{repository_dir, run_bit_command};

#[rstest]
fn init_repository_successfully(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir_absolute_path = repository_dir.path().canonicalize()?.display().to_string();
    let mut sut = Command::cargo_bin("bit-odb")?;

    sut.arg("init").arg(repository_dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty Git repository in .+\.git\n$",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    let git_dir = repository_dir.path().join(".git");
    assert!(git_dir.join("objects").is_dir());
    assert!(git_dir.join("refs/heads").is_dir());
    assert!(git_dir.join("refs/tags").is_dir());
    assert_eq!(
        std::fs::read_to_string(git_dir.join("HEAD"))?,
        "ref: refs/heads/master\n"
    );

    Ok(())
}

#[rstest]
fn init_bare_repository_successfully(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init", "--bare"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            repository_dir.path().canonicalize()?.display().to_string(),
        ));

    assert!(repository_dir.path().join("objects").is_dir());
    assert!(!repository_dir.path().join(".git").exists());

    Ok(())
}

#[rstest]
fn reinit_keeps_existing_head(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    let head = repository_dir.path().join(".git/HEAD");
    std::fs::write(&head, "ref: refs/heads/main\n")?;

    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&head)?, "ref: refs/heads/main\n");

    Ok(())
}

#[rstest]
fn commands_outside_a_repository_fail(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["rev-parse", "HEAD"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository"));

    Ok(())
}
