use assert_fs::TempDir;
use bit_odb::areas::lifecycle::RepositoryDetails;
use bit_odb::areas::repository::Repository;
use bit_odb::artifacts::errors::RepositoryError;
use bit_odb::artifacts::objects::object_id::ObjectId;
use bit_odb::artifacts::objects::object_type::ObjectType;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

mod common;
use common::command::{
    CommittedRepository, committed_repository, fake_author, init_repository_dir, repository_dir,
};

#[rstest]
fn tags_survive_reopening(committed_repository: CommittedRepository) {
    let dir = committed_repository.dir.path();
    let tag_oid = {
        let repository = Repository::open(dir).unwrap();
        let tag = repository
            .apply_tag(&committed_repository.commit, "v1", "release\n", &fake_author())
            .unwrap();
        tag.oid().clone()
    };

    let repository = Repository::open(dir).unwrap();
    let resolved = repository.resolve("refs/tags/v1", None).unwrap().unwrap();

    assert_eq!(resolved.oid(), &tag_oid);
    let tag = resolved.into_tag().unwrap();
    assert_eq!(tag.target().as_ref(), committed_repository.commit);
    assert_eq!(tag.message(), "release\n");
    assert_eq!(tag.tagger(), Some(&fake_author()));
}

#[rstest]
fn packed_tags_resolve(committed_repository: CommittedRepository) {
    let dir = committed_repository.dir.path();
    std::fs::write(
        dir.join(".git/packed-refs"),
        format!(
            "# pack-refs with: peeled fully-peeled sorted\n{} refs/tags/packed\n",
            committed_repository.tree
        ),
    )
    .unwrap();
    let repository = Repository::open(dir).unwrap();

    let object = repository
        .resolve("packed", Some(ObjectType::Tree))
        .unwrap()
        .unwrap();
    assert_eq!(object.oid().as_ref(), committed_repository.tree);

    let err = repository
        .apply_tag(&committed_repository.commit, "packed", "again", &fake_author())
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidReferenceName { .. }));
}

#[rstest]
fn corrupt_payload_is_a_decode_error(init_repository_dir: TempDir) {
    let repository = Repository::open(init_repository_dir.path()).unwrap();
    let oid = repository
        .database()
        .store_raw(ObjectType::Commit, b"this is not a commit")
        .unwrap();

    let err = repository.resolve(oid.as_ref(), None).unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::Decode {
            kind: ObjectType::Commit,
            ..
        }
    ));
    // raw access does not decode
    assert_eq!(repository.read(oid.as_ref()).unwrap().kind(), ObjectType::Commit);
}

#[rstest]
fn uppercase_object_ids_are_accepted(committed_repository: CommittedRepository) {
    let repository = Repository::open(committed_repository.dir.path()).unwrap();
    let upper = committed_repository.commit.to_uppercase();

    let object = repository.resolve(&upper, None).unwrap().unwrap();

    assert_eq!(object.oid().as_ref(), committed_repository.commit);
    assert!(repository.exists(&upper).unwrap());
}

#[rstest]
fn explicit_layout_opens_like_discovery(committed_repository: CommittedRepository) {
    let discovered = Repository::open(committed_repository.dir.path()).unwrap();
    let git_dir = discovered.details().repository_directory.clone();

    let explicit = Repository::from_details(RepositoryDetails::new(
        git_dir.clone(),
        git_dir.join("objects"),
        None,
        None,
    ))
    .unwrap();

    assert!(explicit.details().is_bare);
    assert_eq!(
        explicit.resolve("HEAD", None).unwrap().unwrap().oid().as_ref(),
        committed_repository.commit
    );
}

#[rstest]
fn missing_directories_are_rejected(repository_dir: TempDir) {
    let git_dir = repository_dir.path().join(".git");

    let result = Repository::from_details(RepositoryDetails::new(
        git_dir.clone(),
        git_dir.join("objects"),
        None,
        None,
    ));

    assert!(matches!(result, Err(RepositoryError::Backend(_))));
}

const BOUND_NAMES: [&str; 5] = ["HEAD", "@", "master", "heads/master", "refs/heads/master"];

#[rstest]
fn unbound_names_never_resolve(committed_repository: CommittedRepository) {
    let repository = Repository::open(committed_repository.dir.path()).unwrap();
    let git_dir = repository.details().repository_directory.clone();
    std::fs::write(git_dir.join("config"), "[core]\n\tbare = false\n").unwrap();
    std::fs::write(git_dir.join("description"), "Unnamed repository\n").unwrap();
    std::fs::create_dir_all(git_dir.join("info")).unwrap();
    std::fs::write(git_dir.join("info/exclude"), "# ignored\n").unwrap();

    let identifiers = prop_oneof![
        "\\PC{0,24}",
        Just("config".to_string()),
        Just("description".to_string()),
        Just("info/exclude".to_string()),
        "objects/[0-9a-f]{2}/[0-9a-f]{38}",
    ];

    proptest!(ProptestConfig::with_cases(128), |(identifier in identifiers)| {
        prop_assume!(!ObjectId::is_valid(&identifier));
        prop_assume!(!BOUND_NAMES.contains(&identifier.as_str()));

        prop_assert!(repository.resolve(&identifier, None).unwrap().is_none());
    });
}
