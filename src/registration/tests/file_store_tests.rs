//! Tests for the file-backed identity store.

use crate::registration::{
    adapters::FileIdentityStore,
    domain::RegistrationRecord,
    ports::{IdentityStore, IdentityStoreError},
};
use crate::service_registry::domain::TargetId;
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Workspace {
    _temp: TempDir,
    store: FileIdentityStore,
}

#[fixture]
fn workspace() -> Workspace {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().join("state/registrations"))
        .expect("utf-8 temp path");
    Workspace {
        _temp: temp,
        store: FileIdentityStore::new(root),
    }
}

#[rstest]
fn load_before_prepare_finds_nothing(workspace: Workspace) {
    let loaded = workspace.store.load("s3").expect("load should succeed");
    assert!(loaded.is_none());
}

#[rstest]
fn saved_record_survives_a_new_store(workspace: Workspace) {
    workspace.store.prepare().expect("prepare should create the directory");
    let record = RegistrationRecord::new("s3", TargetId::new("abc").expect("valid id"));
    workspace.store.save(&record).expect("save should succeed");

    let reopened = FileIdentityStore::new(workspace.store.root().to_owned());
    let loaded = reopened.load("s3").expect("load should succeed");

    assert_eq!(loaded, Some(record));
    assert!(
        !workspace
            .store
            .root()
            .join("s3.registration.json.tmp")
            .exists()
    );
}

#[rstest]
fn records_are_kept_per_service(workspace: Workspace) {
    workspace.store.prepare().expect("prepare");
    let first = RegistrationRecord::new("s3", TargetId::new("one").expect("valid id"));
    let second = RegistrationRecord::new("search", TargetId::new("two").expect("valid id"));
    workspace.store.save(&first).expect("save first");
    workspace.store.save(&second).expect("save second");

    assert_eq!(workspace.store.load("s3").expect("load"), Some(first));
    assert_eq!(workspace.store.load("search").expect("load"), Some(second));
}

#[rstest]
fn corrupt_record_is_reported(workspace: Workspace) {
    workspace.store.prepare().expect("prepare");
    std::fs::write(
        workspace.store.root().join("s3.registration.json"),
        "not json",
    )
    .expect("write corrupt record");

    let result = workspace.store.load("s3");

    assert!(matches!(
        result,
        Err(IdentityStoreError::Corrupt { ref service_name, .. }) if service_name == "s3"
    ));
}

#[rstest]
fn save_without_prepare_fails(workspace: Workspace) {
    let record = RegistrationRecord::new("s3", TargetId::new("abc").expect("valid id"));
    let result = workspace.store.save(&record);
    assert!(matches!(result, Err(IdentityStoreError::Io(_))));
}
