//! Renaming in place and deleting.

use assert_fs::prelude::*;
use fs_location::prelude::*;
use tempfile::tempdir;

#[test]
fn rename_onto_existing_sibling_fails_without_mutation() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("a.txt").write_str("a").unwrap();
    temp.child("b.txt").write_str("b").unwrap();
    let a = File::new(temp.child("a.txt").path()).unwrap();

    let err = a.rename("b.txt").unwrap_err();
    assert!(matches!(err, LocationError::DestinationExistsAtPath(_)), "got {err:?}");

    assert!(a.exists());
    temp.child("a.txt").assert("a");
    temp.child("b.txt").assert("b");
}

#[test]
fn rename_returns_value_at_new_path() {
    let td = tempdir().unwrap();
    let d = Folder::create(td.path().join("before")).unwrap();
    let renamed = d.rename("after").unwrap();
    assert!(!d.exists());
    assert!(renamed.exists());
    assert_eq!(renamed.name(), "after");
}

#[test]
fn rename_rejects_paths() {
    let td = tempdir().unwrap();
    let f = File::create(td.path().join("x.txt")).unwrap();
    for bad in ["", ".", "..", "a/b", "/abs"] {
        let err = f.rename(bad).unwrap_err();
        assert!(matches!(err, LocationError::InvalidName(_)), "{bad:?} gave {err:?}");
    }
    assert!(f.exists());
}

#[test]
fn delete_file_and_folder() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("f.txt").write_str("x").unwrap();
    temp.child("d/nested/g.txt").write_str("y").unwrap();

    File::new(temp.child("f.txt").path()).unwrap().delete().unwrap();
    Folder::new(temp.child("d").path()).unwrap().delete().unwrap();

    assert!(!temp.child("f.txt").path().exists());
    assert!(!temp.child("d").path().exists());
}

#[test]
fn delete_missing_entry_errors() {
    let td = tempdir().unwrap();
    let f = File::new(td.path().join("never.txt")).unwrap();
    assert!(f.delete().is_err());
}

#[cfg(unix)]
#[test]
fn delete_symlink_keeps_target() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("real/keep.txt").write_str("keep").unwrap();
    std::os::unix::fs::symlink(temp.child("real").path(), temp.child("link").path()).unwrap();

    Folder::new(temp.child("link").path()).unwrap().delete().unwrap();

    assert!(std::fs::symlink_metadata(temp.child("link").path()).is_err());
    temp.child("real/keep.txt").assert("keep");
}
