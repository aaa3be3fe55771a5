//! Moving and copying files and folders into other folders.

use std::fs;

use assert_fs::prelude::*;
use fs_location::prelude::*;
use tempfile::tempdir;

#[test]
fn move_file_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    let src = File::create(td.path().join("in/data.bin"))?;
    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    src.write(&payload)?;
    let dest = Folder::create(td.path().join("out"))?;

    let moved = src.move_into(&dest)?;

    assert!(!src.exists(), "source should be gone");
    assert!(moved.exists(), "result should exist");
    assert_eq!(moved.path(), dest.path().join("data.bin"));
    assert_eq!(moved.read()?, payload);
    Ok(())
}

#[test]
fn copy_file_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    let src = File::create(td.path().join("note.txt"))?;
    src.write("same bytes")?;
    let dest = Folder::create(td.path().join("copies"))?;

    let copy = src.copy_into(&dest)?;

    assert!(src.exists());
    assert!(copy.exists());
    assert_eq!(src.read()?, copy.read()?);
    Ok(())
}

#[test]
fn copy_preserves_modification_time() -> Result<(), Box<dyn std::error::Error>> {
    use chrono::{Local, TimeZone};

    let td = tempdir()?;
    let src = File::create(td.path().join("old.txt"))?;
    let when = Local.with_ymd_and_hms(2019, 1, 2, 3, 4, 5).unwrap();
    src.set_modification_date(when)?;
    let dest = Folder::create(td.path().join("out"))?;

    let copy = src.copy_into(&dest)?;
    assert_eq!(copy.modification_date().unwrap(), when);
    Ok(())
}

#[test]
fn folder_copy_is_recursive() -> Result<(), Box<dyn std::error::Error>> {
    let temp = assert_fs::TempDir::new()?;
    temp.child("tree/a.txt").write_str("a")?;
    temp.child("tree/nested/b.txt").write_str("b")?;
    let tree = Folder::new(temp.child("tree").path())?;
    let dest = Folder::create(temp.child("dest").path())?;

    let copy = tree.copy_into(&dest)?;

    assert!(tree.exists());
    assert_eq!(copy.path(), temp.child("dest/tree").path());
    temp.child("dest/tree/a.txt").assert("a");
    temp.child("dest/tree/nested/b.txt").assert("b");
    Ok(())
}

#[test]
fn folder_move_carries_contents() -> Result<(), Box<dyn std::error::Error>> {
    let temp = assert_fs::TempDir::new()?;
    temp.child("box/inner.txt").write_str("inner")?;
    let bx = Folder::new(temp.child("box").path())?;
    let dest = Folder::create(temp.child("shelf").path())?;

    let moved = bx.move_into(&dest)?;

    assert!(!bx.exists());
    assert!(moved.contains_file("inner.txt"));
    Ok(())
}

#[test]
fn occupied_destination_is_refused_before_any_change() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("src/dup.txt").write_str("new").unwrap();
    temp.child("dst/dup.txt").write_str("old").unwrap();
    let src = File::new(temp.child("src/dup.txt").path()).unwrap();
    let dest = Folder::new(temp.child("dst").path()).unwrap();

    let err = src.move_into(&dest).unwrap_err();
    assert!(matches!(err, LocationError::DestinationExistsAtPath(_)), "got {err:?}");
    let err = src.copy_into(&dest).unwrap_err();
    assert!(matches!(err, LocationError::DestinationExistsAtPath(_)));

    temp.child("src/dup.txt").assert("new");
    temp.child("dst/dup.txt").assert("old");
}

#[test]
fn missing_destination_folder_is_refused() {
    let td = tempdir().unwrap();
    let src = File::create(td.path().join("f.txt")).unwrap();
    let nowhere = Folder::new(td.path().join("nowhere")).unwrap();

    let err = src.move_into(&nowhere).unwrap_err();
    assert!(matches!(err, LocationError::DestinationFolderDoesNotExist(_)));
    assert!(src.exists());
    assert!(!nowhere.exists());
}

#[test]
fn missing_source_is_refused() {
    let td = tempdir().unwrap();
    let ghost = File::new(td.path().join("ghost.txt")).unwrap();
    let dest = Folder::new(td.path()).unwrap();
    let err = ghost.copy_into(&dest).unwrap_err();
    assert!(matches!(err, LocationError::FileOrFolderDoesNotExist(_)));
}

#[test]
fn folder_cannot_move_into_itself() {
    let td = tempdir().unwrap();
    let outer = Folder::create(td.path().join("outer")).unwrap();
    let inner = outer.create_subfolder("inner").unwrap();

    let err = outer.move_into(&inner).unwrap_err();
    assert!(matches!(err, LocationError::Unknown(_)));
    assert!(outer.exists());
    assert!(fs::read_dir(inner.path()).unwrap().next().is_none());
}

#[cfg(unix)]
#[test]
fn folder_cannot_be_copied_through_a_link_into_itself() {
    let td = tempdir().unwrap();
    let a = Folder::create(td.path().join("a")).unwrap();
    let sub = a.create_subfolder("sub").unwrap();
    std::os::unix::fs::symlink(sub.path(), td.path().join("link")).unwrap();
    let via_link = Folder::new(td.path().join("link")).unwrap();

    let err = a.copy_into(&via_link).unwrap_err();
    assert!(matches!(err, LocationError::Unknown(_)));
    let err = a.move_into(&via_link).unwrap_err();
    assert!(matches!(err, LocationError::Unknown(_)));

    assert!(a.exists());
    assert!(fs::read_dir(sub.path()).unwrap().next().is_none(), "source was written into");
}

#[cfg(unix)]
#[test]
fn failed_folder_copy_leaves_nothing_behind_and_can_be_retried() -> Result<(), Box<dyn std::error::Error>> {
    let temp = assert_fs::TempDir::new()?;
    temp.child("tree/a.txt").write_str("a")?;
    let socket = temp.child("tree/zz.sock");
    let listener = std::os::unix::net::UnixListener::bind(socket.path())?;
    let tree = Folder::new(temp.child("tree").path())?;
    let dest = Folder::create(temp.child("dest").path())?;

    assert!(tree.copy_into(&dest).is_err());
    assert!(!temp.child("dest/tree").path().exists());

    drop(listener);
    fs::remove_file(socket.path())?;
    let copy = tree.copy_into(&dest)?;
    assert_eq!(copy.path(), temp.child("dest/tree").path());
    temp.child("dest/tree/a.txt").assert("a");
    Ok(())
}
