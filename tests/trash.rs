//! Moving entries into a freedesktop-layout trash rooted in a scratch folder.

use std::fs;

use assert_fs::prelude::*;
use fs_location::prelude::*;
use fs_location::{Trash, TrashLayout};

#[test]
fn file_lands_in_files_with_an_info_record() -> Result<(), Box<dyn std::error::Error>> {
    let temp = assert_fs::TempDir::new()?;
    temp.child("work/report.pdf").write_str("pdf")?;
    let trash = Trash::at(temp.child("Trash").path());
    assert_eq!(trash.layout(), TrashLayout::Freedesktop);

    let report = File::new(temp.child("work/report.pdf").path())?;
    let trashed = trash.put(&report)?;

    assert!(!report.exists());
    assert_eq!(trashed.path(), temp.child("Trash/files/report.pdf").path());
    temp.child("Trash/files/report.pdf").assert("pdf");

    let info = fs::read_to_string(temp.child("Trash/info/report.pdf.trashinfo").path())?;
    assert!(info.starts_with("[Trash Info]\n"));
    assert!(info.contains("Path="));
    assert!(info.contains("report.pdf\n"));
    assert!(info.contains("DeletionDate="));
    Ok(())
}

#[test]
fn same_name_twice_gets_numbered() -> Result<(), Box<dyn std::error::Error>> {
    let temp = assert_fs::TempDir::new()?;
    temp.child("a/notes.txt").write_str("first")?;
    temp.child("b/notes.txt").write_str("second")?;
    let trash = Trash::at(temp.child("Trash").path());

    let first = trash.put(&File::new(temp.child("a/notes.txt").path())?)?;
    let second = trash.put(&File::new(temp.child("b/notes.txt").path())?)?;

    assert_eq!(first.name(), "notes.txt");
    assert_eq!(second.name(), "notes (2).txt");
    temp.child("Trash/files/notes (2).txt").assert("second");
    assert!(temp.child("Trash/info/notes (2).txt.trashinfo").path().is_file());
    Ok(())
}

#[test]
fn folders_can_be_trashed() -> Result<(), Box<dyn std::error::Error>> {
    let temp = assert_fs::TempDir::new()?;
    temp.child("project/src/main.rs").write_str("fn main() {}")?;
    let trash = Trash::at(temp.child("Trash").path());

    let project = Folder::new(temp.child("project").path())?;
    let trashed = trash.put(&project)?;

    assert!(!project.exists());
    assert!(trashed.exists());
    temp.child("Trash/files/project/src/main.rs").assert("fn main() {}");
    Ok(())
}

#[test]
fn missing_entry_leaves_no_record() {
    let temp = assert_fs::TempDir::new().unwrap();
    let trash = Trash::at(temp.child("Trash").path());
    let ghost = File::new(temp.child("ghost.txt").path()).unwrap();

    let err = trash.put(&ghost).unwrap_err();
    assert!(matches!(err, LocationError::FileOrFolderDoesNotExist(_)));
    assert!(!temp.child("Trash/info").path().exists());
}
