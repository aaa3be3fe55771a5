//! Walking folder contents.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use assert_fs::prelude::*;
use fs_location::prelude::*;

fn names(items: &[Item]) -> BTreeSet<String> {
    items.iter().map(Item::name).collect()
}

#[test]
fn hidden_entries_are_skipped_by_default() {
    let temp = assert_fs::TempDir::new().unwrap();
    for n in ["one.txt", "two.txt", "three.txt"] {
        temp.child(n).write_str(n).unwrap();
    }
    temp.child(".hidden").write_str("h").unwrap();
    let folder = Folder::new(temp.path()).unwrap();

    let visible = folder.all_content(EnumerationOptions::default(), None).unwrap();
    assert_eq!(visible.len(), 3);
    assert!(!names(&visible).contains(".hidden"));

    let all = folder
        .all_content(EnumerationOptions::default().include_hidden(true), None)
        .unwrap();
    assert_eq!(all.len(), 4);
}

#[test]
fn shallow_versus_recursive() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("top.txt").write_str("t").unwrap();
    temp.child("sub/deep.txt").write_str("d").unwrap();
    let folder = Folder::new(temp.path()).unwrap();

    let shallow = folder.all_content(EnumerationOptions::default(), None).unwrap();
    assert_eq!(names(&shallow), BTreeSet::from(["top.txt".into(), "sub".into()]));

    let deep = folder.all_content(EnumerationOptions::recursive(), None).unwrap();
    assert_eq!(
        names(&deep),
        BTreeSet::from(["top.txt".into(), "sub".into(), "deep.txt".into()])
    );

    assert_eq!(folder.files().unwrap().len(), 1);
    assert_eq!(folder.subfolders().unwrap().len(), 1);
    assert_eq!(
        folder.all_files(EnumerationOptions::recursive(), None).unwrap().len(),
        2
    );
}

#[test]
fn filter_is_applied() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("a.rs").write_str("").unwrap();
    temp.child("b.rs").write_str("").unwrap();
    temp.child("c.md").write_str("").unwrap();
    let folder = Folder::new(temp.path()).unwrap();

    let only_rs = |i: &Item| i.name().ends_with(".rs");
    let hits = folder
        .all_content(EnumerationOptions::default(), Some(&only_rs))
        .unwrap();
    assert_eq!(names(&hits), BTreeSet::from(["a.rs".into(), "b.rs".into()]));
}

#[test]
fn break_stops_the_walk() {
    let temp = assert_fs::TempDir::new().unwrap();
    for i in 0..10 {
        temp.child(format!("f{i}.txt")).write_str("x").unwrap();
    }
    let folder = Folder::new(temp.path()).unwrap();

    let mut seen = 0;
    folder
        .enumerate(EnumerationOptions::default(), |_| {
            seen += 1;
            if seen == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
    assert_eq!(seen, 3);
}

#[test]
fn packages_are_opaque_unless_requested() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("Tool.app/Contents/Info.plist").write_str("<plist/>").unwrap();
    temp.child("plain/file.txt").write_str("x").unwrap();
    let folder = Folder::new(temp.path()).unwrap();

    let default = folder.all_content(EnumerationOptions::recursive(), None).unwrap();
    let n = names(&default);
    assert!(n.contains("Tool.app"));
    assert!(!n.contains("Contents"));
    assert!(n.contains("file.txt"));

    let opened = folder
        .all_content(EnumerationOptions::recursive().recurse_into_packages(true), None)
        .unwrap();
    let n = names(&opened);
    assert!(n.contains("Contents"));
    assert!(n.contains("Info.plist"));
}

#[cfg(unix)]
#[test]
fn links_are_classified_by_their_own_type() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("real").create_dir_all().unwrap();
    temp.child("real/inside.txt").write_str("x").unwrap();
    std::os::unix::fs::symlink(temp.child("real").path(), temp.child("link").path()).unwrap();
    let folder = Folder::new(temp.path()).unwrap();

    let items = folder.all_content(EnumerationOptions::recursive(), None).unwrap();
    let link = items.iter().find(|i| i.name() == "link").unwrap();
    assert!(link.is_file());
    // Not followed: inside.txt shows up once, under real/.
    assert_eq!(items.iter().filter(|i| i.name() == "inside.txt").count(), 1);
}

#[test]
fn enumerating_a_missing_folder_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let missing = Folder::new(temp.child("missing").path()).unwrap();
    let err = missing.all_content(EnumerationOptions::default(), None).unwrap_err();
    assert!(matches!(err, LocationError::FileOrFolderDoesNotExist(_)));
}

#[cfg(target_os = "linux")]
#[test]
fn unreadable_subfolder_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    // root bypasses permission checks, so the scenario can't be built there.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("open/a.txt").write_str("a").unwrap();
    temp.child("locked/b.txt").write_str("b").unwrap();
    let locked = temp.child("locked");
    std::fs::set_permissions(locked.path(), std::fs::Permissions::from_mode(0o000)).unwrap();

    let folder = Folder::new(temp.path()).unwrap();
    let result = folder.all_content(EnumerationOptions::recursive(), None);

    std::fs::set_permissions(locked.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
    let n = names(&result.unwrap());
    assert!(n.contains("a.txt"));
    assert!(n.contains("locked"));
    assert!(!n.contains("b.txt"));
}

#[test]
fn is_empty_agrees_with_enumeration_on_hidden_entries() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".dotfile").write_str("d").unwrap();
    let folder = Folder::new(temp.path()).unwrap();

    assert!(folder.files().unwrap().is_empty());
    assert!(folder.is_empty(false).unwrap());
    assert!(!folder.is_empty(true).unwrap());
}

#[cfg(windows)]
#[test]
fn windows_hidden_attribute_hides_entries() {
    let temp = assert_fs::TempDir::new().unwrap();
    let secret = temp.child("secret.txt");
    secret.write_str("s").unwrap();
    let status = std::process::Command::new("attrib")
        .arg("+h")
        .arg(secret.path())
        .status()
        .unwrap();
    assert!(status.success());
    let folder = Folder::new(temp.path()).unwrap();

    assert!(folder.files().unwrap().is_empty());
    assert!(folder.is_empty(false).unwrap());
    assert!(!folder.is_empty(true).unwrap());
}
