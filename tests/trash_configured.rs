//! `Location::trash` honours the installed configuration's trash root.

use assert_fs::prelude::*;
use fs_location::config::{self, Config};
use fs_location::prelude::*;

#[test]
fn trash_uses_configured_root() -> Result<(), Box<dyn std::error::Error>> {
    let temp = assert_fs::TempDir::new()?;
    let cfg = Config {
        trash_dir: Some(temp.child("MyTrash").path().to_path_buf()),
        ..Config::default()
    };
    config::install(cfg).expect("configuration installed before first use");

    temp.child("old.log").write_str("log")?;
    let f = File::new(temp.child("old.log").path())?;
    let trashed = f.trash()?;

    assert!(!f.exists());
    assert_eq!(trashed.path(), temp.child("MyTrash/files/old.log").path());
    assert!(temp.child("MyTrash/info/old.log.trashinfo").path().is_file());
    Ok(())
}
