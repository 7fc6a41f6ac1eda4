//! Integration tests for locating and loading `.env` definitions.

use envboot::Error;
use envboot::env::{Definitions, EnvLoader, EnvSource, LayeredEnv, Precedence};
use serial_test::serial;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn set(key: &str, value: &str) {
    unsafe {
        std::env::set_var(key, value);
    }
}

fn unset(keys: &[&str]) {
    for key in keys {
        unsafe {
            std::env::remove_var(key);
        }
    }
}

#[test]
#[serial]
fn missing_file_is_a_no_op() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let report = EnvLoader::from_path(dir.path().join(".env")).load()?;

    assert!(!report.loaded());
    assert!(report.applied.is_empty());
    assert!(report.kept.is_empty());
    Ok(())
}

#[test]
#[serial]
fn load_applies_definitions_to_process() -> anyhow::Result<()> {
    unset(&["ENVBOOT_LOAD_A", "ENVBOOT_LOAD_B"]);
    let dir = TempDir::new()?;
    let path = dir.path().join(".env");
    fs::write(&path, "# comment\nENVBOOT_LOAD_A=alpha\n\nENVBOOT_LOAD_B='beta gamma'\n")?;

    let report = EnvLoader::from_path(&path).load()?;

    assert_eq!(report.path.as_deref(), Some(path.as_path()));
    assert_eq!(report.applied, vec!["ENVBOOT_LOAD_A", "ENVBOOT_LOAD_B"]);
    assert_eq!(std::env::var("ENVBOOT_LOAD_A")?, "alpha");
    assert_eq!(std::env::var("ENVBOOT_LOAD_B")?, "beta gamma");

    unset(&["ENVBOOT_LOAD_A", "ENVBOOT_LOAD_B"]);
    Ok(())
}

#[test]
#[serial]
fn ambient_environment_wins_by_default() -> anyhow::Result<()> {
    set("ENVBOOT_PRECEDENCE", "ambient");
    let dir = TempDir::new()?;
    let path = dir.path().join(".env");
    fs::write(&path, "ENVBOOT_PRECEDENCE=file\n")?;

    let report = EnvLoader::from_path(&path).load()?;

    assert_eq!(report.kept, vec!["ENVBOOT_PRECEDENCE"]);
    assert!(report.applied.is_empty());
    assert_eq!(std::env::var("ENVBOOT_PRECEDENCE")?, "ambient");

    unset(&["ENVBOOT_PRECEDENCE"]);
    Ok(())
}

#[test]
#[serial]
fn file_precedence_overrides_environment() -> anyhow::Result<()> {
    set("ENVBOOT_PRECEDENCE", "ambient");
    let dir = TempDir::new()?;
    let path = dir.path().join(".env");
    fs::write(&path, "ENVBOOT_PRECEDENCE=file\n")?;

    let report = EnvLoader::from_path(&path)
        .precedence(Precedence::File)
        .load()?;

    assert_eq!(report.applied, vec!["ENVBOOT_PRECEDENCE"]);
    assert_eq!(std::env::var("ENVBOOT_PRECEDENCE")?, "file");

    unset(&["ENVBOOT_PRECEDENCE"]);
    Ok(())
}

#[test]
#[serial]
fn duplicate_keys_take_last_value() -> anyhow::Result<()> {
    unset(&["ENVBOOT_DUP"]);
    let dir = TempDir::new()?;
    let path = dir.path().join(".env");
    fs::write(&path, "ENVBOOT_DUP=first\nENVBOOT_DUP=second\n")?;

    let report = EnvLoader::from_path(&path).load()?;

    assert_eq!(report.applied, vec!["ENVBOOT_DUP"]);
    assert_eq!(std::env::var("ENVBOOT_DUP")?, "second");

    unset(&["ENVBOOT_DUP"]);
    Ok(())
}

#[test]
#[serial]
fn malformed_lines_are_skipped() -> anyhow::Result<()> {
    unset(&["ENVBOOT_BEFORE", "ENVBOOT_AFTER"]);
    let dir = TempDir::new()?;
    let path = dir.path().join(".env");
    fs::write(&path, "ENVBOOT_BEFORE=1\nnot valid at all\nENVBOOT_AFTER=2\n")?;

    let report = EnvLoader::from_path(&path).load()?;

    assert_eq!(report.skipped_lines, 1);
    assert_eq!(std::env::var("ENVBOOT_BEFORE")?, "1");
    assert_eq!(std::env::var("ENVBOOT_AFTER")?, "2");

    unset(&["ENVBOOT_BEFORE", "ENVBOOT_AFTER"]);
    Ok(())
}

#[test]
fn unreadable_definitions_path_is_an_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    // A directory opens on unix but fails on read.
    let path = dir.path().join(".env");
    fs::create_dir(&path)?;

    let err = Definitions::read(&path).unwrap_err();
    assert!(matches!(err, Error::Definitions { path: ref p, .. } if *p == path));
    Ok(())
}

#[test]
fn locate_walks_up_to_parent_directories() -> anyhow::Result<()> {
    let root = TempDir::new()?;
    let nested = root.path().join("service").join("src");
    fs::create_dir_all(&nested)?;
    fs::write(root.path().join(".env"), "ENVBOOT_FOUND=yes\n")?;

    let found = EnvLoader::new().search_from(&nested).locate()?;
    assert_eq!(found, Some(root.path().join(".env")));
    Ok(())
}

#[test]
fn locate_prefers_nearest_file() -> anyhow::Result<()> {
    let root = TempDir::new()?;
    let nested = root.path().join("app");
    fs::create_dir_all(&nested)?;
    fs::write(root.path().join(".env"), "X=outer\n")?;
    fs::write(nested.join(".env"), "X=inner\n")?;

    let found = EnvLoader::new().search_from(&nested).locate()?;
    assert_eq!(found, Some(nested.join(".env")));
    Ok(())
}

#[test]
fn locate_honors_custom_filename() -> anyhow::Result<()> {
    let root = TempDir::new()?;
    fs::write(root.path().join(".env"), "X=default\n")?;
    fs::write(root.path().join("local.env"), "X=custom\n")?;

    let found = EnvLoader::new()
        .filename("local.env")
        .search_from(root.path())
        .locate()?;
    assert_eq!(found, Some(root.path().join("local.env")));
    Ok(())
}

#[test]
#[serial]
fn layered_lookup_does_not_touch_process_env() -> anyhow::Result<()> {
    unset(&["ENVBOOT_LAYERED"]);
    let dir = TempDir::new()?;
    let path = dir.path().join(".env");
    fs::write(&path, "ENVBOOT_LAYERED=from-file\n")?;

    let layered = EnvLoader::from_path(&path).layered()?;

    assert_eq!(layered.var("ENVBOOT_LAYERED").as_deref(), Some("from-file"));
    assert!(std::env::var_os("ENVBOOT_LAYERED").is_none());
    Ok(())
}

#[test]
fn layered_lookup_follows_precedence() -> anyhow::Result<()> {
    let definitions = Definitions::from_reader("SHARED=file\nFILE_ONLY=f\n".as_bytes())?;
    let ambient: HashMap<String, String> = [
        ("SHARED".to_string(), "ambient".to_string()),
        ("AMBIENT_ONLY".to_string(), "a".to_string()),
    ]
    .into_iter()
    .collect();

    let ambient_first = LayeredEnv::new(&ambient, definitions.clone(), Precedence::Ambient);
    assert_eq!(ambient_first.var("SHARED").as_deref(), Some("ambient"));
    assert_eq!(ambient_first.var("FILE_ONLY").as_deref(), Some("f"));
    assert_eq!(ambient_first.var("AMBIENT_ONLY").as_deref(), Some("a"));
    assert_eq!(ambient_first.var("NEITHER"), None);

    let file_first = LayeredEnv::new(&ambient, definitions, Precedence::File);
    assert_eq!(file_first.var("SHARED").as_deref(), Some("file"));
    assert_eq!(file_first.var("AMBIENT_ONLY").as_deref(), Some("a"));
    Ok(())
}

#[cfg(unix)]
#[test]
#[serial]
fn non_unicode_ambient_value_shadows_file_in_both_paths() -> anyhow::Result<()> {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt as _;

    let key = "ENVBOOT_NON_UNICODE";
    unsafe {
        std::env::set_var(key, OsString::from_vec(vec![0x66, 0xff]));
    }
    let dir = TempDir::new()?;
    let path = dir.path().join(".env");
    fs::write(&path, format!("{key}=fromfile\n"))?;

    let layered = EnvLoader::from_path(&path).layered()?;
    assert!(layered.contains(key));
    assert_eq!(layered.var(key), None);

    let report = EnvLoader::from_path(&path).load()?;
    assert_eq!(report.kept, vec![key]);
    assert_eq!(envboot::env::ProcessEnv.var(key), None);

    unset(&[key]);
    Ok(())
}
