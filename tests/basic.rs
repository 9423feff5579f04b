use std::fs;
use std::path::Path;

use anyhow::Result;
use envstore::env::{self, EnvError, LoadMode, StoreOptions, VarStore};
use pretty_assertions::assert_eq;
use serial_test::serial;
use tempfile::tempdir;

fn write_file(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    fs::write(path, contents)?;
    Ok(())
}

fn store_with_defaults(dir: &Path) -> Result<VarStore> {
    write_file(
        dir.join(".env"),
        "DB_HOST=localhost\nDB_USER=root\nDB_PASS=secret",
    )?;
    let mut store = VarStore::new();
    store.load(dir)?;
    Ok(store)
}

#[test]
fn load_exposes_file_values() -> Result<()> {
    let temp = tempdir()?;
    let store = store_with_defaults(temp.path())?;

    assert_eq!(store.get("DB_HOST"), Some("localhost"));
    assert_eq!(store.get("DB_USER"), Some("root"));
    assert_eq!(store.get("DB_PASS"), Some("secret"));
    Ok(())
}

#[test]
fn get_with_default_value() -> Result<()> {
    let temp = tempdir()?;
    let store = store_with_defaults(temp.path())?;

    assert_eq!(
        store.get_or("NON_EXISTENT_KEY", "default_value"),
        "default_value"
    );
    Ok(())
}

#[test]
fn set_and_get() -> Result<()> {
    let temp = tempdir()?;
    let mut store = store_with_defaults(temp.path())?;

    store.set("NEW_KEY", "new_value");
    assert_eq!(store.get("NEW_KEY"), Some("new_value"));
    assert!(store.has("NEW_KEY"));
    Ok(())
}

#[test]
fn has_single_and_many() -> Result<()> {
    let temp = tempdir()?;
    let store = store_with_defaults(temp.path())?;

    assert!(store.has("DB_HOST"));
    assert!(!store.has("NON_EXISTENT_KEY"));
    assert!(store.has_all(["DB_USER", "DB_HOST"]));
    assert!(!store.has_all(["NON_EXISTENT_KEY", "DB_HOST"]));
    Ok(())
}

#[test]
fn missing_env_file_is_reported_with_path() -> Result<()> {
    let temp = tempdir()?;
    let mut store = VarStore::new();

    match store.load(temp.path()) {
        Err(EnvError::FileNotFound { path }) => assert_eq!(path, temp.path().join(".env")),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
    assert_eq!(store.len(), 0);
    Ok(())
}

#[test]
fn loading_twice_keeps_values() -> Result<()> {
    let temp = tempdir()?;
    let mut store = store_with_defaults(temp.path())?;

    write_file(temp.path().join(".env"), "DB_HOST=elsewhere\nDB_PORT=5432\n")?;
    let report = store.load(temp.path())?;

    assert_eq!(store.get("DB_HOST"), Some("localhost"));
    assert_eq!(store.get("DB_PORT"), Some("5432"));
    assert_eq!(report.loaded, vec!["DB_PORT"]);
    assert_eq!(report.preserved, vec!["DB_HOST"]);
    Ok(())
}

#[test]
fn quoted_and_exported_values_are_parsed() -> Result<()> {
    let temp = tempdir()?;
    write_file(
        temp.path().join(".env"),
        "# database\nexport DB_NAME=app\nGREETING=\"hello world\"\nSINGLE='raw $value'\n",
    )?;

    let mut store = VarStore::new();
    store.load(temp.path())?;

    assert_eq!(store.get("DB_NAME"), Some("app"));
    assert_eq!(store.get("GREETING"), Some("hello world"));
    assert_eq!(store.get("SINGLE"), Some("raw $value"));
    Ok(())
}

#[test]
fn strict_and_tolerant_modes_differ_on_broken_files() -> Result<()> {
    let temp = tempdir()?;
    write_file(temp.path().join(".env"), "OK=1\nbroken line\n")?;

    let mut strict =
        VarStore::with_options(StoreOptions::isolated().with_mode(LoadMode::Strict));
    let err = strict.load(temp.path()).unwrap_err();
    assert!(matches!(err, EnvError::Parse { .. }));
    assert!(!err.is_fatal());
    assert!(strict.is_empty());

    let mut tolerant = VarStore::new();
    let report = tolerant.load(temp.path())?;
    assert_eq!(tolerant.get("OK"), Some("1"));
    assert_eq!(report.malformed, 1);
    Ok(())
}

#[test]
fn unresolvable_path_is_fatal() -> Result<()> {
    let temp = tempdir()?;
    let file = temp.path().join("not-a-directory");
    write_file(&file, "")?;

    let err = VarStore::new().load(&file).unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, EnvError::PathResolution { .. }));
    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_env_file_is_fatal() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir()?;
    let env_file = temp.path().join(".env");
    write_file(&env_file, "SECRET=1\n")?;
    fs::set_permissions(&env_file, fs::Permissions::from_mode(0o000))?;
    // root ignores file modes
    if fs::read(&env_file).is_ok() {
        return Ok(());
    }

    let mut store = VarStore::new();
    let err = store.load(temp.path()).unwrap_err();
    assert!(matches!(err, EnvError::PathResolution { .. }));
    assert!(err.is_fatal());
    assert!(store.is_empty());
    Ok(())
}

#[test]
fn strict_parse_error_names_the_line() -> Result<()> {
    let temp = tempdir()?;
    write_file(temp.path().join(".env"), "A=1\nB=2\nC=3\nD=4\nbroken line\n")?;

    let mut store =
        VarStore::with_options(StoreOptions::isolated().with_mode(LoadMode::Strict));
    match store.load(temp.path()) {
        Err(EnvError::Parse { line, .. }) => assert_eq!(line, 5),
        other => panic!("expected Parse, got {other:?}"),
    }
    Ok(())
}

#[test]
#[serial]
fn global_facade_loads_into_process_environment() -> Result<()> {
    let temp = tempdir()?;
    write_file(
        temp.path().join(".env"),
        "ENVSTORE_IT_HOST=localhost\nENVSTORE_IT_EMPTY=\n",
    )?;

    env::load(temp.path())?;

    assert_eq!(env::get("ENVSTORE_IT_HOST").as_deref(), Some("localhost"));
    assert!(env::has("ENVSTORE_IT_EMPTY"));
    assert_eq!(std::env::var("ENVSTORE_IT_HOST")?, "localhost");

    env::set("ENVSTORE_IT_HOST", "changed");
    assert_eq!(env::get_or("ENVSTORE_IT_HOST", "unused"), "changed");
    assert_eq!(std::env::var("ENVSTORE_IT_HOST")?, "changed");

    let mut store = env::global().lock().unwrap();
    store.remove("ENVSTORE_IT_HOST");
    store.remove("ENVSTORE_IT_EMPTY");
    Ok(())
}
