#![allow(deprecated)] // cargo_bin is deprecated but still functional

//! Exit codes and end-to-end behaviour of the `relink` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use relink_derived::{FilesystemBackend, LinkCollection};
use relink_primary::{PrimaryStore, ResourceRepo, SqliteStore};
use std::path::Path;
use time::{Duration, OffsetDateTime};

fn relink(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("relink").unwrap();
    cmd.env_clear()
        .current_dir(dir)
        .env("SHORT_LINK_BASE_URL", "https://s.example.com")
        .env("SHORT_LINK_PREFIX", "r");
    cmd
}

fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("relink.toml");
    std::fs::write(
        &path,
        format!(
            r#"
[primary]
type = "sqlite"
path = "{}"

[derived]
type = "filesystem"
path = "{}"

{extra}
"#,
            dir.join("primary.db").display(),
            dir.join("derived").display(),
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_no_tasks_exits_zero_without_io() {
    let dir = tempfile::tempdir().unwrap();
    relink(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("No tasks specified"));
    assert!(!dir.path().join("data").exists());
}

#[test]
fn test_missing_backdays_warns() {
    let dir = tempfile::tempdir().unwrap();
    relink(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("defaulting to 1"));
}

#[test]
fn test_invalid_task_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    relink(dir.path())
        .args(["-b", "3", "-t", "fixResources,fixPubmed"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid task: 'fixPubmed'"));
    assert!(!dir.path().join("data").exists());
}

#[test]
fn test_invalid_backdays_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    relink(dir.path())
        .args(["-b", "0", "-t", "fixResources"])
        .assert()
        .code(1);
    relink(dir.path())
        .args(["-b", "-4", "-t", "fixResources"])
        .assert()
        .code(1);
    relink(dir.path())
        .args(["-b", "many"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_short_link_env_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("relink")
        .unwrap()
        .env_clear()
        .current_dir(dir.path())
        .args(["-t", "fixResources"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("SHORT_LINK_BASE_URL"));
}

#[test]
fn test_trailing_slash_base_url_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    relink(dir.path())
        .env("SHORT_LINK_BASE_URL", "https://s.example.com/")
        .assert()
        .code(1);
}

#[test]
fn test_held_lock_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let lock = dir.path().join("relink.lock");
    std::fs::write(&lock, "pid 1 since earlier\n").unwrap();
    let config = write_config(
        dir.path(),
        &format!("[reconcile]\nlock_path = \"{}\"\n", lock.display()),
    );

    relink(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["-t", "fixResources"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is held by pid 1"));
    assert!(!dir.path().join("primary.db").exists());
    assert!(lock.exists());
}

#[test]
fn test_missing_primary_database_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");

    relink(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["-t", "fixResources"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("primary store unreachable"))
        .stderr(predicate::str::contains("primary database not found"));
    assert!(!dir.path().join("primary.db").exists());
}

#[tokio::test]
async fn test_fix_resources_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::create(dir.path().join("primary.db"), 5)
        .await
        .unwrap();
    store.migrate().await.unwrap();
    sqlx::query(
        "INSERT INTO resources (id, title, resource_url, short_url, active, is_primary, updated_at)
         VALUES (21, 'Twenty-one', 'https://resources.example.org/21', NULL, 1, 1, ?)",
    )
    .bind(OffsetDateTime::now_utc() - Duration::days(2))
    .execute(store.pool())
    .await
    .unwrap();
    let lock = dir.path().join("relink.lock");
    let config = write_config(
        dir.path(),
        &format!("[reconcile]\nlock_path = \"{}\"\n", lock.display()),
    );

    relink(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["-b", "3", "-t", "fixResources"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Task complete"));
    assert!(!lock.exists());

    let row = store.get_resource(21).await.unwrap().unwrap();
    assert_eq!(row.short_url.as_deref(), Some("https://s.example.com/r21"));
    let derived = FilesystemBackend::new(dir.path().join("derived"))
        .await
        .unwrap();
    let doc = derived.find_link("r21").await.unwrap().found().unwrap();
    assert_eq!(doc.title, "Twenty-one");
    assert!(doc.active);
}

#[tokio::test]
async fn test_dry_run_flag_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::create(dir.path().join("primary.db"), 5)
        .await
        .unwrap();
    store.migrate().await.unwrap();
    sqlx::query(
        "INSERT INTO resources (id, title, resource_url, short_url, active, is_primary, updated_at)
         VALUES (22, 'Twenty-two', 'https://resources.example.org/22', NULL, 1, 1, ?)",
    )
    .bind(OffsetDateTime::now_utc())
    .execute(store.pool())
    .await
    .unwrap();
    let config = write_config(dir.path(), "");

    relink(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["-t", "fixResources", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Dry run"));

    let row = store.get_resource(22).await.unwrap().unwrap();
    assert_eq!(row.short_url, None);
    let derived = FilesystemBackend::new(dir.path().join("derived"))
        .await
        .unwrap();
    assert!(!derived.find_link("r22").await.unwrap().is_found());
}
