//! `self-update` runs against a copy of the built binary, never the original.

use assert_cmd::Command;
use gitkit::config::GlobalConfig;
use gitkit::test_utils::archives::single_file_tar_gz;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct UpdateFixture {
    _root: TempDir,
    bin_dir: PathBuf,
    temp_dir: PathBuf,
    config_path: PathBuf,
}

impl UpdateFixture {
    async fn new(update_url: Option<String>) -> Self {
        let root = TempDir::new().unwrap();
        let base = root.path().canonicalize().unwrap();
        let bin_dir = base.join("bin");
        let temp_dir = base.join("tmp");
        std::fs::create_dir_all(&bin_dir).unwrap();
        std::fs::create_dir_all(&temp_dir).unwrap();

        std::fs::copy(env!("CARGO_BIN_EXE_gitkit"), bin_dir.join("gitkit")).unwrap();

        let config = GlobalConfig {
            temp_dir: Some(temp_dir.clone()),
            update_url,
            ..GlobalConfig::default()
        };
        let config_path = base.join("config.toml");
        config.save_to(&config_path).await.unwrap();

        Self {
            _root: root,
            bin_dir,
            temp_dir,
            config_path,
        }
    }

    fn binary(&self) -> PathBuf {
        self.bin_dir.join("gitkit")
    }

    fn backup(&self) -> PathBuf {
        self.bin_dir.join("gitkit.backup")
    }

    /// The copied binary, invoked by absolute path so argv[0] names the copy.
    fn command(&self) -> Command {
        let mut cmd = Command::new(self.binary());
        cmd.env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(&self.config_path);
        cmd
    }

    fn leftover_temp_files(&self) -> usize {
        std::fs::read_dir(&self.temp_dir).unwrap().count()
    }
}

async fn serve_archive(server: &MockServer, route: &str, payload: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(single_file_tar_gz("gitkit", payload).unwrap()),
        )
        .mount(server)
        .await;
}

async fn run(mut cmd: Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap()).await.unwrap()
}

fn read(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_self_update_replaces_binary_and_keeps_backup() {
    let fixture = UpdateFixture::new(None).await;
    let original = read(&fixture.binary());

    let server = MockServer::start().await;
    serve_archive(&server, "/gitkit.tar.gz", b"#!/bin/sh\necho updated\n").await;

    let mut cmd = fixture.command();
    cmd.args(["self-update", &format!("{}/gitkit.tar.gz", server.uri())]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(read(&fixture.binary()), b"#!/bin/sh\necho updated\n");
    assert_eq!(read(&fixture.backup()), original);
    assert_eq!(fixture.leftover_temp_files(), 0);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(fixture.binary()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_self_update_uses_configured_url() {
    let server = MockServer::start().await;
    serve_archive(&server, "/configured.tar.gz", b"configured").await;

    let fixture = UpdateFixture::new(Some(format!("{}/configured.tar.gz", server.uri()))).await;

    let mut cmd = fixture.command();
    cmd.args(["self-update", "--no-backup"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(read(&fixture.binary()), b"configured");
    assert!(!fixture.backup().exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_self_update_http_error_leaves_binary_intact() {
    let fixture = UpdateFixture::new(None).await;
    let original = read(&fixture.binary());

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut cmd = fixture.command();
    cmd.args(["self-update", &format!("{}/missing.tar.gz", server.uri())]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("HTTP status 404").eval(&stderr), "{stderr}");
    assert_eq!(read(&fixture.binary()), original);
    assert_eq!(fixture.leftover_temp_files(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_self_update_without_url_fails() {
    let fixture = UpdateFixture::new(None).await;

    let mut cmd = fixture.command();
    cmd.arg("self-update");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no update URL given"), "{stderr}");
    assert!(stderr.contains("update_url"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rollback_restores_previous_binary() {
    let fixture = UpdateFixture::new(None).await;
    let original = read(&fixture.binary());

    // Trailing bytes after an executable image are ignored by the loader,
    // so the "new version" still runs and can roll itself back
    let mut next = original.clone();
    next.extend_from_slice(b"gitkit-next-version");

    let server = MockServer::start().await;
    serve_archive(&server, "/next.tar.gz", &next).await;

    let mut update = fixture.command();
    update.args(["self-update", &format!("{}/next.tar.gz", server.uri())]);
    let output = run(update).await;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(read(&fixture.binary()), next);

    let mut rollback = fixture.command();
    rollback.args(["self-update", "--rollback"]);
    let output = run(rollback).await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(read(&fixture.binary()), original);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rollback_without_backup_fails() {
    let fixture = UpdateFixture::new(None).await;

    let mut cmd = fixture.command();
    cmd.args(["self-update", "--rollback"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no backup found"), "{stderr}");
}
