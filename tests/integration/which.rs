use predicates::prelude::*;
use tempfile::TempDir;

use super::gitkit;

#[cfg(unix)]
#[test]
fn test_which_dot_relative_is_absolute() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let dir = temp.path().canonicalize().unwrap();
    let tool = dir.join("tool");
    std::fs::write(&tool, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    gitkit()
        .args(["which", "./tool"])
        .current_dir(&dir)
        .assert()
        .success()
        .stdout(format!("{}\n", tool.display()));
}

#[cfg(unix)]
#[test]
fn test_which_follows_one_symlink_hop() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let real = temp.path().join("real");
    std::fs::write(&real, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&real, std::fs::Permissions::from_mode(0o755)).unwrap();
    let link = temp.path().join("link");
    std::os::unix::fs::symlink("real", &link).unwrap();

    gitkit().arg("which").arg(&link).assert().success().stdout("real\n");
}

#[test]
fn test_which_unknown_name_fails() {
    gitkit()
        .args(["which", "gitkit-no-such-program"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot resolve executable path"));
}
