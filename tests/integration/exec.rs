use predicates::prelude::*;
use tempfile::TempDir;

use super::gitkit;

#[cfg(unix)]
#[test]
fn test_exec_prints_trimmed_stdout() {
    gitkit().args(["exec", "printf", "hello\\n\\n"]).assert().success().stdout("hello\n");
}

#[cfg(unix)]
#[test]
fn test_exec_keeps_argument_with_spaces_intact() {
    gitkit()
        .args(["exec", "printf", "[%s]", "a b", "c"])
        .assert()
        .success()
        .stdout("[a b][c]\n");
}

#[cfg(unix)]
#[test]
fn test_exec_runs_in_dir() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().canonicalize().unwrap();

    gitkit()
        .args(["exec", "--dir"])
        .arg(&dir)
        .arg("pwd")
        .assert()
        .success()
        .stdout(format!("{}\n", dir.display()));
}

#[cfg(unix)]
#[test]
fn test_exec_failure_reports_stderr() {
    gitkit()
        .args(["exec", "sh", "-c", "echo out; echo broken >&2; exit 4"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Command failed: sh -c"))
        .stderr(predicate::str::contains("broken"));
}

#[test]
fn test_exec_unknown_program() {
    gitkit()
        .args(["exec", "gitkit-no-such-program"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not installed or not found in PATH"));
}

#[cfg(unix)]
#[test]
fn test_exec_timeout() {
    gitkit()
        .args(["exec", "--timeout", "1", "sleep", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timed out"));
}
