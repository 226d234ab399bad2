use anyhow::Result;
use gitkit::test_utils::TestGit;
use predicates::prelude::*;
use tempfile::TempDir;

use super::gitkit;

fn fixture_repo() -> Result<(TempDir, std::path::PathBuf)> {
    let temp = TempDir::new()?;
    let repo = temp.path().canonicalize()?.join("repo");
    std::fs::create_dir_all(repo.join("src/nested"))?;
    TestGit::new(&repo).init_with_commit()?;
    Ok((temp, repo))
}

#[test]
fn test_root_from_nested_directory() -> Result<()> {
    let (_temp, repo) = fixture_repo()?;

    let output = gitkit().arg("root").current_dir(repo.join("src/nested")).output()?;
    assert!(output.status.success());

    let printed = String::from_utf8(output.stdout)?;
    assert_eq!(std::path::Path::new(printed.trim_end()).canonicalize()?, repo);
    Ok(())
}

#[test]
fn test_root_with_dir_flag() -> Result<()> {
    let (_temp, repo) = fixture_repo()?;
    let elsewhere = TempDir::new()?;

    let output = gitkit()
        .args(["root", "-C"])
        .arg(repo.join("src"))
        .current_dir(elsewhere.path())
        .output()?;
    assert!(output.status.success());

    let printed = String::from_utf8(output.stdout)?;
    assert_eq!(std::path::Path::new(printed.trim_end()).canonicalize()?, repo);
    Ok(())
}

#[test]
fn test_git_dir_at_top_level() -> Result<()> {
    let (_temp, repo) = fixture_repo()?;

    gitkit().arg("git-dir").current_dir(&repo).assert().success().stdout(".git\n");
    Ok(())
}

#[test]
fn test_git_dir_absolute() -> Result<()> {
    let (_temp, repo) = fixture_repo()?;

    let output = gitkit().args(["git-dir", "--absolute"]).current_dir(&repo).output()?;
    assert!(output.status.success());

    let printed = String::from_utf8(output.stdout)?;
    assert_eq!(std::path::Path::new(printed.trim_end()).canonicalize()?, repo.join(".git"));
    Ok(())
}

#[test]
fn test_root_outside_repository_fails() -> Result<()> {
    let temp = TempDir::new()?;

    gitkit()
        .arg("root")
        .current_dir(temp.path())
        // Stop git from discovering a repository above the temp dir
        .env("GIT_CEILING_DIRECTORIES", temp.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Command failed: git rev-parse --show-toplevel"))
        .stderr(predicate::str::contains("inside a git working tree"));
    Ok(())
}
