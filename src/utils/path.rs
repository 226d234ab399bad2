//! Executable path resolution.
//!
//! Turns an argv[0]-style reference into the path of the file that should be
//! replaced during self-update:
//!
//! 1. A reference starting with `.` is taken relative to the working directory.
//! 2. A reference containing a separator (e.g. `/usr/local/bin/gitkit`) is
//!    checked directly.
//! 3. A bare name is looked up on `PATH` with [`which`].
//! 4. If the result is a symlink, it is replaced by the link's stored target.
//!    Only one hop is followed and the target is returned exactly as stored,
//!    so a relative target stays relative.

use anyhow::Result;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::core::GitkitError;
use crate::utils::fs::is_executable;

/// Lexically clean a path: drop `.` components, fold `name/..` pairs, and
/// drop `..` directly under the root. Never touches the file system.
///
/// An empty result becomes `.`.
///
/// ```rust
/// use gitkit::utils::clean_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(clean_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
/// assert_eq!(clean_path(Path::new("../x")), PathBuf::from("../x"));
/// assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
/// ```
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Resolve an argv[0]-style reference to the executable's path.
///
/// # Errors
///
/// [`GitkitError::PathResolutionError`] when the reference is empty, the
/// search-path lookup fails, or the resolved path's metadata cannot be read.
pub fn resolve_executable_path(reference: impl AsRef<OsStr>) -> Result<PathBuf> {
    let reference = Path::new(reference.as_ref());
    let shown = reference.display().to_string();
    let resolution_error = |reason: String| GitkitError::PathResolutionError {
        reference: shown.clone(),
        reason,
    };

    if reference.as_os_str().is_empty() {
        return Err(resolution_error("empty executable reference".to_string()).into());
    }

    let starts_with_dot = reference.as_os_str().as_encoded_bytes().first() == Some(&b'.');
    let mut name = if starts_with_dot {
        match std::env::current_dir() {
            Ok(cwd) => clean_path(&cwd.join(reference)),
            Err(e) => {
                tracing::debug!("Cannot read working directory ({}), using cleaned reference", e);
                clean_path(reference)
            }
        }
    } else {
        look_path(&clean_path(reference)).map_err(resolution_error)?
    };

    let metadata = std::fs::symlink_metadata(&name)
        .map_err(|e| resolution_error(format!("cannot stat {}: {e}", name.display())))?;

    if metadata.file_type().is_symlink() {
        let target = std::fs::read_link(&name).map_err(|e| {
            resolution_error(format!("cannot read symlink {}: {e}", name.display()))
        })?;
        tracing::debug!("Following symlink {} -> {}", name.display(), target.display());
        name = target;
    }

    tracing::debug!("Resolved '{}' to {}", shown, name.display());
    Ok(name)
}

/// Search-path lookup. Names containing a separator are checked in place.
fn look_path(name: &Path) -> std::result::Result<PathBuf, String> {
    let has_separator = name.components().count() > 1 || name.is_absolute();
    if !has_separator {
        return which::which(name).map_err(|e| format!("not found in PATH: {e}"));
    }

    let metadata = std::fs::metadata(name).map_err(|e| e.to_string())?;
    if metadata.is_dir() {
        return Err("is a directory".to_string());
    }
    if !is_executable(&metadata) {
        return Err("file is not executable".to_string());
    }
    Ok(name.to_path_buf())
}
