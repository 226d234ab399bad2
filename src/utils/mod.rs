//! Cross-platform utilities: file system helpers and executable path resolution.

pub mod fs;
pub mod path;

pub use fs::{TempFile, is_executable, path_exists};
pub use path::{clean_path, resolve_executable_path};
