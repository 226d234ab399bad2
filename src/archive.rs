//! Single-payload extraction from `.tar.gz` archives.
//!
//! Release archives carry exactly one file. [`ArchiveExtractor::extract`]
//! walks the tar stream in order, skips directory entries, and appends every
//! other entry's bytes to one output [`TempFile`]. An archive with several
//! files therefore yields their concatenation; producing single-file archives
//! is the release pipeline's job.

use anyhow::Result;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tar::Archive;
use tracing::debug;

use crate::config::TempConfig;
use crate::core::GitkitError;
use crate::utils::fs::TempFile;

/// Extracts the payload of gzip-compressed tar archives into temp files.
#[derive(Debug, Clone, Default)]
pub struct ArchiveExtractor {
    temp: TempConfig,
}

impl ArchiveExtractor {
    /// Extractor writing into temp files described by `temp`.
    pub const fn new(temp: TempConfig) -> Self {
        Self {
            temp,
        }
    }

    /// Decompress `archive_path` and copy all non-directory entries into a new temp file.
    ///
    /// An archive with no file entries succeeds with an empty output.
    ///
    /// # Errors
    ///
    /// [`GitkitError::ArchiveError`] if the archive cannot be opened, the gzip
    /// or tar data is malformed, or copying fails. The partial output is
    /// removed.
    pub fn extract(&self, archive_path: &Path) -> Result<TempFile> {
        let output = TempFile::create(&self.temp)?;
        let archive_error = |reason: String| GitkitError::ArchiveError {
            path: archive_path.display().to_string(),
            reason,
        };

        let file = File::open(archive_path)
            .map_err(|e| archive_error(format!("cannot open archive: {e}")))?;
        let mut out = output.open_write()?;

        let (entries, bytes) =
            copy_payload(file, &mut out).map_err(|e| archive_error(e.to_string()))?;
        out.flush().map_err(|e| archive_error(e.to_string()))?;
        drop(out);

        debug!(
            "Extracted {} entr{} ({} bytes) from {} to {}",
            entries,
            if entries == 1 { "y" } else { "ies" },
            bytes,
            archive_path.display(),
            output.path().display()
        );
        Ok(output)
    }
}

/// Stream every non-directory entry of the gzipped tar `reader` into `out`.
///
/// Returns the number of entries copied and the total bytes written.
fn copy_payload(reader: impl io::Read, out: &mut impl Write) -> io::Result<(usize, u64)> {
    let mut archive = Archive::new(GzDecoder::new(reader));
    let mut copied = 0usize;
    let mut bytes = 0u64;

    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            debug!("Skipping directory entry {}", entry.path()?.display());
            continue;
        }

        debug!("Copying entry {} ({:?})", entry.path()?.display(), entry_type);
        bytes += io::copy(&mut entry, out)?;
        copied += 1;
    }

    Ok((copied, bytes))
}
