//! In-memory `.tar.gz` fixture builders.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{Builder, EntryType, Header};

/// One entry of a fixture archive.
pub enum Entry<'a> {
    /// A regular file with content.
    File(&'a str, &'a [u8]),
    /// A directory.
    Dir(&'a str),
}

/// Build a gzip-compressed tar containing `entries`, in order.
pub fn tar_gz(entries: &[Entry<'_>]) -> Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);

    for entry in entries {
        let mut header = Header::new_gnu();
        match entry {
            Entry::File(name, data) => {
                header.set_entry_type(EntryType::Regular);
                header.set_size(data.len() as u64);
                header.set_mode(0o755);
                header.set_cksum();
                builder.append_data(&mut header, name, *data)?;
            }
            Entry::Dir(name) => {
                header.set_entry_type(EntryType::Directory);
                header.set_size(0);
                header.set_mode(0o755);
                header.set_cksum();
                builder.append_data(&mut header, name, std::io::empty())?;
            }
        }
    }

    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

/// Convenience for the usual single-payload release archive.
pub fn single_file_tar_gz(name: &str, data: &[u8]) -> Result<Vec<u8>> {
    tar_gz(&[Entry::File(name, data)])
}
