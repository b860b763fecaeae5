//! Scratch-file handling for uploads.
//!
//! Format loaders read from disk, so every upload is written to a private file first. The file
//! name is random and carries only the validated extension; the client-supplied filename never
//! reaches a path. Removal is tied to `Drop`, so the file disappears on every exit path of the
//! request, including early returns and panics in the caller.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::documents::DocumentFormat;

const SCRATCH_PREFIX: &str = "upload-";

/// An upload persisted to a uniquely named scratch file, deleted on drop.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Write `bytes` to a new scratch file inside `dir`.
    pub fn persist(dir: &Path, format: DocumentFormat, bytes: &[u8]) -> std::io::Result<Self> {
        let suffix = format!(".{}", format.extension());
        let mut file = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        tracing::debug!(path = %file.path().display(), bytes = bytes.len(), "Upload staged");
        Ok(Self { file })
    }

    /// Location of the scratch file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
