//! Transient storage for documents awaiting conversion.
//!
//! The converter reads from a file path, so each request writes its bytes to
//! a uniquely named [`TransientFile`]. The file exists only once the value
//! exists: if staging fails there is nothing to delete.
//!
//! Removal happens in [`TransientFile::discard`] on the normal path and in
//! `Drop` otherwise (early return, panic, or the request future being
//! dropped). Either way a failed removal is logged at debug level and never
//! reported to the caller.

use crate::error::ConvertError;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// A request-owned temporary file holding one document.
#[derive(Debug)]
pub struct TransientFile {
    file: NamedTempFile,
}

impl TransientFile {
    /// Write `bytes` to a new file ending in `suffix` (e.g. `".pdf"`, or `""`).
    ///
    /// The file is created in `dir`, or the system temp directory when `None`.
    pub async fn create(
        bytes: &[u8],
        suffix: &str,
        dir: Option<&Path>,
    ) -> Result<Self, ConvertError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("docling-gateway-").suffix(suffix);
        let file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| ConvertError::Io {
            path: dir.map_or_else(std::env::temp_dir, Path::to_path_buf),
            source: e,
        })?;

        // From here on `file` removes itself if anything fails.
        tokio::fs::write(file.path(), bytes)
            .await
            .map_err(|e| ConvertError::Io {
                path: file.path().to_path_buf(),
                source: e,
            })?;

        debug!(
            "Staged {} bytes at {}",
            bytes.len(),
            file.path().display()
        );
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now. Errors are swallowed.
    pub fn discard(self) {
        let path = self.file.path().to_path_buf();
        match self.file.close() {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) => debug!("Ignoring failure to remove {}: {e}", path.display()),
        }
    }
}
