//! Temporary file management for streamed input.
//!
//! Streamed input (stdin) has to become a real path before ffmpeg can seek
//! in it; [`SpooledInput`] copies the bytes into a tempfile-managed file
//! that cleans itself up via Drop, including on error paths.

use crate::error::CoreResult;
use std::io::Read;
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, NamedTempFile};

/// Streamed input spooled into a self-deleting temporary file.
///
/// The file lives in the system temp directory and is removed when the
/// value drops, so the caller's scope bounds the resource.
pub struct SpooledInput {
    file: NamedTempFile,
}

impl SpooledInput {
    /// Drains `reader` into a fresh temporary file named
    /// `<prefix>_*.<extension>`.
    pub fn from_reader(reader: &mut impl Read, prefix: &str, extension: &str) -> CoreResult<Self> {
        let mut file = TempFileBuilder::new()
            .prefix(&format!("{prefix}_"))
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        std::io::copy(reader, file.as_file_mut())?;
        Ok(Self { file })
    }

    /// Path of the backing file, valid until the value drops.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_spool_writes_all_bytes() {
        let payload = b"not really a video, but bytes all the same".to_vec();
        let mut reader = Cursor::new(payload.clone());

        let spooled = SpooledInput::from_reader(&mut reader, "stdin", "mp4").unwrap();
        let written = std::fs::read(spooled.path()).unwrap();
        assert_eq!(written, payload);
    }

    #[test]
    fn test_spool_naming() {
        let mut reader = Cursor::new(b"abc".to_vec());
        let spooled = SpooledInput::from_reader(&mut reader, "spool", "mp4").unwrap();

        let name = spooled
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert!(name.starts_with("spool_"));
        assert!(name.ends_with(".mp4"));
        assert!(spooled.path().exists());
    }

    #[test]
    fn test_spooled_file_removed_on_drop() {
        let mut reader = Cursor::new(b"abc".to_vec());
        let path = {
            let spooled = SpooledInput::from_reader(&mut reader, "stdin", "avi").unwrap();
            spooled.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
