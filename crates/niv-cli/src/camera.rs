//! A camera backed by a JPEG file on disk.
//!
//! Terminals have no video device API, so an external capture tool keeps the
//! latest frame at a known path and each grab reads it. A missing or
//! unreadable path is treated like denied camera permission.

use std::{fs, path::PathBuf};

use niv_core::{
  Error, Result,
  scanner::{Camera, CameraStream, Facing},
};
use tracing::debug;

const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

#[derive(Debug, Clone)]
pub struct FileCamera {
  path: PathBuf,
}

impl FileCamera {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &PathBuf { &self.path }
}

/// Holds the frame path while the scanner owns the "stream".
#[derive(Debug)]
pub struct FileStream {
  path: PathBuf,
}

impl Camera for FileCamera {
  type Stream = FileStream;

  fn open(&self, facing: Facing) -> Result<FileStream> {
    debug!(?facing, path = %self.path.display(), "opening frame source");
    match fs::metadata(&self.path) {
      Ok(meta) if meta.is_file() => Ok(FileStream {
        path: self.path.clone(),
      }),
      Ok(_) => Err(Error::CameraUnavailable(format!(
        "{} is not a file",
        self.path.display()
      ))),
      Err(e) => Err(Error::CameraUnavailable(format!(
        "{}: {e}",
        self.path.display()
      ))),
    }
  }
}

impl CameraStream for FileStream {
  fn grab_jpeg(&mut self) -> Result<Vec<u8>> {
    let bytes = fs::read(&self.path)
      .map_err(|e| Error::FrameCapture(format!("{}: {e}", self.path.display())))?;
    if !bytes.starts_with(&JPEG_MAGIC) {
      return Err(Error::FrameCapture(format!(
        "{} is not a JPEG image",
        self.path.display()
      )));
    }
    Ok(bytes)
  }
}
