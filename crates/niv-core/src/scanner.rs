//! Product scanner: camera stream ownership and the scan state machine.
//!
//! Transitions:
//!
//! - `Idle` → `Capturing` when the camera opens; a failed open stays `Idle`.
//! - `Capturing` → `Analyzing` once a frame is grabbed.
//! - `Analyzing` → `ResultShown` on success, or back to `Idle` on failure.
//! - `ResultShown` → `Idle` on retry.
//!
//! The open camera stream is an owned value held by the [`Scanner`]. Releasing
//! it means dropping it, which happens on analysis completion, on
//! [`Scanner::leave`], and when the scanner itself is dropped. At most one
//! stream is ever held.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::Result;

// ─── Camera seam ─────────────────────────────────────────────────────────────

/// Which camera to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
  /// Rear camera, pointed at the product.
  Environment,
  User,
}

/// An open video stream. Dropping it releases the device.
pub trait CameraStream: Send {
  /// Grab the current frame as JPEG bytes.
  fn grab_jpeg(&mut self) -> Result<Vec<u8>>;
}

pub trait Camera: Send + Sync {
  type Stream: CameraStream;

  /// Acquire a stream. Fails with
  /// [`Error::CameraUnavailable`](crate::Error::CameraUnavailable) when
  /// access is denied or no device exists.
  fn open(&self, facing: Facing) -> Result<Self::Stream>;
}

/// Identifies one capture, so an analysis outcome can be matched to the
/// frame it was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureId(u64);

/// One still frame taken from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
  pub capture: CaptureId,
  pub jpeg:    Vec<u8>,
}

impl Frame {
  /// Standard base64 of the JPEG bytes, as sent to the AI.
  pub fn to_base64(&self) -> String { STANDARD.encode(&self.jpeg) }
}

// ─── ScanResult ──────────────────────────────────────────────────────────────

/// The AI's verdict on a scanned product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
  /// 0–100; how well the product suits a cutting goal.
  pub score:        u8,
  pub analysis:     String,
  pub product_name: String,
}

impl ScanResult {
  /// Build a result from a raw model score, clamping it into 0–100.
  pub fn new(
    raw_score: f64,
    analysis: impl Into<String>,
    product_name: impl Into<String>,
  ) -> Self {
    let score = if raw_score.is_finite() {
      raw_score.round().clamp(0.0, 100.0) as u8
    } else {
      0
    };
    Self {
      score,
      analysis: analysis.into(),
      product_name: product_name.into(),
    }
  }

  /// Returned when no AI credential is configured.
  pub fn unavailable() -> Self {
    Self::new(0.0, "לא הוגדר מפתח API, לא ניתן לנתח את המוצר.", "לא ידוע")
  }
}

// ─── State machine ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
  Idle,
  /// Stream open, waiting for the user to capture.
  Capturing,
  /// Frame sent to the AI; stream still held.
  Analyzing,
  ResultShown(ScanResult),
}

/// Owns the camera and at most one open stream.
pub struct Scanner<C: Camera> {
  camera:       C,
  stream:       Option<C::Stream>,
  state:        ScanState,
  /// The capture awaiting analysis, set only while `Analyzing`.
  pending:      Option<CaptureId>,
  next_capture: u64,
}

impl<C: Camera> Scanner<C> {
  pub fn new(camera: C) -> Self {
    Self {
      camera,
      stream: None,
      state: ScanState::Idle,
      pending: None,
      next_capture: 0,
    }
  }

  pub fn state(&self) -> &ScanState { &self.state }

  /// Whether a camera stream is currently held.
  pub fn is_streaming(&self) -> bool { self.stream.is_some() }

  /// Open the camera and start capturing. Returns whether a stream is held
  /// afterwards. Calling this while a stream is already held is a no-op, so
  /// acquisitions and releases stay paired.
  pub fn start(&mut self) -> bool {
    if self.stream.is_some() {
      return true;
    }
    match self.camera.open(Facing::Environment) {
      Ok(stream) => {
        info!("camera stream opened");
        self.stream = Some(stream);
        self.state = ScanState::Capturing;
        true
      }
      Err(e) => {
        warn!(error = %e, "camera access failed");
        self.state = ScanState::Idle;
        false
      }
    }
  }

  /// Grab one frame and move to `Analyzing`. `None` if not capturing or the
  /// grab failed; a failed grab keeps the stream so the user can try again.
  pub fn capture(&mut self) -> Option<Frame> {
    if self.state != ScanState::Capturing {
      return None;
    }
    let stream = self.stream.as_mut()?;
    match stream.grab_jpeg() {
      Ok(jpeg) => {
        let capture = CaptureId(self.next_capture);
        self.next_capture += 1;
        debug!(bytes = jpeg.len(), ?capture, "frame captured");
        self.state = ScanState::Analyzing;
        self.pending = Some(capture);
        Some(Frame { capture, jpeg })
      }
      Err(e) => {
        error!(error = %e, "frame capture failed");
        None
      }
    }
  }

  /// Record the outcome of the analysis of `capture` and release the stream.
  /// Returns whether the outcome was applied.
  ///
  /// Outcomes for any capture other than the one currently being analyzed
  /// (the user left the view, or captured again since) are discarded.
  pub fn finish<E: fmt::Display>(
    &mut self,
    capture: CaptureId,
    outcome: Result<ScanResult, E>,
  ) -> bool {
    if self.state != ScanState::Analyzing || self.pending != Some(capture) {
      debug!(?capture, "discarding analysis result for an inactive capture");
      return false;
    }
    self.pending = None;
    self.release();
    match outcome {
      Ok(result) => {
        info!(score = result.score, product = %result.product_name, "product analyzed");
        self.state = ScanState::ResultShown(result);
      }
      Err(e) => {
        error!(error = %e, "product analysis failed");
        self.state = ScanState::Idle;
      }
    }
    true
  }

  /// Dismiss a shown result.
  pub fn retry(&mut self) {
    if matches!(self.state, ScanState::ResultShown(_)) {
      self.state = ScanState::Idle;
    }
  }

  /// Leave the scanning view: release any stream and go idle.
  pub fn leave(&mut self) {
    self.release();
    self.pending = None;
    self.state = ScanState::Idle;
  }

  fn release(&mut self) {
    if self.stream.take().is_some() {
      info!("camera stream released");
    }
  }
}
