//! Camera acquisition lifecycle
//!
//! Opening a camera is asynchronous on every platform (a permission prompt
//! in the browser). The game issues a [`CameraRequest`] ticket and the host
//! answers later through `Game::camera_resolved`. Only the answer for the
//! latest outstanding ticket can activate the link, so deactivating the
//! camera while a request is in flight cancels it.

use std::fmt;

use thiserror::Error;

/// Camera failures, all non-fatal to the session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("this platform has no camera API")]
    Unsupported,
    #[error("camera could not be opened: {0}")]
    PermissionDenied(String),
    #[error("camera frame is {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },
}

/// Something that yields RGBA camera frames of `CAM_W x CAM_H` pixels
pub trait FrameSource {
    /// Latest frame, or None while the device has nothing ready
    fn frame_rgba(&mut self) -> Option<&[u8]>;

    /// Release the underlying stream
    fn stop(&mut self) {}
}

/// Ticket for an in-flight camera request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraRequest(pub u64);

/// Camera stream state
#[derive(Default)]
pub enum CameraLink {
    #[default]
    Off,
    /// Waiting for the host to answer the request
    Pending(CameraRequest),
    /// Stream running
    Active(Box<dyn FrameSource>),
}

impl fmt::Debug for CameraLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraLink::Off => write!(f, "Off"),
            CameraLink::Pending(request) => write!(f, "Pending({})", request.0),
            CameraLink::Active(_) => write!(f, "Active"),
        }
    }
}

impl CameraLink {
    pub fn is_active(&self) -> bool {
        matches!(self, CameraLink::Active(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CameraLink::Pending(_))
    }

    /// Stop any running stream and forget pending requests
    pub fn shutdown(&mut self) {
        if let CameraLink::Active(source) = self {
            source.stop();
        }
        *self = CameraLink::Off;
    }
}

/// Frame source replaying a fixed list of frames in a loop
pub struct ScriptedFrames {
    frames: Vec<Vec<u8>>,
    cursor: usize,
    stopped: bool,
}

impl ScriptedFrames {
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        Self {
            frames,
            cursor: 0,
            stopped: false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl FrameSource for ScriptedFrames {
    fn frame_rgba(&mut self) -> Option<&[u8]> {
        if self.stopped || self.frames.is_empty() {
            return None;
        }
        let index = self.cursor % self.frames.len();
        self.cursor = index + 1;
        self.frames.get(index).map(Vec::as_slice)
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
