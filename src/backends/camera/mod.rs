// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   UI / CLI          │
//! └──────────┬──────────┘
//!            │ acquire(constraints)
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureDevice trait │
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌────────┐        ┌────────────┐
//!       │PipeWire│ ─────▶ │ LiveStream │ (tracks + frame receiver)
//!       └────────┘        └────────────┘
//! ```

pub mod pipewire;
pub mod stream;
pub mod types;

pub use stream::{FrameFeed, LiveStream, MediaTrack, StreamHandoff, TrackKind};
pub use types::*;

use std::sync::Arc;

/// Source of live streams.
///
/// `acquire` may block on permission prompts and device start-up, so callers
/// on the UI thread run it through `spawn_blocking`.
pub trait CaptureDevice: Send + Sync {
    /// Enumerate cameras this backend can open
    fn enumerate(&self) -> BackendResult<Vec<CameraDevice>>;

    /// Capture modes supported by a camera
    fn formats(&self, device: &CameraDevice) -> Vec<CameraFormat>;

    /// Open a stream that best satisfies the constraints
    fn acquire(&self, constraints: &StreamConstraints) -> BackendResult<LiveStream>;

    /// Whether the backend can be used at all on this system
    fn is_available(&self) -> bool;
}

/// The capture device used by the application
pub fn default_device() -> Arc<dyn CaptureDevice> {
    Arc::new(pipewire::PipeWireDevice::new())
}
