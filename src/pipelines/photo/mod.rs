// SPDX-License-Identifier: MPL-2.0

//! Async photo capture pipeline
//!
//! ```text
//! Arc<CameraFrame> → rasterize (native size) → PNG encode → CapturedImage
//! ```
//!
//! Both stages are CPU-bound and run on the blocking pool so the preview
//! keeps rendering while a capture is in flight.

pub mod capture;
pub mod encoding;

pub use encoding::{CapturedImage, ImageSource};

use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;
use std::sync::Arc;
use tracing::info;

/// Turn one preview frame into a PNG still
pub async fn grab_frame(frame: Arc<CameraFrame>) -> Result<CapturedImage, PhotoError> {
    info!(width = frame.width, height = frame.height, "Grabbing frame");

    tokio::task::spawn_blocking(move || {
        let pixels = capture::rasterize(&frame)?;
        encoding::encode_png(&pixels)
    })
    .await
    .map_err(|e| PhotoError::RasterizationUnavailable(format!("capture task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::PixelFormat;
    use std::time::Instant;

    #[tokio::test]
    async fn grabbed_frame_keeps_native_size() {
        let frame = CameraFrame {
            width: 4,
            height: 3,
            stride: 16,
            format: PixelFormat::Rgba,
            data: Arc::from(vec![128u8; 48]),
            captured_at: Instant::now(),
        };
        let image = grab_frame(Arc::new(frame)).await.unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.source(), &ImageSource::Frame);
        assert!(!image.is_empty());
    }
}
