// SPDX-License-Identifier: MPL-2.0

//! Frame rasterization
//!
//! Draws one live frame into a tightly packed RGBA buffer at the frame's
//! native size, independent of how large the preview is on screen.

use crate::backends::camera::types::{CameraFrame, PixelFormat};
use crate::errors::PhotoError;
use image::RgbaImage;
use tracing::debug;

/// Pixels of a frame that is already tightly packed RGBA.
///
/// `None` when the frame has padding, is RGB, or is short; those go through
/// [`rasterize`].
pub fn packed_rgba(frame: &CameraFrame) -> Option<&[u8]> {
    let len = frame.width as usize * frame.height as usize * 4;
    (frame.has_dimensions()
        && frame.format == PixelFormat::Rgba
        && frame.stride as usize == frame.width as usize * 4
        && frame.data.len() >= len)
        .then(|| &frame.data[..len])
}

/// Rasterize a frame into an RGBA image.
///
/// Row padding (`stride > width * bpp`) is dropped. A frame with zero
/// dimensions yields [`PhotoError::NoFrameAvailable`]; a buffer too short
/// for the advertised geometry yields
/// [`PhotoError::RasterizationUnavailable`].
pub fn rasterize(frame: &CameraFrame) -> Result<RgbaImage, PhotoError> {
    if !frame.has_dimensions() {
        return Err(PhotoError::NoFrameAvailable);
    }

    let width = frame.width as usize;
    let height = frame.height as usize;
    let bpp = frame.format.bytes_per_pixel();
    let row_bytes = width * bpp;
    let stride = (frame.stride as usize).max(row_bytes);

    let needed = stride * (height - 1) + row_bytes;
    if frame.data.len() < needed {
        return Err(PhotoError::RasterizationUnavailable(format!(
            "buffer holds {} bytes, {}x{} needs {}",
            frame.data.len(),
            width,
            height,
            needed
        )));
    }

    let mut pixels = Vec::with_capacity(width * height * 4);
    for row in frame.data.chunks(stride).take(height) {
        let row = &row[..row_bytes];
        match frame.format {
            PixelFormat::Rgba => pixels.extend_from_slice(row),
            PixelFormat::Rgb => {
                for px in row.chunks_exact(3) {
                    pixels.extend_from_slice(&[px[0], px[1], px[2], u8::MAX]);
                }
            }
        }
    }

    debug!(width, height, stride, format = ?frame.format, "Frame rasterized");

    RgbaImage::from_raw(frame.width, frame.height, pixels).ok_or_else(|| {
        PhotoError::RasterizationUnavailable("pixel buffer size mismatch".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    fn frame(width: u32, height: u32, stride: u32, format: PixelFormat, data: Vec<u8>) -> CameraFrame {
        CameraFrame {
            width,
            height,
            stride,
            format,
            data: Arc::from(data),
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn padded_rows_are_packed() {
        // 2x2 RGBA with 4 bytes of padding per row
        let data = vec![
            1, 1, 1, 1, 2, 2, 2, 2, 0xEE, 0xEE, 0xEE, 0xEE, //
            3, 3, 3, 3, 4, 4, 4, 4, 0xEE, 0xEE, 0xEE, 0xEE,
        ];
        let img = rasterize(&frame(2, 2, 12, PixelFormat::Rgba, data)).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 1).0, [4, 4, 4, 4]);
        assert_eq!(img.as_raw().len(), 16);
    }

    #[test]
    fn rgb_gains_opaque_alpha() {
        let img = rasterize(&frame(1, 1, 3, PixelFormat::Rgb, vec![10, 20, 30])).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn last_row_may_omit_padding() {
        let data = vec![1, 1, 1, 1, 0, 0, 0, 0, 2, 2, 2, 2];
        let img = rasterize(&frame(1, 2, 8, PixelFormat::Rgba, data)).unwrap();
        assert_eq!(img.get_pixel(0, 1).0, [2, 2, 2, 2]);
    }

    #[test]
    fn only_unpadded_rgba_is_passed_through() {
        let packed = frame(1, 2, 4, PixelFormat::Rgba, vec![1, 1, 1, 1, 2, 2, 2, 2, 9]);
        assert_eq!(packed_rgba(&packed), Some(&[1, 1, 1, 1, 2, 2, 2, 2][..]));

        let padded = frame(1, 2, 8, PixelFormat::Rgba, vec![0; 16]);
        assert!(packed_rgba(&padded).is_none());
        assert!(packed_rgba(&frame(1, 1, 3, PixelFormat::Rgb, vec![0; 3])).is_none());
        assert!(packed_rgba(&frame(2, 2, 8, PixelFormat::Rgba, vec![0; 8])).is_none());
    }

    #[test]
    fn zero_dimensions_mean_no_frame() {
        let err = rasterize(&frame(0, 0, 0, PixelFormat::Rgba, Vec::new())).unwrap_err();
        assert_eq!(err, PhotoError::NoFrameAvailable);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let err = rasterize(&frame(4, 4, 16, PixelFormat::Rgba, vec![0; 10])).unwrap_err();
        assert!(matches!(err, PhotoError::RasterizationUnavailable(_)));
    }
}
