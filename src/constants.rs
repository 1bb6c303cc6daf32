// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// UI layout constants
pub mod ui {
    /// Capture button outer diameter
    pub const CAPTURE_BUTTON_OUTER: f32 = 80.0;

    /// Capture button inner circle diameter
    pub const CAPTURE_BUTTON_INNER: f32 = 64.0;

    /// Capture button corner radius (half of inner size for a circle)
    pub const CAPTURE_BUTTON_RADIUS: f32 = 32.0;

    /// Width of the white ring around the capture button
    pub const CAPTURE_BUTTON_RING: f32 = 4.0;

    /// Gallery button edge length
    pub const GALLERY_BUTTON_SIZE: f32 = 56.0;

    /// Gallery icon size inside the button
    pub const GALLERY_ICON_SIZE: u16 = 24;

    /// Gallery button background alpha (white)
    pub const GALLERY_BUTTON_ALPHA: f32 = 0.1;

    /// Padding around the bottom bar row
    pub const BOTTOM_BAR_PADDING: u16 = 24;

    /// Maximum width of the bottom bar row; it is centered beyond this
    pub const BOTTOM_BAR_MAX_WIDTH: f32 = 448.0;

    /// Black alpha at the bottom edge of the bar gradient
    pub const BOTTOM_GRADIENT_ALPHA: f32 = 0.8;

    /// Corner radius of the "Take New Photo" pill
    pub const RETAKE_BUTTON_RADIUS: f32 = 24.0;

    /// Distance of the "Take New Photo" pill from the bottom edge
    pub const RETAKE_BUTTON_OFFSET: u16 = 32;
}

/// Stream constraints requested from the capture device
pub mod capture {
    /// Ideal frame width
    pub const IDEAL_WIDTH: u32 = 1920;

    /// Ideal frame height
    pub const IDEAL_HEIGHT: u32 = 1080;

    /// Frames to wait for before a CLI grab (lets auto exposure settle)
    pub const WARMUP_FRAMES: u32 = 10;
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Maximum buffer queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Capacity of the frame channel between appsink and the preview
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;

    /// Launch attempts before giving up on a device
    pub const LAUNCH_ATTEMPTS: u32 = 3;

    /// Get number of threads for videoconvert based on available CPU threads
    pub fn videoconvert_threads() -> u32 {
        std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(4)
    }

    /// Output pixel format for appsink
    pub const OUTPUT_FORMAT: &str = "RGBA";
}

/// Timing constants
pub mod timing {
    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// GStreamer state change timeout for validation
    pub const STATE_CHANGE_TIMEOUT_MS: u64 = 50;

    /// Delay between pipeline launch attempts
    pub const LAUNCH_RETRY_DELAY_MS: u64 = 500;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// How long the CLI waits for the first frame
    pub const FIRST_FRAME_TIMEOUT_SECS: u64 = 5;

    /// Preview receive timeout; bounds how long the preview loop sleeps
    pub const PREVIEW_POLL_MS: u64 = 16;
}

/// Resolution labels for camera listings
pub fn get_resolution_label(width: u32) -> Option<&'static str> {
    match width {
        w if w >= 7680 => Some("8K"),
        w if w >= 3840 => Some("4K"),
        w if w >= 2560 => Some("2K"),
        w if w >= 1920 => Some("HD"),
        w if w >= 640 => Some("SD"),
        _ => None,
    }
}

/// Image formats accepted by the gallery picker
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check whether a MIME type names an image
    pub fn is_image_mime(mime: &str) -> bool {
        mime.starts_with("image/")
    }
}

/// Application information utilities
pub mod app_info {
    use std::path::Path;

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        Path::new("/.flatpak-info").exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_labels() {
        assert_eq!(get_resolution_label(3840), Some("4K"));
        assert_eq!(get_resolution_label(1920), Some("HD"));
        assert_eq!(get_resolution_label(640), Some("SD"));
        assert_eq!(get_resolution_label(320), None);
    }

    #[test]
    fn test_capture_button_radius_matches_inner() {
        assert_eq!(ui::CAPTURE_BUTTON_RADIUS * 2.0, ui::CAPTURE_BUTTON_INNER);
    }
}
