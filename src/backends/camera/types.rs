// SPDX-License-Identifier: MPL-2.0

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Physical mounting of a camera, as reported by libcamera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraLocation {
    Front,
    Back,
    External,
}

impl CameraLocation {
    /// Parse the `api.libcamera.location` node property
    pub fn from_property(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "front" => Some(Self::Front),
            "back" => Some(Self::Back),
            "external" => Some(Self::External),
            _ => None,
        }
    }
}

/// Which camera to prefer when several are present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacingMode {
    /// Rear camera, facing away from the user
    #[default]
    Environment,
    /// Front camera, facing the user
    User,
}

impl FacingMode {
    pub const ALL: [FacingMode; 2] = [FacingMode::Environment, FacingMode::User];

    /// Camera location that satisfies this facing mode
    pub fn location(self) -> CameraLocation {
        match self {
            FacingMode::Environment => CameraLocation::Back,
            FacingMode::User => CameraLocation::Front,
        }
    }
}

/// A capture device as discovered by enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraDevice {
    /// Human readable name (node description)
    pub name: String,
    /// Backend path, e.g. `pipewire-serial-42`; empty selects the default source
    pub path: String,
    /// PipeWire node id used for format queries
    pub node_id: Option<String>,
    /// Mounting position if the backend reports one
    pub location: Option<CameraLocation>,
}

/// One negotiable capture mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub framerate: Option<u32>,
    /// FourCC-like name as reported by the device ("MJPG", "YUY2", ...)
    pub pixel_format: String,
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(fps) = &self.framerate {
            write!(f, "{}x{} @ {}fps", self.width, self.height, fps)
        } else {
            write!(f, "{}x{}", self.width, self.height)
        }
    }
}

/// Pixel layout of a delivered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 4 bytes per pixel
    Rgba,
    /// 3 bytes per pixel, no alpha
    Rgb,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba => 4,
            PixelFormat::Rgb => 3,
        }
    }
}

/// A single frame from the live stream
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, including any padding
    pub stride: u32,
    pub format: PixelFormat,
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Whether a picture has actually been decoded into this frame
    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Receiver side of the frame channel (consumed by the preview)
pub type FrameReceiver = cosmic::iced::futures::channel::mpsc::Receiver<CameraFrame>;
/// Sender side of the frame channel (fed by the capture pipeline)
pub type FrameSender = cosmic::iced::futures::channel::mpsc::Sender<CameraFrame>;

/// Options recognised by `CaptureDevice::acquire`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing_mode: FacingMode,
    /// Explicit device path; bypasses facing-mode selection when present
    pub device_path: Option<String>,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            ideal_width: crate::constants::capture::IDEAL_WIDTH,
            ideal_height: crate::constants::capture::IDEAL_HEIGHT,
            facing_mode: FacingMode::Environment,
            device_path: None,
        }
    }
}

/// Pick the device to open for the given constraints.
///
/// An explicit path wins, then a device mounted on the requested side, then
/// the first device. A facing mode is a preference, never a hard requirement.
pub fn select_device<'a>(
    devices: &'a [CameraDevice],
    constraints: &StreamConstraints,
) -> Option<&'a CameraDevice> {
    if let Some(path) = constraints.device_path.as_deref()
        && let Some(device) = devices.iter().find(|d| d.path == path)
    {
        return Some(device);
    }

    let wanted = constraints.facing_mode.location();
    devices
        .iter()
        .find(|d| d.location == Some(wanted))
        .or_else(|| devices.first())
}

/// Pick the format closest to the ideal resolution.
///
/// Distance is `|dw| + |dh|`; ties prefer the higher framerate.
pub fn select_format(
    formats: &[CameraFormat],
    constraints: &StreamConstraints,
) -> Option<CameraFormat> {
    formats
        .iter()
        .min_by_key(|f| {
            let distance = f.width.abs_diff(constraints.ideal_width)
                + f.height.abs_diff(constraints.ideal_height);
            (distance, std::cmp::Reverse(f.framerate.unwrap_or(0)))
        })
        .cloned()
}

/// Camera backend errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Access to the camera was refused
    PermissionDenied(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Format not supported
    FormatNotSupported(String),
    /// Failed to initialize the stream
    InitializationFailed(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::FormatNotSupported(msg) => write!(f, "Format not supported: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, location: Option<CameraLocation>) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: format!("pipewire-serial-{}", name),
            node_id: None,
            location,
        }
    }

    fn format(width: u32, height: u32, fps: u32) -> CameraFormat {
        CameraFormat {
            width,
            height,
            framerate: Some(fps),
            pixel_format: "MJPG".to_string(),
        }
    }

    #[test]
    fn environment_prefers_back_camera() {
        let devices = [
            device("front", Some(CameraLocation::Front)),
            device("back", Some(CameraLocation::Back)),
        ];
        let selected = select_device(&devices, &StreamConstraints::default()).unwrap();
        assert_eq!(selected.name, "back");
    }

    #[test]
    fn facing_mode_falls_back_to_first_device() {
        let devices = [device("usb", None), device("other", None)];
        let constraints = StreamConstraints {
            facing_mode: FacingMode::User,
            ..Default::default()
        };
        assert_eq!(select_device(&devices, &constraints).unwrap().name, "usb");
    }

    #[test]
    fn explicit_path_overrides_facing() {
        let devices = [
            device("back", Some(CameraLocation::Back)),
            device("usb", Some(CameraLocation::External)),
        ];
        let constraints = StreamConstraints {
            device_path: Some("pipewire-serial-usb".to_string()),
            ..Default::default()
        };
        assert_eq!(select_device(&devices, &constraints).unwrap().name, "usb");
    }

    #[test]
    fn no_devices_selects_nothing() {
        assert!(select_device(&[], &StreamConstraints::default()).is_none());
    }

    #[test]
    fn format_closest_to_ideal_wins() {
        let formats = [format(640, 480, 30), format(1920, 1080, 30), format(3840, 2160, 30)];
        let chosen = select_format(&formats, &StreamConstraints::default()).unwrap();
        assert_eq!((chosen.width, chosen.height), (1920, 1080));
    }

    #[test]
    fn ideal_is_not_exact() {
        let formats = [format(640, 480, 30), format(1280, 720, 30)];
        let chosen = select_format(&formats, &StreamConstraints::default()).unwrap();
        assert_eq!((chosen.width, chosen.height), (1280, 720));
    }

    #[test]
    fn tie_prefers_higher_framerate() {
        let formats = [format(1920, 1080, 15), format(1920, 1080, 30)];
        let chosen = select_format(&formats, &StreamConstraints::default()).unwrap();
        assert_eq!(chosen.framerate, Some(30));
    }

    #[test]
    fn location_property_parsing() {
        assert_eq!(CameraLocation::from_property("back"), Some(CameraLocation::Back));
        assert_eq!(CameraLocation::from_property(" Front "), Some(CameraLocation::Front));
        assert_eq!(CameraLocation::from_property("ceiling"), None);
    }
}
