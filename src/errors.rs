// SPDX-License-Identifier: MPL-2.0

//! Error types for the snapshot camera

use crate::backends::camera::types::BackendError;
use std::fmt;

/// Errors from the command-line camera session
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// The user or the portal refused camera access
    PermissionDenied(String),
    /// Stream acquisition failed
    AcquisitionFailed(String),
    /// The stream never delivered a frame
    NoFrame,
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// No frame has rendered yet (zero dimensions)
    NoFrameAvailable,
    /// The frame could not be drawn into a pixel buffer
    RasterizationUnavailable(String),
    /// Encoding failed
    EncodingFailed(String),
    /// Save failed
    SaveFailed(String),
}

/// File selection errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The file could not be read
    ReadFailed(String),
    /// The file content is not a decodable image
    NotAnImage(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::PermissionDenied(msg) => write!(f, "Camera access denied: {}", msg),
            CameraError::AcquisitionFailed(msg) => write!(f, "Could not open camera: {}", msg),
            CameraError::NoFrame => write!(f, "Camera did not deliver a frame"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NoFrameAvailable => write!(f, "No frame available for capture"),
            PhotoError::RasterizationUnavailable(msg) => {
                write!(f, "Rasterization unavailable: {}", msg)
            }
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::ReadFailed(msg) => write!(f, "Failed to read file: {}", msg),
            SelectionError::NotAnImage(msg) => write!(f, "Not an image: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for SelectionError {}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::DeviceNotFound(_) | BackendError::NotAvailable(_) => {
                CameraError::NoCameraFound
            }
            BackendError::PermissionDenied(msg) => CameraError::PermissionDenied(msg),
            other => CameraError::AcquisitionFailed(other.to_string()),
        }
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for SelectionError {
    fn from(err: std::io::Error) -> Self {
        SelectionError::ReadFailed(err.to_string())
    }
}

impl From<image::ImageError> for PhotoError {
    fn from(err: image::ImageError) -> Self {
        PhotoError::EncodingFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_permission_maps_to_camera_permission() {
        let err: CameraError = BackendError::PermissionDenied("portal".into()).into();
        assert!(matches!(err, CameraError::PermissionDenied(ref m) if m == "portal"));
    }

    #[test]
    fn missing_device_maps_to_no_camera() {
        let err: CameraError = BackendError::DeviceNotFound("none".into()).into();
        assert!(matches!(err, CameraError::NoCameraFound));
        let err: CameraError = BackendError::NotAvailable("no pipewire".into()).into();
        assert!(matches!(err, CameraError::NoCameraFound));
    }

    #[test]
    fn other_backend_failures_keep_their_message() {
        let err: CameraError = BackendError::InitializationFailed("busy".into()).into();
        assert!(matches!(err, CameraError::AcquisitionFailed(ref m) if m.contains("busy")));
    }

    #[test]
    fn io_error_becomes_read_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SelectionError = io.into();
        assert_eq!(err, SelectionError::ReadFailed("gone".into()));
    }
}
