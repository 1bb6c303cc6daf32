// SPDX-License-Identifier: MPL-2.0

//! PipeWire camera backend
//!
//! Cameras are discovered through PipeWire and captured with `pipewiresrc`.
//! Inside Flatpak the camera portal gates access; a refusal surfaces as
//! [`BackendError::PermissionDenied`].

mod enumeration;
mod pipeline;

pub use enumeration::{
    enumerate_pipewire_cameras, get_fallback_formats, get_pipewire_formats, is_pipewire_available,
    parse_enum_formats, parse_node_listing,
};
pub use pipeline::{PipeWirePipeline, build_pipeline_string, target_property};

use super::stream::{LiveStream, MediaTrack, TrackKind};
use super::types::*;
use super::CaptureDevice;
use crate::constants::pipeline as pipeline_consts;
use tracing::info;

/// The video track of a PipeWire stream
pub struct PipeWireTrack {
    label: String,
    pipeline: PipeWirePipeline,
}

impl MediaTrack for PipeWireTrack {
    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn stop(&mut self) {
        self.pipeline.stop();
    }

    fn is_live(&self) -> bool {
        self.pipeline.is_running()
    }
}

/// PipeWire implementation of [`CaptureDevice`]
#[derive(Debug, Default)]
pub struct PipeWireDevice;

impl PipeWireDevice {
    pub fn new() -> Self {
        Self
    }
}

impl CaptureDevice for PipeWireDevice {
    fn enumerate(&self) -> BackendResult<Vec<CameraDevice>> {
        enumerate_pipewire_cameras().ok_or_else(|| {
            BackendError::NotAvailable("GStreamer PipeWire plugin not found".to_string())
        })
    }

    fn formats(&self, device: &CameraDevice) -> Vec<CameraFormat> {
        if device.node_id.is_none() {
            // Default source: PipeWire negotiates the format itself
            return Vec::new();
        }
        get_pipewire_formats(device)
    }

    fn acquire(&self, constraints: &StreamConstraints) -> BackendResult<LiveStream> {
        let devices = self.enumerate()?;
        let device = select_device(&devices, constraints)
            .cloned()
            .ok_or_else(|| BackendError::DeviceNotFound("No camera devices".to_string()))?;
        let format = select_format(&self.formats(&device), constraints);

        info!(
            device = %device.name,
            format = ?format.as_ref().map(|f| f.to_string()),
            facing = ?constraints.facing_mode,
            "Acquiring camera stream"
        );

        let (sender, receiver) =
            cosmic::iced::futures::channel::mpsc::channel(pipeline_consts::FRAME_CHANNEL_CAPACITY);
        let pipeline = PipeWirePipeline::new(&device, format.as_ref(), sender)?;

        let track = PipeWireTrack {
            label: device.name.clone(),
            pipeline,
        };
        Ok(LiveStream::new(device, format, vec![Box::new(track)], receiver))
    }

    fn is_available(&self) -> bool {
        is_pipewire_available()
    }
}
