// SPDX-License-Identifier: MPL-2.0

//! PipeWire GStreamer pipeline for camera capture
//!
//! Every pipeline ends in `videoconvert ! video/x-raw,format=RGBA ! appsink`,
//! so frames reach the preview and the photo path in a single layout.

use super::super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// How the device's native format reaches raw video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatCategory {
    /// JPEG frames that need parsing and decoding
    Mjpeg,
    /// Raw video in any layout; videoconvert handles it
    Raw,
    /// Nothing requested; let decodebin negotiate
    Auto,
}

fn format_category(pixel_format: Option<&str>) -> FormatCategory {
    match pixel_format {
        Some("MJPG") | Some("MJPEG") | Some("JPEG") => FormatCategory::Mjpeg,
        Some(_) => FormatCategory::Raw,
        None => FormatCategory::Auto,
    }
}

/// Map a device path to the `pipewiresrc` property that selects it.
///
/// The result ends in a space so it can be spliced in front of
/// `do-timestamp`. An empty path lets PipeWire pick the default source.
pub fn target_property(device_path: &str) -> String {
    if device_path.is_empty() {
        String::new()
    } else if let Some(serial) = device_path.strip_prefix("pipewire-serial-") {
        format!("target-object={} ", serial)
    } else if let Some(id) = device_path.strip_prefix("pipewire-") {
        format!("target-object={} ", id)
    } else {
        format!("target-object={} ", device_path)
    }
}

/// Caps fields for a negotiated format
fn caps_filter(format: &CameraFormat) -> String {
    match format.framerate {
        Some(fps) => format!(
            "width=(int){},height=(int){},framerate=(fraction){}/1",
            format.width, format.height, fps
        ),
        None => format!("width=(int){},height=(int){}", format.width, format.height),
    }
}

/// Build the `gst-launch` description for a device and format
pub fn build_pipeline_string(device_path: &str, format: Option<&CameraFormat>) -> String {
    let source = format!("pipewiresrc {}do-timestamp=true", target_property(device_path));
    let sink = format!(
        "videoconvert n-threads={} ! video/x-raw,format={} ! appsink name=sink",
        pipeline::videoconvert_threads(),
        pipeline::OUTPUT_FORMAT
    );

    let pixel_format = format.map(|f| f.pixel_format.as_str());
    match (format_category(pixel_format), format) {
        (FormatCategory::Mjpeg, Some(fmt)) => format!(
            "{} ! image/jpeg,{} ! jpegparse ! jpegdec ! {}",
            source,
            caps_filter(fmt),
            sink
        ),
        (FormatCategory::Raw, Some(fmt)) => format!(
            "{} ! video/x-raw,format={},{} ! {}",
            source,
            fmt.pixel_format,
            caps_filter(fmt),
            sink
        ),
        _ => format!("{} ! decodebin ! {}", source, sink),
    }
}

/// Classify a GStreamer error message
fn classify_error(message: &str) -> BackendError {
    let lower = message.to_lowercase();
    if lower.contains("not authorized")
        || lower.contains("permission")
        || lower.contains("not allowed")
    {
        BackendError::PermissionDenied(message.to_string())
    } else if lower.contains("no such") || lower.contains("target not found") {
        BackendError::DeviceNotFound(message.to_string())
    } else if lower.contains("not-negotiated") || lower.contains("not negotiated") {
        BackendError::FormatNotSupported(message.to_string())
    } else {
        BackendError::InitializationFailed(message.to_string())
    }
}

/// Pop the first error or warning off the bus, if any
fn bus_error(pipeline: &gstreamer::Pipeline) -> Option<String> {
    let bus = pipeline.bus()?;
    let msg = bus.timed_pop_filtered(
        gstreamer::ClockTime::from_mseconds(100),
        &[gstreamer::MessageType::Error, gstreamer::MessageType::Warning],
    )?;
    match msg.view() {
        gstreamer::MessageView::Error(err) => {
            error!(
                error = %err.error(),
                debug = ?err.debug(),
                source = ?err.src().map(|s| s.name()),
                "GStreamer ERROR during pipeline start"
            );
            Some(err.error().to_string())
        }
        gstreamer::MessageView::Warning(w) => {
            warn!(warning = %w.error(), debug = ?w.debug(), "GStreamer WARNING during pipeline start");
            Some(w.error().to_string())
        }
        _ => None,
    }
}

/// Parse and start a pipeline, accepting an async transition to PLAYING
fn launch(description: &str) -> BackendResult<gstreamer::Pipeline> {
    info!(pipeline = %description, "Attempting to launch pipeline");

    let pipeline = gstreamer::parse::launch(description)
        .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
        .dynamic_cast::<gstreamer::Pipeline>()
        .map_err(|_| BackendError::InitializationFailed("Not a pipeline".to_string()))?;

    let failure = match pipeline.set_state(gstreamer::State::Playing) {
        Ok(_) => {
            let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_mseconds(
                timing::STATE_CHANGE_TIMEOUT_MS,
            ));
            debug!(?result, ?state, ?pending, "State query completed");

            let playing = result.is_ok() && state == gstreamer::State::Playing;
            let starting = matches!(result, Ok(gstreamer::StateChangeSuccess::Async))
                && pending == gstreamer::State::Playing;
            if playing || starting {
                return Ok(pipeline);
            }
            format!("Pipeline failed to start (state: {:?})", state)
        }
        Err(e) => format!("Failed to set pipeline to PLAYING: {}", e),
    };

    let reason = bus_error(&pipeline).unwrap_or(failure);
    let _ = pipeline.set_state(gstreamer::State::Null);
    let _ = pipeline.state(gstreamer::ClockTime::from_seconds(timing::STOP_TIMEOUT_SECS));
    Err(classify_error(&reason))
}

/// PipeWire camera pipeline feeding RGBA frames into a channel
pub struct PipeWirePipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    stopped: bool,
}

impl PipeWirePipeline {
    /// Create and start a pipeline for `device`.
    ///
    /// Permission errors are returned at once; other launch failures are
    /// retried a few times since PipeWire nodes can be briefly busy while a
    /// previous session winds down.
    pub fn new(
        device: &CameraDevice,
        format: Option<&CameraFormat>,
        frame_sender: FrameSender,
    ) -> BackendResult<Self> {
        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let description = build_pipeline_string(&device.path, format);
        info!(device = %device.name, format = ?format.map(|f| f.to_string()), "Creating PipeWire pipeline");

        let mut attempt = 0;
        let pipeline = loop {
            attempt += 1;
            match launch(&description) {
                Ok(p) => break p,
                Err(e @ BackendError::PermissionDenied(_)) => return Err(e),
                Err(e) if attempt >= pipeline::LAUNCH_ATTEMPTS => {
                    error!(error = %e, attempt, "Giving up on pipeline launch");
                    return Err(e);
                }
                Err(e) => {
                    warn!(error = %e, attempt, "Pipeline launch failed, retrying");
                    std::thread::sleep(std::time::Duration::from_millis(
                        timing::LAUNCH_RETRY_DELAY_MS,
                    ));
                }
            }
        };

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let frame_counter = Arc::new(AtomicU64::new(0));
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let captured_at = Instant::now();
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);

                    let sample = appsink
                        .pull_sample()
                        .map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
                        debug!(frame = frame_num, "Skipping corrupted buffer");
                        return Ok(gstreamer::FlowSuccess::Ok);
                    }
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let info =
                        VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let frame = CameraFrame {
                        width: info.width(),
                        height: info.height(),
                        stride: info.stride()[0] as u32,
                        format: PixelFormat::Rgba,
                        data: Arc::from(map.as_slice()),
                        captured_at,
                    };

                    if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                        debug!(
                            frame = frame_num,
                            width = frame.width,
                            height = frame.height,
                            "Frame from appsink"
                        );
                    }

                    let mut sender = frame_sender.clone();
                    if let Err(e) = sender.try_send(frame) {
                        if e.is_disconnected() {
                            return Err(gstreamer::FlowError::Flushing);
                        }
                        // Preview is behind; dropping is fine for a live view
                        debug!(frame = frame_num, "Frame dropped (channel full)");
                    }
                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        info!("PipeWire pipeline running");
        Ok(Self {
            pipeline,
            appsink,
            stopped: false,
        })
    }

    /// Stop the pipeline and release the camera. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = %e, "Failed to set pipeline to NULL");
            return;
        }
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        match result {
            Ok(_) => info!(state = ?state, "PipeWire pipeline stopped"),
            Err(e) => debug!(error = ?e, state = ?state, "Pipeline state change had issues"),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }
}

impl Drop for PipeWirePipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(pixel_format: &str, fps: Option<u32>) -> CameraFormat {
        CameraFormat {
            width: 1920,
            height: 1080,
            framerate: fps,
            pixel_format: pixel_format.to_string(),
        }
    }

    #[test]
    fn target_property_mapping() {
        assert_eq!(target_property(""), "");
        assert_eq!(target_property("pipewire-serial-2146"), "target-object=2146 ");
        assert_eq!(target_property("pipewire-76"), "target-object=76 ");
    }

    #[test]
    fn mjpeg_pipeline_decodes_to_rgba() {
        let desc = build_pipeline_string("pipewire-serial-5", Some(&fmt("MJPG", Some(30))));
        assert!(desc.starts_with("pipewiresrc target-object=5 do-timestamp=true ! image/jpeg,"));
        assert!(desc.contains("framerate=(fraction)30/1"));
        assert!(desc.contains("jpegdec"));
        assert!(desc.ends_with("video/x-raw,format=RGBA ! appsink name=sink"));
    }

    #[test]
    fn raw_pipeline_keeps_native_format() {
        let desc = build_pipeline_string("", Some(&fmt("YUY2", None)));
        assert!(desc.starts_with("pipewiresrc do-timestamp=true ! video/x-raw,format=YUY2,"));
        assert!(!desc.contains("framerate"));
        assert!(!desc.contains("jpegdec"));
    }

    #[test]
    fn missing_format_uses_decodebin() {
        let desc = build_pipeline_string("", None);
        assert!(desc.contains("decodebin"));
        assert!(desc.contains("appsink name=sink"));
    }

    #[test]
    fn permission_errors_are_recognised() {
        assert!(matches!(
            classify_error("Not authorized to access camera"),
            BackendError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify_error("Internal data stream error"),
            BackendError::InitializationFailed(_)
        ));
    }
}
