// SPDX-License-Identifier: GPL-3.0-only

//! Live feed handlers
//!
//! Acquisition runs on the blocking pool because starting a pipeline waits on
//! the device. The resulting stream crosses back to the UI in a
//! [`StreamHandoff`] and is attached only if its ticket is still current.

use crate::app::state::{AppModel, Message};
use crate::app::viewfinder::{AcquireOutcome, Ticket};
use crate::backends::camera::types::{BackendError, CameraFrame};
use crate::backends::camera::{FrameFeed, StreamHandoff};
use crate::pipelines::photo::capture;
use cosmic::Task;
use cosmic::widget::image;
use std::sync::Arc;
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Acquisition
    // =========================================================================

    /// Begin a fresh acquisition, releasing any attached stream first
    pub(crate) fn start_acquisition(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(ticket) = self.viewfinder.begin_acquire() else {
            return Task::none();
        };
        self.detach_preview();
        self.acquire(ticket)
    }

    /// Spawn the acquisition task for `ticket`
    pub(crate) fn acquire(&self, ticket: Ticket) -> Task<cosmic::Action<Message>> {
        let device = Arc::clone(&self.device);
        let constraints = self.config.constraints();
        info!(
            generation = ticket.generation(),
            width = constraints.ideal_width,
            height = constraints.ideal_height,
            facing = ?constraints.facing_mode,
            "Requesting camera stream"
        );

        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || {
                    device.acquire(&constraints).map(StreamHandoff::new)
                })
                .await
                .unwrap_or_else(|e| {
                    Err(BackendError::Other(format!("acquisition task failed: {}", e)))
                })
            },
            move |result| cosmic::Action::App(Message::StreamAcquired(ticket, result)),
        )
    }

    pub(crate) fn handle_stream_acquired(
        &mut self,
        ticket: Ticket,
        result: Result<StreamHandoff, BackendError>,
    ) -> Task<cosmic::Action<Message>> {
        let result = result.and_then(|handoff| {
            handoff
                .take()
                .ok_or_else(|| BackendError::Other("stream already handed off".into()))
        });

        match self.viewfinder.complete_acquire(ticket, result) {
            AcquireOutcome::Attached(Some(frames)) => {
                self.frame_feed = Some((ticket, FrameFeed::new(frames)));
            }
            AcquireOutcome::Attached(None) => {
                warn!("Stream attached without a frame source");
            }
            AcquireOutcome::Failed(_) | AcquireOutcome::Discarded => {}
        }
        Task::none()
    }

    // =========================================================================
    // Preview
    // =========================================================================

    pub(crate) fn handle_preview_frame(
        &mut self,
        ticket: Ticket,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        if !self.viewfinder.present_frame(ticket, Arc::clone(&frame)) {
            return Task::none();
        }

        // Packed RGBA is handed over with a single copy
        if let Some(pixels) = capture::packed_rgba(&frame) {
            self.preview_handle = Some(image::Handle::from_rgba(
                frame.width,
                frame.height,
                pixels.to_vec(),
            ));
            return Task::none();
        }

        match capture::rasterize(&frame) {
            Ok(pixels) => {
                let (width, height) = pixels.dimensions();
                self.preview_handle =
                    Some(image::Handle::from_rgba(width, height, pixels.into_raw()));
            }
            Err(e) => debug!(error = %e, "Skipping unrenderable frame"),
        }
        Task::none()
    }

    /// Forget the preview feed and its last rendered frame
    pub(crate) fn detach_preview(&mut self) {
        self.frame_feed = None;
        self.preview_handle = None;
    }
}
