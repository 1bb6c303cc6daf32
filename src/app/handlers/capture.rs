// SPDX-License-Identifier: GPL-3.0-only

//! Capture handlers
//!
//! Handles the shutter, the transition into the captured view and the way
//! back to the live feed.

use crate::app::state::{AppModel, Message};
use crate::app::viewfinder::Ticket;
use crate::errors::PhotoError;
use crate::pipelines::photo::{self, CapturedImage};
use cosmic::Task;
use cosmic::widget::image;
use tracing::info;

impl AppModel {
    // =========================================================================
    // Shutter
    // =========================================================================

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        let Some((ticket, frame)) = self.viewfinder.begin_capture() else {
            return Task::none();
        };
        info!(width = frame.width, height = frame.height, "Capturing frame");

        Task::perform(photo::grab_frame(frame), move |result| {
            cosmic::Action::App(Message::FrameCaptured(ticket, result))
        })
    }

    pub(crate) fn handle_frame_captured(
        &mut self,
        ticket: Ticket,
        result: Result<CapturedImage, PhotoError>,
    ) -> Task<cosmic::Action<Message>> {
        if self.viewfinder.complete_capture(ticket, result) {
            self.show_captured();
        }
        Task::none()
    }

    // =========================================================================
    // Captured view
    // =========================================================================

    /// Swap the preview for the held still image
    pub(crate) fn show_captured(&mut self) {
        self.frame_feed = None;
        self.captured_handle = self
            .viewfinder
            .captured()
            .map(|still| image::Handle::from_bytes(still.bytes().to_vec()));
    }

    pub(crate) fn handle_take_new_photo(&mut self) -> Task<cosmic::Action<Message>> {
        self.captured_handle = None;
        let Some(ticket) = self.viewfinder.reset() else {
            return Task::none();
        };
        info!("Taking a new photo");
        self.detach_preview();
        self.acquire(ticket)
    }
}
