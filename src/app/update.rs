// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` function is a dispatcher; the handling code lives in the
//! `handlers` submodules:
//!
//! - `handlers::stream`: Acquisition and preview frames
//! - `handlers::capture`: Shutter and "Take New Photo"
//! - `handlers::selection`: Gallery file picker
//! - `handlers::system`: Settings, theme, drawer pages, links

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::SetFacingMode(index) => self.handle_set_facing_mode(index),

            // ===== Live Feed =====
            Message::StreamAcquired(ticket, result) => self.handle_stream_acquired(ticket, result),
            Message::PreviewFrame(ticket, frame) => self.handle_preview_frame(ticket, frame),

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::FrameCaptured(ticket, result) => self.handle_frame_captured(ticket, result),
            Message::OpenFilePicker => self.handle_open_file_picker(),
            Message::FilePicked(path) => self.handle_file_picked(path),
            Message::FileLoaded(read, result) => self.handle_file_loaded(read, result),
            Message::TakeNewPhoto => self.handle_take_new_photo(),
        }
    }
}
