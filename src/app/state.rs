// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::viewfinder::{FileRead, Ticket, Viewfinder};
use crate::backends::camera::types::{BackendError, CameraFrame, FacingMode};
use crate::backends::camera::{CaptureDevice, FrameFeed, StreamHandoff};
use crate::config::{AppTheme, Config};
use crate::errors::{PhotoError, SelectionError};
use crate::fl;
use crate::pipelines::photo::CapturedImage;
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use cosmic::widget::image;
use std::path::PathBuf;
use std::sync::Arc;

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Source of live streams
    pub device: Arc<dyn CaptureDevice>,
    /// Stream, preview and still image lifecycle
    pub viewfinder: Viewfinder,
    /// Frame receiver for the preview subscription, keyed by acquisition
    pub frame_feed: Option<(Ticket, FrameFeed)>,
    /// Rendered preview frame
    pub preview_handle: Option<image::Handle>,
    /// Rendered still image
    pub captured_handle: Option<image::Handle>,
    pub theme_dropdown_options: Vec<String>,
    pub facing_dropdown_options: Vec<String>,
}

impl AppModel {
    /// Labels for the theme dropdown, in [`AppTheme::ALL`] order
    pub fn theme_labels() -> Vec<String> {
        AppTheme::ALL
            .iter()
            .map(|theme| match theme {
                AppTheme::System => fl!("theme-system"),
                AppTheme::Dark => fl!("theme-dark"),
                AppTheme::Light => fl!("theme-light"),
            })
            .collect()
    }

    /// Labels for the facing mode dropdown, in [`FacingMode::ALL`] order
    pub fn facing_labels() -> Vec<String> {
        FacingMode::ALL
            .iter()
            .map(|mode| match mode {
                FacingMode::Environment => fl!("facing-environment"),
                FacingMode::User => fl!("facing-user"),
            })
            .collect()
    }

    /// Preview feed to subscribe to, if it belongs to the attached stream
    pub fn active_feed(&self) -> Option<(Ticket, FrameFeed)> {
        let attached = self.viewfinder.attached_ticket()?;
        self.frame_feed
            .as_ref()
            .filter(|(ticket, _)| *ticket == attached)
            .cloned()
    }
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),

    // ===== Settings =====
    /// Configuration changed on disk
    UpdateConfig(Config),
    /// Theme dropdown selection
    SetAppTheme(usize),
    /// Facing mode dropdown selection
    SetFacingMode(usize),

    // ===== Live Feed =====
    /// Acquisition finished for the given ticket
    StreamAcquired(Ticket, Result<StreamHandoff, BackendError>),
    /// New preview frame from the stream stamped with the ticket
    PreviewFrame(Ticket, Arc<CameraFrame>),

    // ===== Capture =====
    /// Shutter pressed
    Capture,
    /// Frame grab finished
    FrameCaptured(Ticket, Result<CapturedImage, PhotoError>),
    /// Gallery button pressed
    OpenFilePicker,
    /// File chooser closed; `None` when cancelled
    FilePicked(Option<PathBuf>),
    /// Selected file read and checked
    FileLoaded(FileRead, Result<CapturedImage, SelectionError>),
    /// Discard the still and go live again
    TakeNewPhoto,
}
