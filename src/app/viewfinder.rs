// SPDX-License-Identifier: MPL-2.0

//! Viewfinder state machine
//!
//! Owns the live stream, the preview surface, the picker's retained value and
//! the held still image, and enforces the transitions between them:
//!
//! ```text
//!            begin_acquire / reset
//!   ┌──────────────────────────────────┐
//!   ▼                                  │
//! LiveFeed ── capture / file read ──▶ Captured
//!   │                                  │
//!   └────────── teardown ──▶ Closed ◀──┘
//! ```
//!
//! Every asynchronous operation gets a [`Ticket`] stamped with the current
//! generation. Transitions advance the generation, so a result that arrives
//! after a newer acquisition, a capture, a reset or teardown no longer
//! matches and is dropped. A dropped stream is released on the spot.

use crate::backends::camera::{BackendError, CameraFrame, FrameReceiver, LiveStream};
use crate::errors::{PhotoError, SelectionError};
use crate::pipelines::photo::CapturedImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Generation stamp for an asynchronous operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// A pending read of a picked file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRead {
    pub ticket: Ticket,
    pub path: PathBuf,
}

/// What the window shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState<'a> {
    /// Live preview; `attached` is false while acquiring or after a failure
    LiveFeed { attached: bool },
    /// A still image from a capture or a file
    Captured(&'a CapturedImage),
}

/// Latest rendered frame of the live preview
#[derive(Debug, Default)]
pub struct PreviewSurface {
    frame: Option<Arc<CameraFrame>>,
    paused: bool,
}

impl PreviewSurface {
    /// Show a new frame. Ignored while paused.
    pub fn present(&mut self, frame: Arc<CameraFrame>) -> bool {
        if self.paused {
            return false;
        }
        self.frame = Some(frame);
        true
    }

    /// Freeze on the current frame
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn clear(&mut self) {
        self.frame = None;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frame(&self) -> Option<&Arc<CameraFrame>> {
        self.frame.as_ref()
    }

    /// Native size of the rendered frame; (0, 0) before the first frame
    pub fn natural_size(&self) -> (u32, u32) {
        self.frame
            .as_ref()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0))
    }
}

/// The file picker's retained selection.
///
/// Choosing the value already held is not a change, mirroring a file input
/// that only fires when its value differs. Clearing makes the same file
/// selectable again.
#[derive(Debug, Default)]
pub struct FileInput {
    value: Option<PathBuf>,
}

impl FileInput {
    /// Record a selection; false when nothing changed
    pub fn change(&mut self, path: PathBuf) -> bool {
        if self.value.as_deref() == Some(path.as_path()) {
            return false;
        }
        self.value = Some(path);
        true
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Clear the value if it still names `path`
    pub fn forget(&mut self, path: &Path) {
        if self.value.as_deref() == Some(path) {
            self.value = None;
        }
    }

    pub fn value(&self) -> Option<&Path> {
        self.value.as_deref()
    }
}

#[derive(Debug, Default)]
struct LiveFeed {
    stream: Option<LiveStream>,
    acquiring: bool,
    capturing: bool,
}

impl LiveFeed {
    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
    }
}

#[derive(Debug)]
enum Phase {
    Live(LiveFeed),
    Captured(CapturedImage),
    Closed,
}

/// Result of completing an acquisition
#[derive(Debug)]
pub enum AcquireOutcome {
    /// The stream is attached; frames go to the preview
    Attached(Option<FrameReceiver>),
    /// The device refused; the feed stays blank
    Failed(BackendError),
    /// Superseded or torn down; any stream was released
    Discarded,
}

#[derive(Debug)]
pub struct Viewfinder {
    generation: u64,
    phase: Phase,
    preview: PreviewSurface,
    file_input: FileInput,
}

impl Default for Viewfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewfinder {
    pub fn new() -> Self {
        Self {
            generation: 0,
            phase: Phase::Live(LiveFeed::default()),
            preview: PreviewSurface::default(),
            file_input: FileInput::default(),
        }
    }

    fn advance(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    fn current(&self) -> Ticket {
        Ticket(self.generation)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket == self.current()
    }

    pub fn view_state(&self) -> ViewState<'_> {
        match &self.phase {
            Phase::Captured(image) => ViewState::Captured(image),
            Phase::Live(feed) => ViewState::LiveFeed {
                attached: feed.stream.is_some(),
            },
            Phase::Closed => ViewState::LiveFeed { attached: false },
        }
    }

    pub fn captured(&self) -> Option<&CapturedImage> {
        match &self.phase {
            Phase::Captured(image) => Some(image),
            _ => None,
        }
    }

    pub fn stream(&self) -> Option<&LiveStream> {
        match &self.phase {
            Phase::Live(feed) => feed.stream.as_ref(),
            _ => None,
        }
    }

    /// Ticket of the attached stream, used to key the preview subscription
    pub fn attached_ticket(&self) -> Option<Ticket> {
        self.stream().map(|_| self.current())
    }

    pub fn preview(&self) -> &PreviewSurface {
        &self.preview
    }

    pub fn file_input(&self) -> &FileInput {
        &self.file_input
    }

    pub fn is_acquiring(&self) -> bool {
        matches!(&self.phase, Phase::Live(feed) if feed.acquiring)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(&self.phase, Phase::Live(feed) if feed.capturing)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.phase, Phase::Closed)
    }

    /// The shutter works once a stream is attached and a frame has rendered
    pub fn can_capture(&self) -> bool {
        let (w, h) = self.preview.natural_size();
        matches!(&self.phase, Phase::Live(feed) if feed.stream.is_some() && !feed.capturing)
            && !self.preview.is_paused()
            && w > 0
            && h > 0
    }

    /// Start acquiring a stream.
    ///
    /// Any attached stream is released first so two sessions never hold the
    /// device at once. Returns `None` outside the live feed.
    pub fn begin_acquire(&mut self) -> Option<Ticket> {
        let Phase::Live(feed) = &mut self.phase else {
            return None;
        };
        feed.release();
        feed.acquiring = true;
        feed.capturing = false;

        self.preview.clear();
        self.preview.resume();

        let ticket = self.advance();
        debug!(generation = ticket.0, "Acquisition started");
        Some(ticket)
    }

    pub fn complete_acquire(
        &mut self,
        ticket: Ticket,
        result: Result<LiveStream, BackendError>,
    ) -> AcquireOutcome {
        let current = self.is_current(ticket);
        let feed = match &mut self.phase {
            Phase::Live(feed) if current => feed,
            _ => {
                if let Ok(mut stream) = result {
                    info!(generation = ticket.0, "Discarding stale camera stream");
                    stream.release();
                }
                return AcquireOutcome::Discarded;
            }
        };
        feed.acquiring = false;

        match result {
            Ok(mut stream) => {
                let frames = stream.take_frames();
                info!(
                    device = %stream.device().name,
                    tracks = stream.track_count(),
                    "Camera stream attached"
                );
                feed.stream = Some(stream);
                AcquireOutcome::Attached(frames)
            }
            Err(e) => {
                warn!(error = %e, "Camera acquisition failed; preview stays blank");
                AcquireOutcome::Failed(e)
            }
        }
    }

    /// Render a frame from the stream stamped with `ticket`
    pub fn present_frame(&mut self, ticket: Ticket, frame: Arc<CameraFrame>) -> bool {
        if !self.is_current(ticket) || self.stream().is_none() {
            return false;
        }
        self.preview.present(frame)
    }

    /// Snapshot the current frame for capture.
    ///
    /// With no rendered frame (zero natural size) this is a no-op.
    pub fn begin_capture(&mut self) -> Option<(Ticket, Arc<CameraFrame>)> {
        if !self.can_capture() {
            debug!(size = ?self.preview.natural_size(), "Capture ignored: no frame rendered");
            return None;
        }
        let frame = Arc::clone(self.preview.frame()?);
        let ticket = self.current();
        if let Phase::Live(feed) = &mut self.phase {
            feed.capturing = true;
        }
        Some((ticket, frame))
    }

    pub fn complete_capture(
        &mut self,
        ticket: Ticket,
        result: Result<CapturedImage, PhotoError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, "Discarding stale capture");
            return false;
        }
        let Phase::Live(feed) = &mut self.phase else {
            return false;
        };
        feed.capturing = false;

        match result {
            Ok(image) => {
                self.enter_captured(image);
                true
            }
            Err(e) => {
                warn!(error = %e, "Capture aborted");
                false
            }
        }
    }

    /// Register the picker's result.
    ///
    /// `None` (cancelled) and a value equal to the one already held change
    /// nothing and start no read.
    pub fn choose_file(&mut self, path: Option<PathBuf>) -> Option<FileRead> {
        let Some(path) = path else {
            debug!("File selection cancelled");
            return None;
        };
        if self.is_closed() {
            return None;
        }
        if !self.file_input.change(path.clone()) {
            debug!("Same file selected again; no change");
            return None;
        }
        Some(FileRead {
            ticket: self.current(),
            path,
        })
    }

    /// Apply a finished file read.
    ///
    /// A read that is stale or failed never shows its image, so the picker
    /// forgets its path and the same file can be chosen again.
    pub fn complete_file_read(
        &mut self,
        read: FileRead,
        result: Result<CapturedImage, SelectionError>,
    ) -> bool {
        if !self.is_current(read.ticket) || self.is_closed() {
            debug!(generation = read.ticket.0, "Discarding stale file read");
            self.file_input.forget(&read.path);
            return false;
        }
        match result {
            Ok(image) => {
                self.enter_captured(image);
                true
            }
            Err(e) => {
                warn!(error = %e, "Selected file ignored");
                self.file_input.forget(&read.path);
                false
            }
        }
    }

    /// Drop any still image and start a fresh acquisition
    pub fn reset(&mut self) -> Option<Ticket> {
        if self.is_closed() {
            return None;
        }
        if let Phase::Live(feed) = &mut self.phase {
            feed.release();
        }
        self.phase = Phase::Live(LiveFeed::default());
        self.file_input.clear();
        self.begin_acquire()
    }

    /// Release everything; later results are discarded
    pub fn teardown(&mut self) {
        if let Phase::Live(feed) = &mut self.phase {
            feed.release();
        }
        self.phase = Phase::Closed;
        self.preview.clear();
        self.advance();
        info!("Viewfinder closed");
    }

    fn enter_captured(&mut self, image: CapturedImage) {
        info!(source = ?image.source(), size = image.bytes().len(), "Entering captured view");
        if let Phase::Live(mut feed) = std::mem::replace(&mut self.phase, Phase::Captured(image)) {
            feed.release();
        }
        self.preview.pause();
        self.advance();
    }
}

impl Drop for Viewfinder {
    fn drop(&mut self) {
        if !self.is_closed() {
            self.teardown();
        }
    }
}
