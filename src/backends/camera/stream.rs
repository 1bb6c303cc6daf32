// SPDX-License-Identifier: MPL-2.0

//! Live capture sessions
//!
//! A [`LiveStream`] is the exclusive handle to an open camera. It owns one or
//! more [`MediaTrack`]s; while any track is live the device stays locked and
//! the camera indicator stays on. Releasing the stream stops every track.
//! Dropping a stream releases it, so a stream can never outlive its owner.

use super::types::{CameraDevice, CameraFormat, FrameReceiver};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Media channel carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
}

/// One channel of a live stream.
///
/// `stop` must be idempotent: it is called by explicit release and again by
/// `Drop`.
pub trait MediaTrack: Send {
    fn kind(&self) -> TrackKind;

    /// Short label for logs
    fn label(&self) -> &str;

    /// Stop the track and give the hardware back
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// An open capture session
pub struct LiveStream {
    device: CameraDevice,
    format: Option<CameraFormat>,
    tracks: Vec<Box<dyn MediaTrack>>,
    frames: Option<FrameReceiver>,
    released: bool,
}

impl LiveStream {
    pub fn new(
        device: CameraDevice,
        format: Option<CameraFormat>,
        tracks: Vec<Box<dyn MediaTrack>>,
        frames: FrameReceiver,
    ) -> Self {
        Self {
            device,
            format,
            tracks,
            frames: Some(frames),
            released: false,
        }
    }

    pub fn device(&self) -> &CameraDevice {
        &self.device
    }

    pub fn format(&self) -> Option<&CameraFormat> {
        self.format.as_ref()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// True while at least one track still holds the device
    pub fn is_live(&self) -> bool {
        !self.released && self.tracks.iter().any(|t| t.is_live())
    }

    /// Hand the frame receiver to a preview surface. Yields `None` once taken.
    pub fn take_frames(&mut self) -> Option<FrameReceiver> {
        self.frames.take()
    }

    /// Stop every track. Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        for track in &mut self.tracks {
            debug!(kind = ?track.kind(), label = track.label(), "Stopping track");
            track.stop();
        }
        // Closing the receiver lets a still-running producer see the disconnect
        if let Some(mut frames) = self.frames.take() {
            frames.close();
        }

        info!(
            device = %self.device.name,
            tracks = self.tracks.len(),
            "Live stream released"
        );
    }
}

impl fmt::Debug for LiveStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveStream")
            .field("device", &self.device.name)
            .field("format", &self.format)
            .field("tracks", &self.tracks.len())
            .field("released", &self.released)
            .finish()
    }
}

impl Drop for LiveStream {
    fn drop(&mut self) {
        if !self.released {
            warn!(device = %self.device.name, "Live stream dropped without release; releasing now");
            self.release();
        }
    }
}

/// Single-take slot that moves a [`LiveStream`] through a cloneable message.
///
/// Only the first `take` gets the stream. If every clone is dropped without a
/// take, the stream is released with the last clone.
#[derive(Clone)]
pub struct StreamHandoff(Arc<Mutex<Option<LiveStream>>>);

impl StreamHandoff {
    pub fn new(stream: LiveStream) -> Self {
        Self(Arc::new(Mutex::new(Some(stream))))
    }

    pub fn take(&self) -> Option<LiveStream> {
        match self.0.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl fmt::Debug for StreamHandoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self.0.lock().map(|s| s.is_some()).unwrap_or(false);
        f.debug_struct("StreamHandoff")
            .field("pending", &pending)
            .finish()
    }
}

/// Shared slot for a frame receiver waiting to be picked up by the preview loop
#[derive(Clone, Default)]
pub struct FrameFeed(Arc<Mutex<Option<FrameReceiver>>>);

impl FrameFeed {
    pub fn new(frames: FrameReceiver) -> Self {
        Self(Arc::new(Mutex::new(Some(frames))))
    }

    pub fn take(&self) -> Option<FrameReceiver> {
        match self.0.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl fmt::Debug for FrameFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FrameFeed")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use cosmic::iced::futures::channel::mpsc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Track double that counts stop calls
    pub(crate) struct CountingTrack {
        pub stops: Arc<AtomicUsize>,
        live: bool,
    }

    impl CountingTrack {
        pub(crate) fn boxed(stops: &Arc<AtomicUsize>) -> Box<dyn MediaTrack> {
            Box::new(Self {
                stops: Arc::clone(stops),
                live: true,
            })
        }
    }

    impl MediaTrack for CountingTrack {
        fn kind(&self) -> TrackKind {
            TrackKind::Video
        }

        fn label(&self) -> &str {
            "counting"
        }

        fn stop(&mut self) {
            if self.live {
                self.live = false;
                self.stops.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn is_live(&self) -> bool {
            self.live
        }
    }

    fn device() -> CameraDevice {
        CameraDevice {
            name: "Test".into(),
            path: String::new(),
            node_id: None,
            location: None,
        }
    }

    fn stream_with(stops: &Arc<AtomicUsize>, tracks: usize) -> LiveStream {
        let (_tx, rx) = mpsc::channel(1);
        let tracks = (0..tracks).map(|_| CountingTrack::boxed(stops)).collect();
        LiveStream::new(device(), None, tracks, rx)
    }

    #[test]
    fn release_stops_every_track_once() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut stream = stream_with(&stops, 2);
        assert!(stream.is_live());

        stream.release();
        stream.release();
        drop(stream);

        assert_eq!(stops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn drop_releases() {
        let stops = Arc::new(AtomicUsize::new(0));
        drop(stream_with(&stops, 1));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn frames_are_taken_once() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut stream = stream_with(&stops, 1);
        assert!(stream.take_frames().is_some());
        assert!(stream.take_frames().is_none());
    }

    #[test]
    fn handoff_gives_stream_to_first_taker() {
        let stops = Arc::new(AtomicUsize::new(0));
        let handoff = StreamHandoff::new(stream_with(&stops, 1));
        let other = handoff.clone();

        assert!(handoff.take().is_some());
        assert!(other.take().is_none());
    }

    #[test]
    fn untaken_handoff_releases_on_drop() {
        let stops = Arc::new(AtomicUsize::new(0));
        let handoff = StreamHandoff::new(stream_with(&stops, 1));
        let clone = handoff.clone();
        drop(handoff);
        assert_eq!(stops.load(Ordering::SeqCst), 0);
        drop(clone);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }
}
