// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the viewfinder lifecycle
//!
//! A fake capture device stands in for PipeWire so acquisition, capture,
//! file selection and reset can be driven without hardware.

use cosmic::iced::futures::channel::mpsc;
use snapcam::app::viewfinder::{AcquireOutcome, FileRead, Ticket, ViewState, Viewfinder};
use snapcam::backends::camera::{
    BackendError, BackendResult, CameraDevice, CameraFormat, CameraFrame, CameraLocation,
    CaptureDevice, FacingMode, FrameSender, LiveStream, MediaTrack, PixelFormat,
    StreamConstraints, TrackKind, select_device,
};
use snapcam::errors::SelectionError;
use snapcam::pipelines::photo::{self, CapturedImage, ImageSource};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

struct FakeTrack {
    label: String,
    live: bool,
    stops: Arc<AtomicUsize>,
}

impl MediaTrack for FakeTrack {
    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    fn label(&self) -> &str {
        &self.label
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

struct FakeDevice {
    devices: Vec<CameraDevice>,
    deny: AtomicBool,
    stops: Arc<AtomicUsize>,
    acquired: AtomicUsize,
    senders: Mutex<Vec<FrameSender>>,
}

impl FakeDevice {
    fn new() -> Self {
        let camera = |name: &str, location| CameraDevice {
            name: name.to_string(),
            path: format!("pipewire-serial-{}", name.len()),
            node_id: Some(name.len().to_string()),
            location: Some(location),
        };
        Self {
            devices: vec![
                camera("Front", CameraLocation::Front),
                camera("Rear Camera", CameraLocation::Back),
            ],
            deny: AtomicBool::new(false),
            stops: Arc::new(AtomicUsize::new(0)),
            acquired: AtomicUsize::new(0),
            senders: Mutex::new(Vec::new()),
        }
    }

    fn deny(&self, deny: bool) {
        self.deny.store(deny, Ordering::SeqCst);
    }

    fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl CaptureDevice for FakeDevice {
    fn enumerate(&self) -> BackendResult<Vec<CameraDevice>> {
        Ok(self.devices.clone())
    }

    fn formats(&self, _device: &CameraDevice) -> Vec<CameraFormat> {
        vec![CameraFormat {
            width: 1920,
            height: 1080,
            framerate: Some(30),
            pixel_format: "MJPG".to_string(),
        }]
    }

    fn acquire(&self, constraints: &StreamConstraints) -> BackendResult<LiveStream> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(BackendError::PermissionDenied("denied by user".to_string()));
        }
        let device = select_device(&self.devices, constraints)
            .cloned()
            .ok_or_else(|| BackendError::DeviceNotFound("none".to_string()))?;

        let (tx, rx) = mpsc::channel(4);
        if let Ok(mut senders) = self.senders.lock() {
            senders.push(tx);
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);

        let track = FakeTrack {
            label: device.name.clone(),
            live: true,
            stops: Arc::clone(&self.stops),
        };
        Ok(LiveStream::new(device, None, vec![Box::new(track)], rx))
    }

    fn is_available(&self) -> bool {
        true
    }
}

fn frame(width: u32, height: u32) -> Arc<CameraFrame> {
    Arc::new(CameraFrame {
        width,
        height,
        stride: width * 4,
        format: PixelFormat::Rgba,
        data: Arc::from(vec![200u8; (width * height * 4) as usize]),
        captured_at: Instant::now(),
    })
}

fn picked(path: &str) -> CapturedImage {
    CapturedImage::new(
        vec![0x89u8, b'P', b'N', b'G'],
        "image/png",
        2,
        2,
        ImageSource::File(path.into()),
    )
}

/// Acquire through the fake device and attach
fn mount(vf: &mut Viewfinder, device: &FakeDevice) -> Ticket {
    let ticket = vf.begin_acquire().unwrap();
    let outcome = vf.complete_acquire(ticket, device.acquire(&StreamConstraints::default()));
    assert!(matches!(outcome, AcquireOutcome::Attached(Some(_))));
    ticket
}

#[tokio::test]
async fn test_shutter_captures_rendered_frame_and_releases_camera() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    let ticket = mount(&mut vf, &device);
    assert_eq!(vf.view_state(), ViewState::LiveFeed { attached: true });

    assert!(vf.present_frame(ticket, frame(6, 4)));
    let (capture, snapshot) = vf.begin_capture().unwrap();
    let result = photo::grab_frame(snapshot).await;
    assert!(vf.complete_capture(capture, result));

    let still = vf.captured().unwrap().clone();
    assert_eq!(still.mime(), "image/png");
    assert_eq!(still.dimensions(), (6, 4));
    assert!(still.data_url().starts_with("data:image/png;base64,"));
    assert_eq!(device.stops(), 1, "camera must be released on capture");
    assert!(vf.stream().is_none());
    assert!(vf.preview().is_paused());
}

#[test]
fn test_shutter_without_rendered_frame_is_a_no_op() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    mount(&mut vf, &device);

    assert!(!vf.can_capture());
    assert!(vf.begin_capture().is_none());
    assert!(vf.begin_capture().is_none());
    assert_eq!(vf.view_state(), ViewState::LiveFeed { attached: true });
    assert_eq!(device.stops(), 0);
}

#[test]
fn test_facing_mode_picks_matching_camera() {
    let device = FakeDevice::new();
    let constraints = StreamConstraints {
        facing_mode: FacingMode::User,
        ..StreamConstraints::default()
    };
    let mut stream = device.acquire(&constraints).unwrap();
    assert_eq!(stream.device().name, "Front");
    stream.release();

    let mut stream = device.acquire(&StreamConstraints::default()).unwrap();
    assert_eq!(stream.device().name, "Rear Camera");
    stream.release();
}

#[test]
fn test_unreadable_file_keeps_live_feed() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    mount(&mut vf, &device);

    let read = vf.choose_file(Some("/notes.txt".into())).unwrap();
    let failed = Err(SelectionError::NotAnImage("/notes.txt".into()));
    assert!(!vf.complete_file_read(read, failed));

    assert_eq!(vf.view_state(), ViewState::LiveFeed { attached: true });
    assert_eq!(device.stops(), 0);
    assert!(vf.choose_file(Some("/notes.txt".into())).is_some());
}

#[test]
fn test_cancelled_picker_leaves_live_feed_untouched() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    let ticket = mount(&mut vf, &device);

    assert!(vf.choose_file(None).is_none());

    assert_eq!(vf.view_state(), ViewState::LiveFeed { attached: true });
    assert_eq!(vf.attached_ticket(), Some(ticket));
    assert!(vf.file_input().value().is_none());
    assert!(vf.captured().is_none());
    assert_eq!(device.stops(), 0);
}

#[test]
fn test_file_read_outrun_by_reacquire_can_be_chosen_again() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    mount(&mut vf, &device);

    let read = vf.choose_file(Some("/a.png".into())).unwrap();
    // Facing mode changed while the file was being read
    let reacquire = vf.begin_acquire().unwrap();
    assert!(!vf.complete_file_read(read, Ok(picked("/a.png"))));
    assert!(vf.file_input().value().is_none());
    vf.complete_acquire(reacquire, device.acquire(&StreamConstraints::default()));

    let again = vf.choose_file(Some("/a.png".into())).unwrap();
    assert_eq!(again.ticket, reacquire);
    assert!(vf.complete_file_read(again, Ok(picked("/a.png"))));
    assert_eq!(vf.captured(), Some(&picked("/a.png")));
}

#[test]
fn test_file_selection_replaces_live_feed() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    mount(&mut vf, &device);

    let read = vf.choose_file(Some("/a.png".into())).unwrap();
    assert!(vf.complete_file_read(read, Ok(picked("/a.png"))));

    assert_eq!(vf.captured(), Some(&picked("/a.png")));
    assert_eq!(device.stops(), 1);
}

#[test]
fn test_file_selection_from_captured_view_replaces_still() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    mount(&mut vf, &device);

    let first = vf.choose_file(Some("/a.png".into())).unwrap();
    assert!(vf.complete_file_read(first, Ok(picked("/a.png"))));
    let second = vf.choose_file(Some("/b.png".into())).unwrap();
    assert!(vf.complete_file_read(second, Ok(picked("/b.png"))));

    assert_eq!(vf.captured(), Some(&picked("/b.png")));
    assert_eq!(device.stops(), 1);
}

#[test]
fn test_same_file_needs_reset_to_retrigger() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    mount(&mut vf, &device);

    let read = vf.choose_file(Some("/a.png".into())).unwrap();
    assert!(vf.complete_file_read(read, Ok(picked("/a.png"))));
    assert!(vf.choose_file(Some("/a.png".into())).is_none());

    let reacquire = vf.reset().unwrap();
    assert!(vf.file_input().value().is_none());
    vf.complete_acquire(reacquire, device.acquire(&StreamConstraints::default()));
    assert!(vf.choose_file(Some("/a.png".into())).is_some());
}

#[test]
fn test_reset_with_denied_camera_leaves_blank_feed() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    mount(&mut vf, &device);
    let read = vf.choose_file(Some("/a.png".into())).unwrap();
    vf.complete_file_read(read, Ok(picked("/a.png")));

    device.deny(true);
    let ticket = vf.reset().unwrap();
    assert!(vf.captured().is_none());
    let outcome = vf.complete_acquire(ticket, device.acquire(&StreamConstraints::default()));
    assert!(matches!(
        outcome,
        AcquireOutcome::Failed(BackendError::PermissionDenied(_))
    ));
    assert_eq!(vf.view_state(), ViewState::LiveFeed { attached: false });
    assert!(!vf.can_capture());

    // Retrying once permission is granted attaches again
    device.deny(false);
    let ticket = vf.reset().unwrap();
    vf.complete_acquire(ticket, device.acquire(&StreamConstraints::default()));
    assert_eq!(vf.view_state(), ViewState::LiveFeed { attached: true });
}

#[test]
fn test_superseded_acquisition_is_released() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();

    let first = vf.begin_acquire().unwrap();
    let second = vf.reset().unwrap();
    let late = device.acquire(&StreamConstraints::default());
    assert!(matches!(
        vf.complete_acquire(first, late),
        AcquireOutcome::Discarded
    ));
    assert_eq!(device.stops(), 1, "stale stream must not keep the camera");

    vf.complete_acquire(second, device.acquire(&StreamConstraints::default()));
    assert_eq!(vf.attached_ticket(), Some(second));
    assert_eq!(device.acquired.load(Ordering::SeqCst), 2);
}

#[test]
fn test_results_after_teardown_are_discarded() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    let pending = vf.begin_acquire().unwrap();
    vf.teardown();

    let late = device.acquire(&StreamConstraints::default());
    assert!(matches!(
        vf.complete_acquire(pending, late),
        AcquireOutcome::Discarded
    ));
    assert_eq!(device.stops(), 1);
    let late_read = FileRead {
        ticket: pending,
        path: "/a.png".into(),
    };
    assert!(!vf.complete_file_read(late_read, Ok(picked("/a.png"))));
    assert!(vf.captured().is_none());
}

#[test]
fn test_capture_after_reset_is_discarded() {
    let device = FakeDevice::new();
    let mut vf = Viewfinder::new();
    let ticket = mount(&mut vf, &device);
    vf.present_frame(ticket, frame(4, 4));

    let (capture, _) = vf.begin_capture().unwrap();
    let fresh = vf.reset().unwrap();
    let still = CapturedImage::new(vec![1u8], "image/png", 4, 4, ImageSource::Frame);
    assert!(!vf.complete_capture(capture, Ok(still)));
    assert!(vf.is_acquiring());

    vf.complete_acquire(fresh, device.acquire(&StreamConstraints::default()));
    assert_eq!(vf.view_state(), ViewState::LiveFeed { attached: true });
}
