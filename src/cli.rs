// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! - Listing available cameras
//! - Taking a photo through the same acquire / grab / release path as the GUI

use cosmic::Application;
use futures::StreamExt;
use serde::Serialize;
use snapcam::app::AppModel;
use snapcam::backends::camera::{self, CameraDevice, CameraFormat, CameraFrame, FrameReceiver};
use snapcam::config::Config;
use snapcam::constants::{capture, get_resolution_label, timing};
use snapcam::errors::CameraError;
use snapcam::pipelines::photo::{self, encoding};
use snapcam::storage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Serialize)]
struct CameraListing<'a> {
    #[serde(flatten)]
    camera: &'a CameraDevice,
    formats: Vec<CameraFormat>,
}

/// List all available cameras
pub fn list_cameras(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let device = camera::default_device();
    let cameras = device.enumerate()?;
    let listings: Vec<CameraListing<'_>> = cameras
        .iter()
        .map(|camera| CameraListing {
            camera,
            formats: device.formats(camera),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, listing) in listings.iter().enumerate() {
        let location = listing
            .camera
            .location
            .map(|l| format!(" ({:?})", l))
            .unwrap_or_default();
        println!("  [{}] {}{}", index, listing.camera.name, location);

        // Best framerate per resolution, highest resolution first
        let mut resolutions: Vec<(u32, u32, u32)> = Vec::new();
        for format in &listing.formats {
            let fps = format.framerate.unwrap_or(30);
            if let Some(existing) = resolutions
                .iter_mut()
                .find(|(w, h, _)| *w == format.width && *h == format.height)
            {
                existing.2 = existing.2.max(fps);
            } else {
                resolutions.push((format.width, format.height, fps));
            }
        }
        resolutions.sort_by(|a, b| (b.0 * b.1).cmp(&(a.0 * a.1)));

        let shown: Vec<String> = resolutions
            .iter()
            .take(3)
            .map(|(w, h, fps)| match get_resolution_label(*w) {
                Some(label) => format!("{}x{}@{}fps [{}]", w, h, fps, label),
                None => format!("{}x{}@{}fps", w, h, fps),
            })
            .collect();
        if !shown.is_empty() {
            println!("      Formats: {}", shown.join(", "));
        }
        println!();
    }

    Ok(())
}

/// Take a photo with the configured camera constraints
pub fn take_photo(
    output: Option<PathBuf>,
    data_url: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let (_, config) = Config::load(AppModel::APP_ID);
    let device = camera::default_device();
    let mut stream = device
        .acquire(&config.constraints())
        .map_err(CameraError::from)?;
    eprintln!("Using camera: {}", stream.device().name);

    let rt = tokio::runtime::Runtime::new()?;
    let grabbed = match stream.take_frames() {
        Some(mut frames) => rt.block_on(async {
            let frame = wait_for_frame(&mut frames).await?;
            photo::grab_frame(Arc::new(frame))
                .await
                .map_err(Box::<dyn std::error::Error>::from)
        }),
        None => Err(CameraError::NoFrame.into()),
    };
    // The device is free again before anything is written
    stream.release();
    let image = grabbed?;

    if data_url {
        println!("{}", image.data_url());
        return Ok(());
    }

    let saved = rt.block_on(async {
        match output {
            Some(path) if !path.is_dir() => encoding::save_as(&image, &path).await.map(|_| path),
            Some(dir) => encoding::save(&image, &dir).await,
            None => encoding::save(&image, &storage::photo_directory()).await,
        }
    })?;

    println!("Photo saved: {}", saved.display());
    Ok(())
}

/// Wait for the stream to settle and return the last frame seen
async fn wait_for_frame(frames: &mut FrameReceiver) -> Result<CameraFrame, CameraError> {
    let timeout = Duration::from_secs(timing::FIRST_FRAME_TIMEOUT_SECS);
    let mut last = None;

    for seen in 1..=capture::WARMUP_FRAMES {
        match tokio::time::timeout(timeout, frames.next()).await {
            Ok(Some(frame)) => {
                debug!(
                    frame = seen,
                    width = frame.width,
                    height = frame.height,
                    "Warm-up frame"
                );
                last = Some(frame);
            }
            Ok(None) => {
                info!("Frame stream ended during warm-up");
                break;
            }
            Err(_) => {
                info!(
                    timeout_secs = timing::FIRST_FRAME_TIMEOUT_SECS,
                    "Timed out waiting for a frame"
                );
                break;
            }
        }
    }

    last.filter(CameraFrame::has_dimensions)
        .ok_or(CameraError::NoFrame)
}
