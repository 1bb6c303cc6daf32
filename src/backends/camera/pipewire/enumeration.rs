// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration and format detection
//!
//! Discovery shells out to `pw-cli`, which ships with every PipeWire install.
//! The text parsers are kept free of I/O so they can be tested on captured
//! output.

use super::super::types::{CameraDevice, CameraFormat, CameraLocation};
use tracing::{debug, info, warn};

/// Enumerate cameras using PipeWire.
///
/// Returns `None` when the GStreamer PipeWire plugin is missing. When the
/// plugin exists but `pw-cli` reports nothing, a default entry with an empty
/// path is returned so PipeWire can pick the source itself.
pub fn enumerate_pipewire_cameras() -> Option<Vec<CameraDevice>> {
    if !is_pipewire_available() {
        return None;
    }

    if let Some(listing) = run_pw_cli(&["ls", "Node"]) {
        let mut cameras = parse_node_listing(&listing);
        for camera in &mut cameras {
            if camera.location.is_none()
                && let Some(id) = camera.node_id.as_deref()
            {
                camera.location = query_node_location(id);
            }
        }
        if !cameras.is_empty() {
            info!(count = cameras.len(), "Enumerated cameras via pw-cli");
            return Some(cameras);
        }
    }

    info!("Using PipeWire auto-selection (default camera)");
    Some(vec![CameraDevice {
        name: "Default Camera".to_string(),
        path: String::new(),
        node_id: None,
        location: None,
    }])
}

/// Check that GStreamer initialises and provides `pipewiresrc`
pub fn is_pipewire_available() -> bool {
    if let Err(e) = gstreamer::init() {
        warn!(error = %e, "GStreamer init failed");
        return false;
    }
    let available = gstreamer::ElementFactory::find("pipewiresrc").is_some();
    if !available {
        debug!("pipewiresrc element not available");
    }
    available
}

fn run_pw_cli(args: &[&str]) -> Option<String> {
    let output = std::process::Command::new("pw-cli").args(args).output().ok()?;
    if !output.status.success() {
        debug!(?args, "pw-cli command failed");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[derive(Default)]
struct NodeEntry {
    id: Option<String>,
    serial: Option<String>,
    description: Option<String>,
    location: Option<CameraLocation>,
    is_video_source: bool,
}

impl NodeEntry {
    fn into_device(self) -> Option<CameraDevice> {
        if !self.is_video_source {
            return None;
        }
        let id = self.id?;
        let name = self.description?;
        // object.serial is what target-object expects; the node id is the fallback
        let path = match &self.serial {
            Some(serial) => format!("pipewire-serial-{}", serial),
            None => format!("pipewire-{}", id),
        };
        debug!(id = %id, name = %name, path = %path, "Found video camera");
        Some(CameraDevice {
            name,
            path,
            node_id: Some(id),
            location: self.location,
        })
    }
}

/// Parse `pw-cli ls Node` output into video source devices
pub fn parse_node_listing(listing: &str) -> Vec<CameraDevice> {
    let mut cameras = Vec::new();
    let mut current = NodeEntry::default();

    for line in listing.lines() {
        let trimmed = line.trim();

        // "id 76, type PipeWire:Interface:Node/3"
        if let Some(rest) = trimmed.strip_prefix("id ")
            && trimmed.contains("type PipeWire:Interface:Node")
        {
            if let Some(device) = std::mem::take(&mut current).into_device() {
                cameras.push(device);
            }
            current.id = rest.split(',').next().map(|id| id.trim().to_string());
            continue;
        }

        if trimmed.contains("media.class") && trimmed.contains("\"Video/Source\"") {
            current.is_video_source = true;
        } else if trimmed.contains("object.serial") {
            current.serial = extract_quoted_value(trimmed);
        } else if trimmed.contains("node.description") {
            current.description = extract_quoted_value(trimmed);
        } else if trimmed.contains("api.libcamera.location") {
            current.location =
                extract_quoted_value(trimmed).and_then(|v| CameraLocation::from_property(&v));
        }
    }

    if let Some(device) = current.into_device() {
        cameras.push(device);
    }
    cameras
}

/// Extract quoted value from a property line (e.g., 'property = "value"' -> "value")
fn extract_quoted_value(line: &str) -> Option<String> {
    let start = line.find('"')?;
    let end = line[start + 1..].find('"')?;
    Some(line[start + 1..start + 1 + end].to_string())
}

/// `pw-cli ls Node` omits libcamera properties; `pw-cli info` has them
fn query_node_location(node_id: &str) -> Option<CameraLocation> {
    let info = run_pw_cli(&["info", node_id])?;
    info.lines()
        .map(str::trim)
        .filter(|l| l.contains("api.libcamera.location"))
        .find_map(extract_quoted_value)
        .and_then(|v| CameraLocation::from_property(&v))
}

/// Get supported formats for a PipeWire camera
pub fn get_pipewire_formats(device: &CameraDevice) -> Vec<CameraFormat> {
    let parsed = device
        .node_id
        .as_deref()
        .and_then(|id| run_pw_cli(&["enum-params", id, "EnumFormat"]))
        .map(|out| parse_enum_formats(&out))
        .unwrap_or_default();

    if parsed.is_empty() {
        warn!(device = %device.name, "No formats reported, using fallback list");
        get_fallback_formats()
    } else {
        info!(count = parsed.len(), device = %device.name, "Enumerated formats via pw-cli");
        parsed
    }
}

/// Fallback formats when PipeWire enumeration fails
pub fn get_fallback_formats() -> Vec<CameraFormat> {
    [(1920, 1080), (1280, 720), (640, 480)]
        .into_iter()
        .map(|(width, height)| CameraFormat {
            width,
            height,
            framerate: Some(30),
            pixel_format: "MJPG".to_string(),
        })
        .collect()
}

#[derive(Default)]
struct FormatEntry {
    subtype: Option<String>,
    video_format: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    framerates: Vec<u32>,
}

impl FormatEntry {
    fn flush(&mut self, out: &mut Vec<CameraFormat>) {
        let entry = std::mem::take(self);
        let (Some(width), Some(height), Some(subtype)) = (entry.width, entry.height, entry.subtype)
        else {
            return;
        };
        // Raw formats are named by VideoFormat, compressed ones by subtype
        let pixel_format = if subtype == "raw" {
            entry.video_format.unwrap_or_else(|| "YUY2".to_string())
        } else {
            subtype.to_uppercase()
        };

        // libcamera nodes advertise no framerates
        if entry.framerates.is_empty() {
            push_unique(out, width, height, None, &pixel_format);
        }
        for fps in entry.framerates {
            push_unique(out, width, height, Some(fps), &pixel_format);
        }
    }
}

fn push_unique(
    out: &mut Vec<CameraFormat>,
    width: u32,
    height: u32,
    framerate: Option<u32>,
    pixel_format: &str,
) {
    let format = CameraFormat {
        width,
        height,
        framerate,
        pixel_format: pixel_format.to_string(),
    };
    if !out.contains(&format) {
        out.push(format);
    }
}

/// Parse `pw-cli enum-params <id> EnumFormat` output
pub fn parse_enum_formats(output: &str) -> Vec<CameraFormat> {
    let mut formats = Vec::new();
    let mut current = FormatEntry::default();

    for line in output.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("Object:") {
            current.flush(&mut formats);
            continue;
        }

        // "Id 131074   (Spa:Enum:MediaSubtype:mjpg)"
        if trimmed.contains("Spa:Enum:MediaSubtype:")
            && let Some(pos) = trimmed.rfind(':')
        {
            current.subtype = Some(trimmed[pos + 1..].trim_end_matches(')').to_lowercase());
        }

        // "Id 4   (Spa:Enum:VideoFormat:YUY2)"
        if trimmed.contains("Spa:Enum:VideoFormat:")
            && let Some(pos) = trimmed.rfind(':')
        {
            current.video_format = Some(trimmed[pos + 1..].trim_end_matches(')').to_uppercase());
        }

        if let Some(res) = trimmed.strip_prefix("Rectangle ")
            && let Some((w, h)) = res.split_once('x')
        {
            current.width = w.trim().parse().ok();
            current.height = h.trim().parse().ok();
        }

        // "Fraction 30/1" or "Fraction 60000/1001"
        if let Some(frac) = trimmed.strip_prefix("Fraction ")
            && let Some((num, den)) = frac.split_once('/')
            && let (Ok(num), Ok(den)) = (num.trim().parse::<u32>(), den.trim().parse::<u32>())
            && den > 0
            && num > 0
        {
            let fps = num.saturating_add(den / 2) / den;
            if !current.framerates.contains(&fps) {
                current.framerates.push(fps);
            }
        }
    }

    current.flush(&mut formats);
    formats
}
