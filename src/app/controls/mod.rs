// SPDX-License-Identifier: MPL-2.0

//! Capture controls module
//!
//! - Capture button (shutter)
//! - "Take New Photo" button shown over a still image

pub mod capture_button;
pub mod retake_button;
