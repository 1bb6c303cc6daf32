// SPDX-License-Identifier: MPL-2.0

//! Snapcam - a point-and-shoot camera for the COSMIC desktop
//!
//! Shows a live camera feed, turns a frame or a chosen image file into a
//! still, and goes back to the live feed on request.
//!
//! # Architecture
//!
//! - [`app`]: Application model, viewfinder state machine and UI
//! - [`backends`]: Capture device abstraction and the PipeWire backend
//! - [`pipelines`]: Frame to still image conversion
//! - [`storage`]: Image file selection and reading, photo directory
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // snapcam
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message, ViewState, Viewfinder};
pub use config::Config;
pub use pipelines::photo::{CapturedImage, ImageSource};
