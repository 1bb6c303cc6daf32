// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines for still capture
//!
//! Conversion runs in background tasks so the live preview keeps rendering
//! while a frame is turned into a still.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌───────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │ CapturedImage │
//! │   (RGBA)     │     │  - Rasterize      │     │  (PNG bytes)  │
//! │              │     │  - PNG encoding   │     │               │
//! └──────────────┘     └───────────────────┘     └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`photo`]: Frame grab and still image encoding

pub mod photo;
