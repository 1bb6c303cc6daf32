// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! The backend layer abstracts hardware access so the viewfinder only sees
//! live streams, tracks and frames:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  App Layer                   │
//! └────────────────────┬────────────────────────┘
//!                      │ CaptureDevice
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │            ┌──────────────────┐             │
//! │            │     Camera       │             │
//! │            │    (PipeWire)    │             │
//! │            └──────────────────┘             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Device enumeration, stream acquisition and frame delivery

pub mod camera;
