// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by functional domain, each one an `impl AppModel`
//! block returning the follow-up task.

pub mod capture;
pub mod selection;
pub mod stream;
pub mod system;
