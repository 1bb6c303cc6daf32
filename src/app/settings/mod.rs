// SPDX-License-Identifier: GPL-3.0-only

//! Settings UI module
//!
//! The settings drawer: appearance, which camera to use, version info.

pub mod view;
