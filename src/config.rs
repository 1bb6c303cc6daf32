// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::types::{FacingMode, StreamConstraints};
use crate::constants::capture;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Order used by the settings dropdown
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Which physical camera to prefer when several are present
    pub facing_mode: FacingMode,
    /// Ideal capture width requested from the device
    pub ideal_width: u32,
    /// Ideal capture height requested from the device
    pub ideal_height: u32,
    /// Camera device path that overrides facing-mode selection
    pub preferred_camera_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            facing_mode: FacingMode::Environment,
            ideal_width: capture::IDEAL_WIDTH,
            ideal_height: capture::IDEAL_HEIGHT,
            preferred_camera_path: None,
        }
    }
}

impl Config {
    /// Load the stored configuration for `app_id`.
    ///
    /// Falls back to defaults when the config store is unavailable; fields
    /// that fail to parse keep their defaults.
    pub fn load(app_id: &str) -> (Option<cosmic_config::Config>, Self) {
        match cosmic_config::Config::new(app_id, Self::VERSION) {
            Ok(handler) => {
                let config = match Self::get_entry(&handler) {
                    Ok(config) => config,
                    Err((errors, config)) => {
                        error!(?errors, "Errors loading config");
                        config
                    }
                };
                (Some(handler), config)
            }
            Err(err) => {
                error!(%err, "Failed to create config handler");
                (None, Self::default())
            }
        }
    }

    /// Constraints handed to the capture device on every acquisition
    pub fn constraints(&self) -> StreamConstraints {
        StreamConstraints {
            ideal_width: self.ideal_width,
            ideal_height: self.ideal_height,
            facing_mode: self.facing_mode,
            device_path: self.preferred_camera_path.clone(),
        }
    }
}
