// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use snapcam::Config;
use snapcam::backends::camera::FacingMode;
use snapcam::config::AppTheme;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.app_theme, AppTheme::System);
    assert_eq!(
        config.facing_mode,
        FacingMode::Environment,
        "Rear camera should be preferred by default"
    );
    assert_eq!((config.ideal_width, config.ideal_height), (1920, 1080));
    assert!(config.preferred_camera_path.is_none());
}

#[test]
fn test_config_constraints_follow_fields() {
    let config = Config {
        facing_mode: FacingMode::User,
        ideal_width: 1280,
        ideal_height: 720,
        preferred_camera_path: Some("pipewire-serial-42".to_string()),
        ..Config::default()
    };

    let constraints = config.constraints();
    assert_eq!(constraints.facing_mode, FacingMode::User);
    assert_eq!(constraints.ideal_width, 1280);
    assert_eq!(constraints.ideal_height, 720);
    assert_eq!(
        constraints.device_path.as_deref(),
        Some("pipewire-serial-42")
    );
}

#[test]
fn test_config_serde_roundtrip_keeps_facing_mode() {
    let config = Config {
        facing_mode: FacingMode::User,
        ..Config::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_theme_order_matches_dropdown() {
    assert_eq!(
        AppTheme::ALL,
        [AppTheme::System, AppTheme::Dark, AppTheme::Light]
    );
}
