// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use snapcam::constants::{capture, file_formats, ui};

#[test]
fn test_ideal_resolution_is_full_hd() {
    assert_eq!(capture::IDEAL_WIDTH, 1920);
    assert_eq!(capture::IDEAL_HEIGHT, 1080);
}

#[test]
fn test_capture_button_fits_inside_ring() {
    // Inner disc plus ring on both sides must fit in the outer diameter
    assert!(ui::CAPTURE_BUTTON_INNER + 2.0 * ui::CAPTURE_BUTTON_RING <= ui::CAPTURE_BUTTON_OUTER);
}

#[test]
fn test_bottom_bar_is_symmetric() {
    // The right spacer mirrors the gallery button, keeping the shutter centered
    assert!(ui::GALLERY_BUTTON_SIZE * 2.0 + ui::CAPTURE_BUTTON_OUTER <= ui::BOTTOM_BAR_MAX_WIDTH);
}

#[test]
fn test_only_images_are_accepted() {
    for ext in ["png", "jpg", "jpeg", "gif", "bmp", "webp"] {
        assert!(file_formats::IMAGE_EXTENSIONS.contains(&ext), "{} should be accepted", ext);
    }
    assert!(!file_formats::IMAGE_EXTENSIONS.contains(&"txt"));
    assert!(file_formats::is_image_mime("image/png"));
    assert!(!file_formats::is_image_mime("text/plain"));
}
