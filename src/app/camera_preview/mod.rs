// SPDX-License-Identifier: MPL-2.0

//! Camera preview module
//!
//! Renders the latest preview frame or the held still, scaled to cover the
//! window and cropped at the edges. Until a frame arrives a status line is
//! shown on the black background.

use crate::app::state::{AppModel, Message};
use crate::app::viewfinder::ViewState;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Color, ContentFit, Length};
use cosmic::widget;

impl AppModel {
    /// Build the camera preview widget
    pub fn build_camera_preview(&self) -> Element<'_, Message> {
        let handle = match self.viewfinder.view_state() {
            ViewState::Captured(_) => self.captured_handle.as_ref(),
            ViewState::LiveFeed { attached: true } => self.preview_handle.as_ref(),
            ViewState::LiveFeed { attached: false } => None,
        };

        match handle {
            Some(handle) => widget::image::Image::new(handle.clone())
                .content_fit(ContentFit::Cover)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => self.build_preview_placeholder(),
        }
    }

    fn build_preview_placeholder(&self) -> Element<'_, Message> {
        let status = match self.viewfinder.view_state() {
            ViewState::LiveFeed { attached: false } if !self.viewfinder.is_acquiring() => {
                fl!("no-camera")
            }
            ViewState::Captured(_) => String::new(),
            ViewState::LiveFeed { .. } => fl!("starting-camera"),
        };

        widget::container(widget::text(status))
            .width(Length::Fill)
            .height(Length::Fill)
            .center(Length::Fill)
            .style(|_theme| widget::container::Style {
                text_color: Some(Color::from_rgba(1.0, 1.0, 1.0, 0.6)),
                ..Default::default()
            })
            .into()
    }
}
