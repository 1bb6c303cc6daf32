// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Layers, back to front:
//! - Preview or still image, covering the window (camera_preview module)
//! - Bottom bar with gallery button and shutter (bottom_bar module)
//! - "Take New Photo" pill while a still is shown (controls module)

use crate::app::state::{AppModel, Message};
use crate::app::viewfinder::ViewState;
use cosmic::Element;
use cosmic::iced::{Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let background = self.build_camera_preview();

        let controls = widget::column()
            .push(widget::Space::new(Length::Fill, Length::Fill))
            .push(self.build_bottom_bar())
            .width(Length::Fill)
            .height(Length::Fill);

        let content: Element<'_, Message> = match self.viewfinder.view_state() {
            ViewState::Captured(_) => cosmic::iced::widget::stack![
                background,
                controls,
                self.build_retake_button()
            ]
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
            ViewState::LiveFeed { .. } => cosmic::iced::widget::stack![background, controls]
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
        };

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                ..Default::default()
            })
            .into()
    }
}
