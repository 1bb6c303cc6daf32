// SPDX-License-Identifier: MPL-2.0

//! Capture button widget implementation

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::{Background, Border, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the capture button widget
    ///
    /// A white ring around a white disc. Without a rendered frame the button
    /// is dimmed and has no press handler; while a grab is running the disc
    /// shrinks slightly.
    pub fn build_capture_button(&self) -> Element<'_, Message> {
        let enabled = self.viewfinder.can_capture();
        let alpha = if enabled || self.viewfinder.is_capturing() {
            1.0
        } else {
            0.5
        };

        let inner_size = if self.viewfinder.is_capturing() {
            ui::CAPTURE_BUTTON_INNER * 0.85
        } else {
            ui::CAPTURE_BUTTON_INNER
        };

        let disc = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.9 * alpha))),
            border: Border {
                radius: [ui::CAPTURE_BUTTON_RADIUS * (inner_size / ui::CAPTURE_BUTTON_INNER); 4]
                    .into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let ring = widget::container(disc)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .style(move |_theme| widget::container::Style {
                border: Border {
                    color: Color::from_rgba(1.0, 1.0, 1.0, alpha),
                    width: ui::CAPTURE_BUTTON_RING,
                    radius: [ui::CAPTURE_BUTTON_OUTER / 2.0; 4].into(),
                },
                ..Default::default()
            });

        let mut button = widget::button::custom(ring)
            .padding(0)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .class(cosmic::theme::Button::Image);

        if enabled {
            button = button.on_press(Message::Capture);
        }

        button.into()
    }
}
