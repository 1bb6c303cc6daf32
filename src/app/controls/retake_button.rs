// SPDX-License-Identifier: MPL-2.0

//! "Take New Photo" button

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Background, Border, Color, Length};
use cosmic::widget;

impl AppModel {
    /// White pill centered near the bottom edge, shown over a still image
    pub fn build_retake_button(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let label = widget::text(fl!("take-new-photo")).font(cosmic::font::bold());
        let pill = widget::container(label)
            .padding([spacing.space_s, spacing.space_l])
            .style(|_theme| widget::container::Style {
                text_color: Some(Color::BLACK),
                background: Some(Background::Color(Color::WHITE)),
                border: Border {
                    radius: [ui::RETAKE_BUTTON_RADIUS; 4].into(),
                    ..Default::default()
                },
                ..Default::default()
            });

        let button = widget::button::custom(pill)
            .padding(0)
            .class(cosmic::theme::Button::Image)
            .on_press(Message::TakeNewPhoto);

        widget::column()
            .push(widget::Space::new(Length::Fill, Length::Fill))
            .push(
                widget::container(button)
                    .width(Length::Fill)
                    .center_x(Length::Fill)
                    .padding([0, 0, ui::RETAKE_BUTTON_OFFSET, 0]),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
