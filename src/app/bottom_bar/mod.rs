// SPDX-License-Identifier: GPL-3.0-only

//! Bottom bar module
//!
//! `[gallery] ... [shutter] ... [spacer]` over a gradient that fades the
//! preview to black at the bottom edge. The shutter is only present on the
//! live feed; the gallery button works in both views.

pub mod gallery_button;

use crate::app::state::{AppModel, Message};
use crate::app::viewfinder::ViewState;
use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::gradient::Linear;
use cosmic::iced::{Alignment, Background, Color, Gradient, Length, Radians};
use cosmic::widget;

impl AppModel {
    /// Build the complete bottom bar widget
    pub fn build_bottom_bar(&self) -> Element<'_, Message> {
        let center: Element<'_, Message> = match self.viewfinder.view_state() {
            ViewState::LiveFeed { .. } => self.build_capture_button(),
            ViewState::Captured(_) => widget::Space::new(
                Length::Fixed(ui::CAPTURE_BUTTON_OUTER),
                Length::Fixed(ui::CAPTURE_BUTTON_OUTER),
            )
            .into(),
        };

        let row = widget::row()
            .push(self.build_gallery_button())
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(center)
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(widget::Space::new(
                Length::Fixed(ui::GALLERY_BUTTON_SIZE),
                Length::Fixed(ui::GALLERY_BUTTON_SIZE),
            ))
            .width(Length::Fill)
            .align_y(Alignment::Center);

        let fade = Linear::new(Radians(0.0))
            .add_stop(0.0, Color::from_rgba(0.0, 0.0, 0.0, ui::BOTTOM_GRADIENT_ALPHA))
            .add_stop(1.0, Color::TRANSPARENT);

        widget::container(widget::container(row).max_width(ui::BOTTOM_BAR_MAX_WIDTH))
            .width(Length::Fill)
            .center_x(Length::Fill)
            .padding(ui::BOTTOM_BAR_PADDING)
            .style(move |_theme| widget::container::Style {
                background: Some(Background::Gradient(Gradient::Linear(fade))),
                ..Default::default()
            })
            .into()
    }
}
