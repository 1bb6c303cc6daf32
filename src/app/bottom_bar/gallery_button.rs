// SPDX-License-Identifier: MPL-2.0

//! Gallery button widget implementation

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::{Background, Border, Color, Length};
use cosmic::widget::{self, icon};

/// Picture frame icon (outlined, white)
const GALLERY_ICON: &[u8] = include_bytes!("../../../resources/button_icons/gallery.svg");

impl AppModel {
    /// Build the gallery button widget
    ///
    /// Opens the image chooser. Always enabled, so a picture can be chosen
    /// even when no camera is available.
    pub fn build_gallery_button(&self) -> Element<'_, Message> {
        let gallery_icon = icon::from_svg_bytes(GALLERY_ICON);
        let content = widget::container(widget::icon(gallery_icon).size(ui::GALLERY_ICON_SIZE))
            .width(Length::Fixed(ui::GALLERY_BUTTON_SIZE))
            .height(Length::Fixed(ui::GALLERY_BUTTON_SIZE))
            .center(Length::Fixed(ui::GALLERY_BUTTON_SIZE))
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::from_rgba(
                    1.0,
                    1.0,
                    1.0,
                    ui::GALLERY_BUTTON_ALPHA,
                ))),
                border: Border {
                    radius: [ui::GALLERY_BUTTON_SIZE / 2.0; 4].into(),
                    ..Default::default()
                },
                ..Default::default()
            });

        widget::button::custom(content)
            .padding(0)
            .width(Length::Fixed(ui::GALLERY_BUTTON_SIZE))
            .height(Length::Fixed(ui::GALLERY_BUTTON_SIZE))
            .class(cosmic::theme::Button::Image)
            .on_press(Message::OpenFilePicker)
            .into()
    }
}
