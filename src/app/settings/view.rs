// SPDX-License-Identifier: MPL-2.0

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::types::FacingMode;
use crate::config::AppTheme;
use crate::constants::app_info;
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_index = AppTheme::ALL
            .iter()
            .position(|t| *t == self.config.app_theme);
        let theme_dropdown = widget::dropdown(
            &self.theme_dropdown_options,
            theme_index,
            Message::SetAppTheme,
        );

        let facing_index = FacingMode::ALL
            .iter()
            .position(|m| *m == self.config.facing_mode);
        let facing_dropdown = widget::dropdown(
            &self.facing_dropdown_options,
            facing_index,
            Message::SetFacingMode,
        );

        let version = fl!("version", version = app_info::version());
        let version_info = if app_info::is_flatpak() {
            format!("{} (Flatpak)", version)
        } else {
            version
        };

        let settings_column: Element<'_, Message> = widget::column()
            .push(
                widget::text(fl!("appearance"))
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("camera")).size(16).font(cosmic::font::bold()))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(facing_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(version_info)
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}
