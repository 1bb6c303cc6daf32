// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles links, context drawer pages and settings.

use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::types::FacingMode;
use crate::config::{AppTheme, Config};
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{error, info};

impl AppModel {
    // =========================================================================
    // Navigation Handlers
    // =========================================================================

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    // =========================================================================
    // Settings Handlers
    // =========================================================================

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        let constraints_changed = config.constraints() != self.config.constraints();
        self.config = config;

        // New constraints apply to the live feed right away; a held still
        // keeps them for the next reset.
        if constraints_changed {
            self.start_acquisition()
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&app_theme) = AppTheme::ALL.get(index) else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app theme");

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_set_facing_mode(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&facing_mode) = FacingMode::ALL.get(index) else {
            return Task::none();
        };
        if facing_mode == self.config.facing_mode {
            return Task::none();
        }

        info!(?facing_mode, "Setting facing mode");
        self.config.facing_mode = facing_mode;
        self.save_config("facing mode");

        self.start_acquisition()
    }

    fn save_config(&self, setting: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting, "Failed to save setting");
        }
    }
}
