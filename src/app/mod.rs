// SPDX-License-Identifier: MPL-2.0

//! Main application module for Snapcam
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ContextPage)
//! - `viewfinder`: Live feed / captured state machine
//! - `camera_preview`: Preview and still image display
//! - `controls`: Capture and "Take New Photo" buttons
//! - `bottom_bar`: Gallery button, shutter, spacer
//! - `settings`: Settings drawer UI
//! - `handlers`: Message handlers grouped by domain
//! - `view`: Main view rendering
//! - `update`: Message dispatch

mod bottom_bar;
mod camera_preview;
mod controls;
mod handlers;
pub mod settings;
mod state;
mod update;
mod view;
pub mod viewfinder;

use crate::backends::camera;
use crate::config::Config;
use crate::constants::timing;
use crate::fl;
use cosmic::app::context_drawer;
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, Message};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
pub use viewfinder::{FileRead, Ticket, ViewState, Viewfinder};

const REPOSITORY: &str = "https://github.com/snapcam/snapcam";
const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.snapcam.SnapCam.svg");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.snapcam.SnapCam";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application and starts acquiring the camera.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) = Config::load(Self::APP_ID);

        // Required before any GStreamer call
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let device = camera::default_device();
        if !device.is_available() {
            warn!("PipeWire is not available; the live feed will stay blank");
        }

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            device,
            viewfinder: Viewfinder::new(),
            frame_feed: None,
            preview_handle: None,
            captured_handle: None,
            theme_dropdown_options: AppModel::theme_labels(),
            facing_dropdown_options: AppModel::facing_labels(),
        };

        let acquire = app.start_acquisition();
        (app, acquire)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::StreamExt;

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // The id changes with every acquisition, so a new stream restarts the
        // loop and entering the captured view drops it.
        let preview_sub = match self.active_feed() {
            Some((ticket, feed)) => Subscription::run_with_id(
                ("preview", ticket.generation()),
                cosmic::iced::stream::channel(8, move |mut output| async move {
                    let Some(mut frames) = feed.take() else {
                        debug!(generation = ticket.generation(), "Frame feed already taken");
                        return;
                    };
                    info!(generation = ticket.generation(), "Preview subscription started");

                    let mut frame_count = 0u64;
                    loop {
                        if output.is_closed() {
                            info!("Output channel closed - preview subscription cancelled");
                            break;
                        }

                        match tokio::time::timeout(
                            tokio::time::Duration::from_millis(timing::PREVIEW_POLL_MS),
                            frames.next(),
                        )
                        .await
                        {
                            Ok(Some(frame)) => {
                                frame_count += 1;
                                if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                                    debug!(
                                        frame = frame_count,
                                        width = frame.width,
                                        height = frame.height,
                                        latency_ms =
                                            frame.captured_at.elapsed().as_micros() as f64 / 1000.0,
                                        "Preview frame"
                                    );
                                }

                                // Dropping frames is fine for a live preview
                                if let Err(e) =
                                    output.try_send(Message::PreviewFrame(ticket, Arc::new(frame)))
                                    && e.is_disconnected()
                                {
                                    info!("Output channel disconnected - preview subscription cancelled");
                                    break;
                                }
                            }
                            Ok(None) => {
                                info!("Camera frame stream ended");
                                break;
                            }
                            Err(_) => continue,
                        }
                    }
                }),
            ),
            None => Subscription::none(),
        };

        Subscription::batch([config_sub, preview_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
