// SPDX-License-Identifier: GPL-3.0-only

//! Gallery file selection handlers

use crate::app::state::{AppModel, Message};
use crate::app::viewfinder::FileRead;
use crate::errors::SelectionError;
use crate::fl;
use crate::pipelines::photo::CapturedImage;
use crate::storage;
use cosmic::Task;
use std::path::PathBuf;

impl AppModel {
    pub(crate) fn handle_open_file_picker(&self) -> Task<cosmic::Action<Message>> {
        Task::perform(
            storage::pick_image(fl!("choose-image"), fl!("image-files")),
            |path| cosmic::Action::App(Message::FilePicked(path)),
        )
    }

    pub(crate) fn handle_file_picked(
        &mut self,
        path: Option<PathBuf>,
    ) -> Task<cosmic::Action<Message>> {
        let Some(read) = self.viewfinder.choose_file(path) else {
            return Task::none();
        };

        let path = read.path.clone();
        Task::perform(
            async move { storage::read_image(&path).await },
            move |result| cosmic::Action::App(Message::FileLoaded(read.clone(), result)),
        )
    }

    pub(crate) fn handle_file_loaded(
        &mut self,
        read: FileRead,
        result: Result<CapturedImage, SelectionError>,
    ) -> Task<cosmic::Action<Message>> {
        if self.viewfinder.complete_file_read(read, result) {
            self.show_captured();
        }
        Task::none()
    }
}
