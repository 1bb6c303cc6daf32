// SPDX-License-Identifier: MPL-2.0

//! Local image selection and photo directories

use crate::constants::file_formats;
use crate::errors::SelectionError;
use crate::pipelines::photo::{CapturedImage, ImageSource};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory the CLI saves photos into (`~/Pictures/snapcam`)
pub fn photo_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapcam")
}

/// Show the OS file chooser restricted to image types.
///
/// Returns `None` when the user cancels.
pub async fn pick_image(title: String, filter_name: String) -> Option<PathBuf> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title(title)
        .add_filter(filter_name, file_formats::IMAGE_EXTENSIONS)
        .pick_file()
        .await?;
    let path = handle.path().to_path_buf();
    debug!(path = %path.display(), "Image picked");
    Some(path)
}

/// Read a selected file into a [`CapturedImage`].
///
/// The stored bytes are the file's bytes, untouched. The content is fully
/// decoded once to make sure it is an image the renderer can show; the MIME
/// type comes from the content, not the extension.
pub async fn read_image(path: &Path) -> Result<CapturedImage, SelectionError> {
    let bytes = tokio::fs::read(path).await?;
    let display = path.display().to_string();

    let (bytes, mime, width, height) = tokio::task::spawn_blocking(move || {
        let format = image::guess_format(&bytes)
            .map_err(|e| SelectionError::NotAnImage(format!("{}: {}", display, e)))?;
        let mime = format.to_mime_type();
        if !file_formats::is_image_mime(mime) {
            return Err(SelectionError::NotAnImage(display));
        }

        let decoded = image::ImageReader::with_format(Cursor::new(&bytes), format)
            .decode()
            .map_err(|e| SelectionError::NotAnImage(format!("{}: {}", display, e)))?;
        Ok((bytes, mime, decoded.width(), decoded.height()))
    })
    .await
    .map_err(|e| SelectionError::ReadFailed(format!("decode task failed: {}", e)))??;

    info!(path = %path.display(), mime, width, height, "Image file loaded");

    Ok(CapturedImage::new(
        bytes,
        mime,
        width,
        height,
        ImageSource::File(path.to_path_buf()),
    ))
}
