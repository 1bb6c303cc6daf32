// SPDX-License-Identifier: GPL-3.0-only

//! Still image encoding
//!
//! A [`CapturedImage`] is the one in-memory representation shared by frame
//! grabs and file selections: encoded bytes plus their MIME type. Rendering
//! only ever sees this blob, so it does not care where the picture came from.

use crate::errors::PhotoError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use image::{ImageFormat, RgbaImage};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Where a still image came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Grabbed from the live preview
    Frame,
    /// Read from a user-selected file
    File(PathBuf),
}

/// Immutable encoded still image
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Arc<[u8]>,
    mime: &'static str,
    width: u32,
    height: u32,
    source: ImageSource,
}

impl CapturedImage {
    pub fn new(
        bytes: impl Into<Arc<[u8]>>,
        mime: &'static str,
        width: u32,
        height: u32,
        source: ImageSource,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            mime,
            width,
            height,
            source,
        }
    }

    /// Encoded bytes, exactly as they would be written to disk
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Self-contained `data:` URL for the image
    pub fn data_url(&self) -> String {
        let mut url = format!("data:{};base64,", self.mime);
        BASE64_ENGINE.encode_string(&*self.bytes, &mut url);
        url
    }

    /// File extension matching the MIME type
    pub fn extension(&self) -> &'static str {
        ImageFormat::from_mime_type(self.mime)
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or("img")
    }
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("source", &self.source)
            .finish()
    }
}

/// Encode RGBA pixels as PNG with default compression
pub fn encode_png(image: &RgbaImage) -> Result<CapturedImage, PhotoError> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;

    debug!(
        width = image.width(),
        height = image.height(),
        size = buffer.len(),
        "PNG encoding complete"
    );

    Ok(CapturedImage::new(
        buffer,
        ImageFormat::Png.to_mime_type(),
        image.width(),
        image.height(),
        ImageSource::Frame,
    ))
}

/// Write an image into `output_dir` with a timestamped name
pub async fn save(image: &CapturedImage, output_dir: &Path) -> Result<PathBuf, PhotoError> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("IMG_{}.{}", timestamp, image.extension());
    let filepath = output_dir.join(filename);
    save_as(image, &filepath).await?;
    Ok(filepath)
}

/// Write an image to an explicit path
pub async fn save_as(image: &CapturedImage, path: &Path) -> Result<(), PhotoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, image.bytes()).await?;
    info!(path = %path.display(), size = image.bytes().len(), "Photo saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_blob_is_non_empty_and_decodable() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
        let captured = encode_png(&img).unwrap();

        assert!(!captured.is_empty());
        assert_eq!(captured.mime(), "image/png");
        assert_eq!(captured.dimensions(), (3, 2));

        let decoded = image::load_from_memory(captured.bytes()).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn data_url_has_mime_prefix() {
        let captured = CapturedImage::new(vec![1u8, 2, 3], "image/png", 1, 1, ImageSource::Frame);
        assert_eq!(captured.data_url(), "data:image/png;base64,AQID");
    }

    #[test]
    fn extension_follows_mime() {
        let png = CapturedImage::new(vec![0u8], "image/png", 1, 1, ImageSource::Frame);
        let jpeg = CapturedImage::new(vec![0u8], "image/jpeg", 1, 1, ImageSource::Frame);
        assert_eq!(png.extension(), "png");
        assert!(matches!(jpeg.extension(), "jpg" | "jpeg"));
    }
}
