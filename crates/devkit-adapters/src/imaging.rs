//! Image codec backed by the `image` crate.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader, imageops::FilterType};
use tracing::trace;

use devkit_core::{
    application::{ApplicationError, ports::ImageCodec},
    domain::{CropBox, Dimensions, ImageKind},
    error::DevkitResult,
};

/// Decodes with format sniffing, resamples with Lanczos3 and encodes to
/// PNG or JPEG in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsCodec;

impl ImageRsCodec {
    pub fn new() -> Self {
        Self
    }
}

fn codec_error(path: &Path, e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::ImageCodec {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

impl ImageCodec for ImageRsCodec {
    type Image = DynamicImage;

    fn decode(&self, path: &Path) -> DevkitResult<DynamicImage> {
        // The suffix only picks the output format; the content decides how
        // the file is read.
        let image = ImageReader::open(path)
            .map_err(|e| codec_error(path, e))?
            .with_guessed_format()
            .map_err(|e| codec_error(path, e))?
            .decode()
            .map_err(|e| codec_error(path, e))?;

        trace!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Decoded image"
        );
        Ok(image)
    }

    fn dimensions(&self, image: &DynamicImage) -> Dimensions {
        Dimensions::new(image.width(), image.height())
    }

    fn resize(&self, image: &DynamicImage, size: Dimensions) -> DynamicImage {
        image.resize_exact(size.width, size.height, FilterType::Lanczos3)
    }

    fn crop(&self, image: &DynamicImage, area: CropBox) -> DynamicImage {
        image.crop_imm(area.left, area.top, area.width(), area.height())
    }

    fn encode(&self, image: &DynamicImage, kind: ImageKind) -> DevkitResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        let result = match kind {
            ImageKind::Png => image.write_to(&mut buf, ImageFormat::Png),
            // JPEG has no alpha channel.
            ImageKind::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8())
                .write_to(&mut buf, ImageFormat::Jpeg),
        };
        result.map_err(|e| codec_error(&PathBuf::from(format!("<{kind} output>")), e))?;
        Ok(buf.into_inner())
    }
}
