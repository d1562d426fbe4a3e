//! PNG encoding and file output.
//!
//! Files are written to a temp file in the destination directory and renamed
//! into place, so a reader never sees a half-written thumbnail.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

pub const THUMBNAIL_SUFFIX: &str = "_thumb";
pub const THUMBNAIL_EXTENSION: &str = "png";

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// `<uuid-v4>_thumb.png`
pub fn unique_file_name() -> String {
    format!(
        "{}{THUMBNAIL_SUFFIX}.{THUMBNAIL_EXTENSION}",
        Uuid::new_v4()
    )
}

pub fn encode_png<W: Write>(image: &RgbaImage, writer: W) -> Result<(), EncodeError> {
    PngEncoder::new(writer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

/// Encode `image` and atomically place it at `path`.
///
/// The parent directory must already exist.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), EncodeError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".thumb-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode_png(image, &mut writer)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
