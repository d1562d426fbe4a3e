//! The render entry point: article in, stored PNG out.
//!
//! A [`Thumbnailer`] owns everything a render needs that outlives a single
//! call (parsed fonts, palette, storage settings). It is `Send + Sync`; the
//! batch command shares one across rayon workers.
//!
//! ```text
//! LayoutInput ─compose─▶ Scene ─paint─▶ RgbaImage
//!     ─save_png─▶ upload_dir/<uuid>_thumb.png
//! ```

use crate::config::{CardConfig, ConfigError, StorageConfig};
use crate::imaging::{
    EncodeError, FontCache, FontError, Palette, paint, save_png, unique_file_name,
};
use crate::layout::{CanvasSpec, Scene, compose};
use crate::types::{LayoutInput, RenderedThumbnail};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Font asset error: {0}")]
    Asset(#[from] FontError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot create upload directory {}: {source}", path.display())]
    UploadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write thumbnail: {0}")]
    Encode(#[from] EncodeError),
}

pub struct Thumbnailer {
    fonts: Arc<FontCache>,
    palette: Palette,
    storage: StorageConfig,
    canvas: CanvasSpec,
}

impl Thumbnailer {
    pub fn new(fonts: Arc<FontCache>, palette: Palette, storage: StorageConfig) -> Self {
        Self {
            fonts,
            palette,
            storage,
            canvas: CanvasSpec::STANDARD,
        }
    }

    /// Load fonts and palette named by `config`.
    pub fn from_config(config: &CardConfig) -> Result<Self, RenderError> {
        let fonts = FontCache::load(&config.fonts.title, &config.fonts.body)?;
        let palette = config.colors.palette()?;
        log::debug!(
            "loaded fonts {} / {}",
            config.fonts.title.display(),
            config.fonts.body.display()
        );
        Ok(Self::new(Arc::new(fonts), palette, config.storage.clone()))
    }

    /// Layout only. No pixels, no IO.
    pub fn layout(&self, input: &LayoutInput) -> Scene {
        compose(input, &self.canvas, &*self.fonts)
    }

    /// Layout and paint, without touching the filesystem.
    pub fn rasterize(&self, input: &LayoutInput) -> (Scene, RgbaImage) {
        let scene = self.layout(input);
        let image = paint(&scene, &self.fonts, &self.palette);
        (scene, image)
    }

    /// Render `input` to a new file in the upload directory.
    pub fn render(&self, input: &LayoutInput) -> Result<RenderedThumbnail, RenderError> {
        self.render_with_scene(input).map(|(thumbnail, _)| thumbnail)
    }

    /// [`render`](Self::render), also returning the scene that was painted.
    pub fn render_with_scene(
        &self,
        input: &LayoutInput,
    ) -> Result<(RenderedThumbnail, Scene), RenderError> {
        let dir = &self.storage.upload_dir;
        std::fs::create_dir_all(dir).map_err(|source| RenderError::UploadDir {
            path: dir.clone(),
            source,
        })?;

        let (scene, image) = self.rasterize(input);
        let file_name = unique_file_name();
        let file_path = dir.join(&file_name);
        save_png(&image, &file_path)?;

        let thumbnail = RenderedThumbnail {
            image_url: self.storage.image_url(&file_name),
            file_path,
            file_name,
        };
        log::info!("thumbnail saved: {}", thumbnail.file_path.display());
        Ok((thumbnail, scene))
    }
}
