use std::path::Path;

use image::RgbaImage;

use super::upload::read_image;
use super::EditorResult;

/// Decorative raster drawn on top of the background. Loaded once, never replaced.
#[derive(Debug, Clone)]
pub struct OverlayAsset {
    image: RgbaImage,
}

impl OverlayAsset {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Stand-in for an asset that could not be loaded: zero-sized, draws nothing.
    pub fn empty() -> Self {
        Self {
            image: RgbaImage::new(0, 0),
        }
    }

    pub fn try_load(path: &Path) -> EditorResult<Self> {
        read_image(path).map(Self::new)
    }

    /// Falls back to [`OverlayAsset::empty`] so a missing asset never blocks the editor.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(asset) => {
                tracing::info!(
                    path = %path.display(),
                    width = asset.width(),
                    height = asset.height(),
                    "loaded overlay asset"
                );
                asset
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "overlay asset unavailable; overlay will not be drawn");
                Self::empty()
            }
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// `height / width`, or 0 for an empty asset.
    pub fn aspect_ratio(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        f64::from(self.height()) / f64::from(self.width())
    }
}
