//! Overlay editor state: background, overlay asset, placement and gesture tracking.

mod gesture;
mod overlay;
mod placement;
mod touch;
pub mod upload;

use std::io::Cursor;
use std::path::PathBuf;

use crate::geometry::{SurfacePoint, SurfaceSize};
use crate::render::{self, RasterLayer, RenderError};
use image::{ImageFormat, RgbaImage};
use thiserror::Error;

pub use gesture::GestureMode;
pub use overlay::OverlayAsset;
pub use placement::{Placement, MIN_OVERLAY_SIZE};
pub use touch::PinchState;
pub use upload::{PendingUpload, UploadOutcome, UploadPoll, UploadTicket};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to read image {}: {source}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("decoded image has no pixels")]
    EmptyImage,
    #[error("failed to encode surface as png: {0}")]
    Encode(#[source] image::ImageError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type EditorResult<T> = std::result::Result<T, EditorError>;

/// Single-surface editor compositing one overlay over one background.
///
/// Placement and background changes mark the surface dirty; [`OverlayEditor::frame`]
/// re-renders lazily so a burst of gesture events costs one composite.
#[derive(Debug)]
pub struct OverlayEditor {
    surface: RgbaImage,
    overlay: OverlayAsset,
    overlay_layer: Option<RasterLayer>,
    background: Option<RasterLayer>,
    placement: Placement,
    mode: GestureMode,
    pinch: Option<PinchState>,
    latest_upload: u64,
    needs_render: bool,
}

impl OverlayEditor {
    pub fn new(surface_size: SurfaceSize, overlay: OverlayAsset) -> Self {
        let overlay_layer = RasterLayer::from_rgba(overlay.image()).unwrap_or_else(|err| {
            tracing::warn!(%err, "overlay asset cannot be rendered; overlay will not be drawn");
            None
        });
        Self {
            surface: RgbaImage::new(surface_size.width, surface_size.height),
            overlay,
            overlay_layer,
            background: None,
            placement: Placement::default(),
            mode: GestureMode::Idle,
            pinch: None,
            latest_upload: 0,
            needs_render: false,
        }
    }

    pub fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.surface.width(), self.surface.height())
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    pub fn pinch(&self) -> Option<PinchState> {
        self.pinch
    }

    pub fn overlay(&self) -> &OverlayAsset {
        &self.overlay
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Replaces the placement outright, bypassing gesture rules.
    pub fn set_placement(&mut self, placement: Placement) {
        self.update_placement(placement);
    }

    fn update_placement(&mut self, next: Placement) -> bool {
        if next == self.placement {
            return false;
        }
        self.placement = next;
        self.needs_render = true;
        true
    }

    /// Issues a ticket for a new upload; every earlier ticket becomes stale.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.latest_upload = self.latest_upload.saturating_add(1);
        let ticket = UploadTicket::new(self.latest_upload);
        tracing::info!(ticket = ticket.sequence(), "background upload started");
        ticket
    }

    pub fn is_current_upload(&self, ticket: UploadTicket) -> bool {
        ticket.sequence() == self.latest_upload
    }

    /// Applies a finished decode if `ticket` is still the newest upload.
    ///
    /// `result` is expected to be surface-sized already (see
    /// [`upload::spawn_decode`]); any other size is scaled while compositing.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: EditorResult<RgbaImage>,
    ) -> UploadOutcome {
        if !self.is_current_upload(ticket) {
            tracing::info!(
                ticket = ticket.sequence(),
                latest = self.latest_upload,
                "dropping decode from superseded upload"
            );
            return UploadOutcome::Superseded;
        }
        let layer = result.and_then(|prepared| {
            RasterLayer::from_rgba(&prepared)?.ok_or(EditorError::EmptyImage)
        });
        match layer {
            Ok(layer) => {
                tracing::info!(
                    ticket = ticket.sequence(),
                    width = layer.width(),
                    height = layer.height(),
                    "background replaced"
                );
                self.background = Some(layer);
                self.needs_render = true;
                UploadOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(ticket = ticket.sequence(), %err, "background upload failed");
                UploadOutcome::Failed(err)
            }
        }
    }

    /// Composites background and overlay into the surface.
    /// Returns `Ok(false)` without touching the surface when no background is loaded.
    pub fn render(&mut self) -> EditorResult<bool> {
        let Some(background) = self.background.as_ref() else {
            return Ok(false);
        };
        render::composite(
            &mut self.surface,
            background,
            self.overlay_layer.as_ref(),
            &self.placement,
        )?;
        self.needs_render = false;
        Ok(true)
    }

    /// Current surface, re-rendered first if anything changed since the last frame.
    /// A failed render leaves the previous frame in place.
    pub fn frame(&mut self) -> &RgbaImage {
        if self.needs_render {
            if let Err(err) = self.render() {
                tracing::warn!(%err, "surface render failed");
            }
        }
        &self.surface
    }

    /// PNG encoding of the current frame. Blank if no background was ever loaded.
    pub fn export_png(&mut self) -> EditorResult<Vec<u8>> {
        let frame = self.frame();
        let mut bytes = Vec::new();
        frame
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(EditorError::Encode)?;
        tracing::info!(bytes = bytes.len(), "surface encoded for export");
        Ok(bytes)
    }
}
