//! Compositing of the background and the transformed overlay onto the surface.

use std::sync::Arc;

use image::{imageops, RgbaImage};
use thiserror::Error;
use vello_cpu::kurbo::{Affine, Rect};
use vello_cpu::peniko::color::PremulRgba8;

use crate::editor::Placement;
use crate::geometry::SurfaceSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("raster of {width}x{height} exceeds the renderer's {max}px limit", max = u16::MAX)]
    Oversized { width: u32, height: u32 },
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Stretches `background` to exactly fill the surface; aspect ratio is not kept.
pub fn stretch_to_surface(background: &RgbaImage, size: SurfaceSize) -> RgbaImage {
    if background.dimensions() == (size.width, size.height) {
        return background.clone();
    }
    imageops::resize(
        background,
        size.width,
        size.height,
        imageops::FilterType::Triangle,
    )
}

/// A raster converted once into a premultiplied image paint.
#[derive(Clone)]
pub struct RasterLayer {
    paint: vello_cpu::Image,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for RasterLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterLayer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl RasterLayer {
    /// `Ok(None)` for a zero-sized raster, which has nothing to draw.
    pub fn from_rgba(image: &RgbaImage) -> RenderResult<Option<Self>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(None);
        }
        let oversized = RenderError::Oversized { width, height };
        let w = u16::try_from(width).map_err(|_| oversized)?;
        let h = u16::try_from(height).map_err(|_| oversized)?;

        let mut may_have_opacities = false;
        let pixels = image
            .pixels()
            .map(|pixel| {
                let [r, g, b, a] = premul_rgba8(pixel.0);
                may_have_opacities |= a != u8::MAX;
                PremulRgba8 { r, g, b, a }
            })
            .collect::<Vec<_>>();
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
        Ok(Some(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width,
            height,
        }))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Clears `surface`, paints the background over the whole surface, then draws the
/// overlay rotated about the placement center.
pub fn composite(
    surface: &mut RgbaImage,
    background: &RasterLayer,
    overlay: Option<&RasterLayer>,
    placement: &Placement,
) -> RenderResult<()> {
    let (width, height) = surface.dimensions();
    let oversized = RenderError::Oversized { width, height };
    let w = u16::try_from(width).map_err(|_| oversized)?;
    let h = u16::try_from(height).map_err(|_| oversized)?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(Affine::IDENTITY);

    ctx.set_transform(Affine::scale_non_uniform(
        f64::from(width) / f64::from(background.width),
        f64::from(height) / f64::from(background.height),
    ));
    ctx.set_paint(background.paint.clone());
    ctx.fill_rect(&background.bounds());

    if let Some(layer) = overlay {
        if let Some(transform) = overlay_transform(layer, placement) {
            ctx.set_transform(transform);
            ctx.set_paint(layer.paint.clone());
            ctx.fill_rect(&layer.bounds());
        }
    }

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    for (src, dst) in pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .zip(surface.pixels_mut())
    {
        dst.0 = unpremul_rgba8([src[0], src[1], src[2], src[3]]);
    }
    Ok(())
}

/// Maps overlay pixel space onto the surface: translate to the placement center,
/// rotate, then draw with the top-left at `(-size/2, -size/2)`. The asset is
/// scaled uniformly to `size` wide, so a non-square asset's height extends
/// downward from there rather than being centered.
fn overlay_transform(layer: &RasterLayer, placement: &Placement) -> Option<Affine> {
    let center = placement.center();
    let half = placement.size / 2.0;
    let scale = placement.size / f64::from(layer.width);
    let transform = Affine::translate((center.x, center.y))
        * Affine::rotate(placement.rotation.to_radians())
        * Affine::translate((-half, -half))
        * Affine::scale(scale);
    transform
        .as_coeffs()
        .iter()
        .all(|coeff| coeff.is_finite())
        .then_some(transform)
}

fn premul_rgba8([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    match a {
        0 => [0, 0, 0, 0],
        u8::MAX => [r, g, b, a],
        _ => {
            let premul = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
            [premul(r), premul(g), premul(b), a]
        }
    }
}

fn unpremul_rgba8([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    match a {
        0 => [0, 0, 0, 0],
        u8::MAX => [r, g, b, a],
        _ => {
            let unpremul =
                |c: u8| ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8;
            [unpremul(r), unpremul(g), unpremul(b), a]
        }
    }
}
