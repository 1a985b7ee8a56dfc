use std::cell::RefCell;
use std::rc::Rc;

use crate::editor::OverlayEditor;
use gtk4::prelude::*;
use gtk4::DrawingArea;
use image::RgbaImage;

pub(super) fn build_editor_canvas(editor: &Rc<RefCell<OverlayEditor>>) -> DrawingArea {
    let size = editor.borrow().surface_size();
    let canvas = DrawingArea::new();
    // Fixed intrinsic size keeps event coordinates 1:1 with surface pixels.
    canvas.set_content_width(i32::try_from(size.width).unwrap_or(i32::MAX));
    canvas.set_content_height(i32::try_from(size.height).unwrap_or(i32::MAX));
    canvas.set_hexpand(false);
    canvas.set_vexpand(false);
    canvas.set_halign(gtk4::Align::Center);

    let editor = editor.clone();
    canvas.set_draw_func(move |_, context, width, height| {
        if width <= 0 || height <= 0 {
            return;
        }
        let mut editor = editor.borrow_mut();
        if !editor.has_background() {
            return;
        }
        let Some(surface) = rgba_image_to_cairo_surface(editor.frame()) else {
            tracing::warn!("failed to convert editor frame to cairo surface");
            return;
        };
        if let Err(err) = context.set_source_surface(&surface, 0.0, 0.0) {
            tracing::warn!(?err, "failed to set editor frame as cairo source");
            return;
        }
        if let Err(err) = context.paint() {
            tracing::warn!(?err, "failed to paint editor frame");
        }
    });
    canvas
}

/// Converts straight RGBA into cairo's premultiplied native-endian ARGB32.
pub(super) fn rgba_image_to_cairo_surface(
    image: &RgbaImage,
) -> Option<gtk4::cairo::ImageSurface> {
    let width = i32::try_from(image.width()).ok()?;
    let height = i32::try_from(image.height()).ok()?;
    let mut surface =
        gtk4::cairo::ImageSurface::create(gtk4::cairo::Format::ARgb32, width, height).ok()?;
    let stride = usize::try_from(surface.stride()).ok()?;

    {
        let mut data = surface.data().ok()?;
        let row_len = usize::try_from(image.width()).ok()?.checked_mul(4)?;
        for (row_index, src_row) in image.as_raw().chunks_exact(row_len.max(1)).enumerate() {
            let dst_row_offset = row_index.checked_mul(stride)?;
            let dst_row_end = dst_row_offset.checked_add(row_len)?;
            let dst_row = data.get_mut(dst_row_offset..dst_row_end)?;
            for (src_pixel, dst_pixel) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
                let [r, g, b, a] = [src_pixel[0], src_pixel[1], src_pixel[2], src_pixel[3]];
                let premultiply = |channel: u8| -> u8 {
                    ((u16::from(channel) * u16::from(a) + 127) / 255) as u8
                };
                let bgra = match a {
                    0 => [0, 0, 0, 0],
                    255 => [b, g, r, 255],
                    _ => [premultiply(b), premultiply(g), premultiply(r), a],
                };
                dst_pixel.copy_from_slice(&bgra);
            }
        }
    }

    surface.flush();
    Some(surface)
}
