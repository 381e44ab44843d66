//! Converting raw frames into the host's displayable image.
//!
//! Frames arrive as packed BGR24 rows; the surface wants one packed
//! `0xAABBGGRR` value per pixel. Must be called from the render thread,
//! which is the only place uploads are legal.

use tracing::trace;

use crate::media::frame::{RawFrame, BYTES_PER_PIXEL};
use crate::render::surface::DisplaySurface;

/// Writes a frame's pixels into the surface image and uploads it.
///
/// Dimensions are clamped to the smaller of frame and image, and a stride
/// smaller than a packed row is treated as tightly packed rather than
/// trusted.
pub fn blit_frame(frame: &RawFrame, surface: &mut dyn DisplaySurface) {
    let (img_w, img_h) = surface.image_size();
    let w = frame.width.min(img_w);
    let h = frame.height.min(img_h);

    let packed_row = w as usize * BYTES_PER_PIXEL;
    let stride = frame.stride.max(packed_row);

    for y in 0..h {
        let row = y as usize * stride;
        for x in 0..w {
            let idx = row + x as usize * BYTES_PER_PIXEL;
            if idx + 2 >= frame.buffer.len() {
                trace!("frame buffer shorter than {}x{} at stride {}", w, h, stride);
                surface.upload();
                return;
            }
            let b = frame.buffer[idx] as u32;
            let g = frame.buffer[idx + 1] as u32;
            let r = frame.buffer[idx + 2] as u32;
            surface.set_pixel(x, y, 0xFF00_0000 | (b << 16) | (g << 8) | r);
        }
    }

    surface.upload();
}

/// Paints the whole image opaque black and uploads it; the initial blank
/// frame shown before the first video frame lands.
pub fn fill_black(surface: &mut dyn DisplaySurface) {
    let (w, h) = surface.image_size();
    for y in 0..h {
        for x in 0..w {
            surface.set_pixel(x, y, 0xFF00_0000);
        }
    }
    surface.upload();
}
