//! The display surface boundary and aspect-fit placement.
//!
//! The host owns windowing and GPU upload; the engine only writes packed
//! pixels into a video-sized image, asks for an upload, and issues one
//! textured-quad draw per render tick into an aspect-correct rectangle.

/// Destination rectangle for the textured-quad draw, in surface
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// A host-side image the engine paints video frames into.
///
/// `image_size` is the video-sized pixel image created for the session;
/// `surface_size` is the drawable area the quad is placed in. Pixels are
/// packed `0xAABBGGRR` with full alpha.
pub trait DisplaySurface {
    fn surface_size(&self) -> (u32, u32);
    fn image_size(&self) -> (u32, u32);
    fn set_pixel(&mut self, x: u32, y: u32, packed: u32);
    /// Uploads the image to the texture. Called from the render thread.
    fn upload(&mut self);
    /// Draws the textured quad at `dest`. Called once per render tick.
    fn draw(&mut self, dest: DrawRect);
    fn destroy(&mut self);
}

/// Allocates a video-sized image on the host surface.
pub trait SurfaceProvider {
    fn create_image(&mut self, width: u32, height: u32) -> Box<dyn DisplaySurface>;
}

/// Computes the largest centered rectangle with the video's aspect ratio
/// that fits the surface (letterboxing or pillarboxing as needed).
pub fn fit_rect(surface_w: u32, surface_h: u32, video_w: u32, video_h: u32) -> DrawRect {
    if video_w == 0 || video_h == 0 || surface_w == 0 || surface_h == 0 {
        return DrawRect {
            x: 0,
            y: 0,
            width: surface_w,
            height: surface_h,
        };
    }

    let video_aspect = video_w as f32 / video_h as f32;
    let surface_aspect = surface_w as f32 / surface_h as f32;

    if surface_aspect > video_aspect {
        // Surface wider than the video: full height, centered horizontally.
        let height = surface_h;
        let width = (height as f32 * video_aspect) as u32;
        DrawRect {
            x: ((surface_w - width) / 2) as i32,
            y: 0,
            width,
            height,
        }
    } else {
        let width = surface_w;
        let height = (width as f32 / video_aspect) as u32;
        DrawRect {
            x: 0,
            y: ((surface_h - height) / 2) as i32,
            width,
            height,
        }
    }
}
