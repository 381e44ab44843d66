//! Owned pixel buffers detached from the decoder.
//!
//! The decoder reuses its internal buffer on the next grab, so every frame
//! that outlives one decode call must be copied first. `RawFrame` is that
//! copy: a packed BGR24 buffer with an explicit row stride.

/// Bytes per pixel for BGR24, the fixed decode output format.
pub const BYTES_PER_PIXEL: usize = 3;

/// An owned, fixed-format video frame.
///
/// Invariants: `buffer.len() == stride * height` and
/// `stride >= width * BYTES_PER_PIXEL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub buffer: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Bytes per row, including any decoder padding.
    pub stride: usize,
}

impl RawFrame {
    /// Copies a decoder-owned pixel slice into an independent buffer.
    ///
    /// A non-positive `reported_stride` falls back to tightly packed rows
    /// (`width * 3`). The copy is sized exactly `stride * height`; a source
    /// slice shorter than that leaves the tail black rather than failing.
    pub fn copy_from(pixels: &[u8], width: u32, height: u32, reported_stride: i32) -> Self {
        let stride = if reported_stride > 0 {
            reported_stride as usize
        } else {
            width as usize * BYTES_PER_PIXEL
        };
        let expected = stride * height as usize;

        let mut buffer = vec![0u8; expected];
        let n = expected.min(pixels.len());
        buffer[..n].copy_from_slice(&pixels[..n]);

        debug_assert!(stride >= width as usize * BYTES_PER_PIXEL);
        Self {
            buffer,
            width,
            height,
            stride,
        }
    }

    /// Returns one pixel row, without any padding past the visible width.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.buffer[start..start + self.width as usize * BYTES_PER_PIXEL]
    }
}
