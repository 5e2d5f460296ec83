use retroboy_common::Color;

use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Output image the scanline renderers draw into.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pixels: Vec<Color>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![Color::BLACK; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        self.pixels[y * SCREEN_WIDTH + x] = color;
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    pub fn fill_line(&mut self, y: usize, color: Color) {
        let start = y * SCREEN_WIDTH;
        self.pixels[start..start + SCREEN_WIDTH].fill(color);
    }

    /// Copy the image into an RGB24 buffer (3 bytes per pixel), stopping at
    /// whichever of the two runs out first.
    pub fn copy_rgb24(&self, buffer: &mut [u8]) {
        for (dst, color) in buffer.chunks_exact_mut(3).zip(&self.pixels) {
            let (r, g, b) = color.rgb();
            dst[0] = r;
            dst[1] = g;
            dst[2] = b;
        }
    }
}
