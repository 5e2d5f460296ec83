mod background;
mod bg_control;
mod framebuffer;
mod tile_map;

use retroboy_common::Color;

pub use background::{Background, ScanlineIndices};
pub use bg_control::{BgControlRegister, BgPaletteMode, BgSize, ControlChange, ControlObserver};
pub use framebuffer::FrameBuffer;
pub use tile_map::{TileMap, TileMapEntry};

use super::region::read_u16;
use crate::SCREEN_WIDTH;

/// Number of colours in the background half of palette RAM.
pub const BG_PALETTE_LEN: usize = 256;

const DISPCNT_FORCED_BLANK: u16 = 1 << 7;

/// Display control plus the four background layers.
///
/// The backgrounds live here, next to the DISPCNT value that decides
/// whether each of them is a text or an affine layer.
#[derive(Clone, Debug)]
pub struct LcdController {
    pub backgrounds: [Background; 4],
    dispcnt: u16,
}

impl Default for LcdController {
    fn default() -> Self {
        Self::new()
    }
}

impl LcdController {
    pub fn new() -> Self {
        Self {
            backgrounds: [
                Background::new(0),
                Background::new(1),
                Background::new(2),
                Background::new(3),
            ],
            dispcnt: 0,
        }
    }

    pub fn dispcnt(&self) -> u16 {
        self.dispcnt
    }

    /// Write one byte of DISPCNT. A mode change re-decodes which layers are
    /// affine: mode 1 makes BG2 affine, mode 2 makes BG2 and BG3 affine.
    pub fn write_dispcnt(&mut self, byte: usize, value: u8) {
        let mut bytes = self.dispcnt.to_le_bytes();
        bytes[byte & 1] = value;
        self.dispcnt = u16::from_le_bytes(bytes);

        let mode = self.bg_mode();
        self.backgrounds[2].set_affine(mode == 1 || mode == 2);
        self.backgrounds[3].set_affine(mode == 2);
    }

    /// Video mode, DISPCNT bits 0-2.
    pub fn bg_mode(&self) -> u8 {
        (self.dispcnt & 0x07) as u8
    }

    /// Screen display bits 8-11.
    pub fn bg_enabled(&self, number: usize) -> bool {
        (self.dispcnt & (1 << (8 + number))) != 0
    }

    /// Whether the current mode has background `number` at all: mode 0 has
    /// BG0-BG3, mode 1 BG0-BG2, mode 2 BG2-BG3. Bitmap modes have none.
    pub fn bg_in_mode(&self, number: usize) -> bool {
        match self.bg_mode() {
            0 => number < 4,
            1 => number < 3,
            2 => number == 2 || number == 3,
            _ => false,
        }
    }

    /// Compose one scanline from every enabled text background.
    ///
    /// Lower priority values draw on top; ties go to the lower background
    /// number. Transparent pixels let lower layers and finally the backdrop
    /// show through. Bitmap modes (3-5) and affine layers are not
    /// rasterised and leave the backdrop visible.
    pub fn render_scanline(
        &self,
        scanline: usize,
        vram: &[u8],
        palette_ram: &[u8],
        frame: &mut FrameBuffer,
    ) {
        if (self.dispcnt & DISPCNT_FORCED_BLANK) != 0 {
            frame.fill_line(scanline, Color::WHITE);
            return;
        }

        let palette = bg_palette(palette_ram);
        frame.fill_line(scanline, palette[0]);

        // Back to front.
        let mut order = [0usize, 1, 2, 3];
        order.sort_unstable_by_key(|&n| std::cmp::Reverse((self.backgrounds[n].priority(), n)));

        let mut indices: ScanlineIndices = [0; SCREEN_WIDTH];
        for n in order {
            let bg = &self.backgrounds[n];
            if !self.bg_in_mode(n) || !self.bg_enabled(n) || bg.is_affine() {
                continue;
            }
            bg.sample_scanline(scanline, vram, &mut indices);
            for (x, &index) in indices.iter().enumerate() {
                if index != 0 {
                    frame.set_pixel(x, scanline, palette[index as usize]);
                }
            }
        }
    }
}

/// Decode the 256 background colours from the first half of palette RAM.
pub fn bg_palette(palette_ram: &[u8]) -> [Color; BG_PALETTE_LEN] {
    let mut palette = [Color::BLACK; BG_PALETTE_LEN];
    for (i, color) in palette.iter_mut().enumerate() {
        *color = Color::from_bgr555(read_u16(palette_ram, i * 2));
    }
    palette
}
