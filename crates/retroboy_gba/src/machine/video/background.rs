use retroboy_common::Color;

use super::bg_control::{
    BgControlRegister, BgPaletteMode, BgSize, ControlChange, ControlObserver,
};
use super::framebuffer::FrameBuffer;
use super::tile_map::TileMap;
use crate::SCREEN_WIDTH;

const TILE_SIZE_4BPP: u32 = 32;
const TILE_SIZE_8BPP: u32 = 64;
/// Background tile fetches past the first 64 KiB of VRAM (object tiles)
/// read as zero in text modes.
const BG_VRAM_LIMIT: u32 = 0x1_0000;

/// Palette indices for one scanline of a background; 0 marks a
/// transparent pixel.
pub type ScanlineIndices = [u8; SCREEN_WIDTH];

/// Derived state a background re-caches whenever its control register is
/// written.
#[derive(Clone, Debug)]
struct RenderState {
    tile_map: TileMap,
    tile_data_offset: u32,
    palette_mode: BgPaletteMode,
    size: BgSize,
    /// Set by the display mode (DISPCNT) rather than by BGxCNT.
    affine: bool,
}

impl ControlObserver for RenderState {
    fn reset_tile_map(&mut self, control: &BgControlRegister) {
        let base = control.tile_map_offset();
        log::debug!(
            "GBA BG: tile map base 0x{:05X} -> 0x{:05X}",
            self.tile_map.base_offset(),
            base
        );
        self.tile_map.reset(base, control.size(self.affine));
    }

    fn cache_render_data(&mut self, control: &BgControlRegister) {
        self.tile_data_offset = control.tile_data_offset();
        self.palette_mode = control.palette_mode();
        self.size = control.size(self.affine);
        self.tile_map.set_size(self.size);
    }
}

/// One of the four tiled background layers.
///
/// Owns its control register together with the affine flag needed to
/// decode the size field, so neither has to reach back into the other.
#[derive(Clone, Debug)]
pub struct Background {
    number: usize,
    control: BgControlRegister,
    render: RenderState,
    /// Horizontal scroll (BGxHOFS), in pixels.
    pub scroll_x: u32,
    /// Vertical scroll (BGxVOFS), in pixels.
    pub scroll_y: u32,
}

impl Background {
    pub fn new(number: usize) -> Self {
        let control = BgControlRegister::default();
        let size = control.size(false);
        let mut bg = Self {
            number,
            control,
            render: RenderState {
                tile_map: TileMap::new(control.tile_map_offset(), size),
                tile_data_offset: 0,
                palette_mode: BgPaletteMode::Palette16x16,
                size,
                affine: false,
            },
            scroll_x: 0,
            scroll_y: 0,
        };
        bg.reset();
        bg
    }

    /// Re-derive the tile map and the cached render data from the control
    /// register.
    pub fn reset(&mut self) {
        self.render.reset_tile_map(&self.control);
        self.render.cache_render_data(&self.control);
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn control(&self) -> &BgControlRegister {
        &self.control
    }

    /// Write one byte of BGxCNT and apply its side effects.
    pub fn write_control(&mut self, byte: usize, value: u8) -> ControlChange {
        self.control.write(byte, value, &mut self.render)
    }

    pub fn is_affine(&self) -> bool {
        self.render.affine
    }

    /// Switch between text and affine decoding of the size field.
    pub fn set_affine(&mut self, affine: bool) {
        if self.render.affine != affine {
            self.render.affine = affine;
            self.render.cache_render_data(&self.control);
        }
    }

    pub fn tile_map(&self) -> &TileMap {
        &self.render.tile_map
    }

    pub fn tile_data_offset(&self) -> u32 {
        self.render.tile_data_offset
    }

    pub fn palette_mode(&self) -> BgPaletteMode {
        self.render.palette_mode
    }

    pub fn size(&self) -> BgSize {
        self.render.size
    }

    pub fn priority(&self) -> u8 {
        self.control.priority()
    }

    pub fn width_in_pixels(&self) -> u32 {
        self.render.size.width()
    }

    pub fn height_in_pixels(&self) -> u32 {
        self.render.size.height()
    }

    /// Render one scanline into `frame`, drawing the backdrop (palette
    /// entry 0) wherever the background is transparent.
    pub fn render_scanline(
        &self,
        scanline: usize,
        vram: &[u8],
        palette: &[Color],
        frame: &mut FrameBuffer,
    ) {
        let mut indices = [0u8; SCREEN_WIDTH];
        self.sample_scanline(scanline, vram, &mut indices);
        for (x, &index) in indices.iter().enumerate() {
            frame.set_pixel(x, scanline, palette[index as usize]);
        }
    }

    /// Resolve the palette index of every pixel on `scanline`.
    ///
    /// Affine backgrounds are not rasterised and come out fully transparent.
    pub fn sample_scanline(&self, scanline: usize, vram: &[u8], out: &mut ScanlineIndices) {
        if self.render.affine {
            out.fill(0);
            return;
        }

        let width = self.width_in_pixels();
        let height = self.height_in_pixels();

        let mut scroll_x = self.scroll_x;
        if scroll_x >= width {
            scroll_x %= width;
        }
        let scroll_y = self.scroll_y % height;
        let bg_y = (scroll_y + scanline as u32) % height;
        let tile_row = bg_y % 8;

        for (x, slot) in out.iter_mut().enumerate() {
            // Wrap around the right edge of the background.
            let mut bg_x = scroll_x + x as u32;
            if bg_x >= width {
                bg_x -= width;
            }
            let tile_column = bg_x % 8;

            let entry = self.render.tile_map.entry_at(vram, bg_x, bg_y);
            let row = if entry.v_flip { 7 - tile_row } else { tile_row };
            let column = if entry.h_flip { 7 - tile_column } else { tile_column };
            let tile = entry.tile_index as u32;

            *slot = match self.render.palette_mode {
                BgPaletteMode::Palette16x16 => {
                    // 4 bytes per tile row, 2 pixels per byte (low nibble first).
                    let addr = self.render.tile_data_offset
                        + tile * TILE_SIZE_4BPP
                        + row * 4
                        + (column >> 1);
                    let byte = tile_byte(vram, addr);
                    let pixel = if (column & 1) == 0 {
                        byte & 0x0F
                    } else {
                        byte >> 4
                    };
                    // Pixel 0 is transparent and shows the global backdrop,
                    // never entry 0 of the selected sub-palette.
                    if pixel == 0 {
                        0
                    } else {
                        entry.palette * 16 + pixel
                    }
                }
                BgPaletteMode::Palette256x1 => {
                    let addr =
                        self.render.tile_data_offset + tile * TILE_SIZE_8BPP + row * 8 + column;
                    tile_byte(vram, addr)
                }
            };
        }
    }
}

#[inline]
fn tile_byte(vram: &[u8], addr: u32) -> u8 {
    if addr >= BG_VRAM_LIMIT {
        0
    } else {
        vram[addr as usize]
    }
}
