use super::bg_control::{BgSize, SCREEN_BLOCK_SIZE};
use crate::machine::region::read_u16;

/// Entries per row (and per column) of one screen block.
const BLOCK_TILES: u32 = 32;

/// One 16-bit text-mode screen entry.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TileMapEntry {
    /// Bits 0-9.
    pub tile_index: u16,
    /// Bit 10.
    pub h_flip: bool,
    /// Bit 11.
    pub v_flip: bool,
    /// Bits 12-15; only meaningful in 16-colour mode.
    pub palette: u8,
}

impl TileMapEntry {
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self {
            tile_index: raw & 0x03FF,
            h_flip: (raw & 0x0400) != 0,
            v_flip: (raw & 0x0800) != 0,
            palette: (raw >> 12) as u8,
        }
    }
}

/// View of VRAM as a grid of screen entries.
///
/// Entries are decoded on every lookup; only the geometry (base offset and
/// size) is held here. A 512-pixel axis spans two 32x32 screen blocks,
/// horizontal neighbours first, so a 512x512 map is laid out as
///
/// ```text
/// SB0 SB1
/// SB2 SB3
/// ```
#[derive(Clone, Debug)]
pub struct TileMap {
    base: u32,
    size: BgSize,
    #[cfg(test)]
    pub(crate) reset_count: u32,
}

impl TileMap {
    pub fn new(base: u32, size: BgSize) -> Self {
        Self {
            base,
            size,
            #[cfg(test)]
            reset_count: 0,
        }
    }

    /// Discard the current geometry and re-derive it from a new base.
    pub fn reset(&mut self, base: u32, size: BgSize) {
        self.base = base;
        self.size = size;
        #[cfg(test)]
        {
            self.reset_count += 1;
        }
    }

    /// Adopt a new size without moving the map (size bits changed, base did not).
    pub fn set_size(&mut self, size: BgSize) {
        self.size = size;
    }

    pub fn base_offset(&self) -> u32 {
        self.base
    }

    pub fn size(&self) -> BgSize {
        self.size
    }

    /// VRAM byte offset of the entry covering background pixel (`bg_x`, `bg_y`).
    ///
    /// Coordinates must already be wrapped into the background.
    pub fn entry_offset(&self, bg_x: u32, bg_y: u32) -> u32 {
        let tile_x = bg_x / 8;
        let tile_y = bg_y / 8;
        let blocks_per_row = (self.size.width() / 256).max(1);
        let block = (tile_x / BLOCK_TILES) + (tile_y / BLOCK_TILES) * blocks_per_row;
        let within = (tile_y % BLOCK_TILES) * BLOCK_TILES + (tile_x % BLOCK_TILES);
        self.base + block * SCREEN_BLOCK_SIZE + within * 2
    }

    /// Decode the entry covering background pixel (`bg_x`, `bg_y`).
    pub fn entry_at(&self, vram: &[u8], bg_x: u32, bg_y: u32) -> TileMapEntry {
        // Highest reachable entry: block 31 + 3 blocks + 2046 < 72 KiB.
        let offset = self.entry_offset(bg_x, bg_y) as usize;
        TileMapEntry::from_raw(read_u16(vram, offset))
    }
}
