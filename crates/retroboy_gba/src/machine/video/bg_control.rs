//! BG0CNT-BG3CNT (0x04000008-0x0400000F).
//!
//! | Bit   | Meaning                                                  |
//! |-------|----------------------------------------------------------|
//! | 0-1   | Priority (0 = highest)                                   |
//! | 2-3   | Character base block, units of 16 KiB (tile data)        |
//! | 4-5   | Unused                                                   |
//! | 6     | Mosaic                                                   |
//! | 7     | Colours/palettes (0 = 16/16, 1 = 256/1)                  |
//! | 8-12  | Screen base block, units of 2 KiB (tile map)             |
//! | 13    | Display area overflow (affine BG2/BG3 only)              |
//! | 14-15 | Screen size; meaning depends on whether the BG is affine |

/// Bytes per character base block.
pub const CHAR_BLOCK_SIZE: u32 = 16 * 1024;
/// Bytes per screen base block.
pub const SCREEN_BLOCK_SIZE: u32 = 2 * 1024;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BgPaletteMode {
    /// 4bpp tiles choosing one of sixteen 16-colour palettes.
    Palette16x16,
    /// 8bpp tiles indexing a single 256-colour palette.
    Palette256x1,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BgSize {
    Bg256x256,
    Bg512x256,
    Bg256x512,
    Bg512x512,
    AffineBg128x128,
    AffineBg256x256,
    AffineBg512x512,
    AffineBg1024x1024,
}

impl BgSize {
    /// Decode the two size bits; affine backgrounds use the upper four
    /// variants.
    pub const fn from_code(code: u8, affine: bool) -> Self {
        match (code & 0x03) + if affine { 4 } else { 0 } {
            0 => BgSize::Bg256x256,
            1 => BgSize::Bg512x256,
            2 => BgSize::Bg256x512,
            3 => BgSize::Bg512x512,
            4 => BgSize::AffineBg128x128,
            5 => BgSize::AffineBg256x256,
            6 => BgSize::AffineBg512x512,
            _ => BgSize::AffineBg1024x1024,
        }
    }

    pub const fn width(self) -> u32 {
        match self {
            BgSize::Bg256x256 | BgSize::Bg256x512 | BgSize::AffineBg256x256 => 256,
            BgSize::Bg512x256 | BgSize::Bg512x512 | BgSize::AffineBg512x512 => 512,
            BgSize::AffineBg128x128 => 128,
            BgSize::AffineBg1024x1024 => 1024,
        }
    }

    pub const fn height(self) -> u32 {
        match self {
            BgSize::Bg256x256 | BgSize::Bg512x256 | BgSize::AffineBg256x256 => 256,
            BgSize::Bg256x512 | BgSize::Bg512x512 | BgSize::AffineBg512x512 => 512,
            BgSize::AffineBg128x128 => 128,
            BgSize::AffineBg1024x1024 => 1024,
        }
    }

    pub const fn is_affine(self) -> bool {
        matches!(
            self,
            BgSize::AffineBg128x128
                | BgSize::AffineBg256x256
                | BgSize::AffineBg512x512
                | BgSize::AffineBg1024x1024
        )
    }
}

/// Notification produced by a control register write.
///
/// Carries the raw 16-bit register value before and after the write so the
/// owner can decide which derived state went stale.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ControlChange {
    pub byte: usize,
    pub old: u16,
    pub new: u16,
}

impl ControlChange {
    /// Whether the tile map (screen base block) moved.
    pub fn screen_base_changed(&self) -> bool {
        screen_base_block(self.old) != screen_base_block(self.new)
    }
}

/// Consumer of control register side effects.
pub trait ControlObserver {
    /// The screen base block changed; any geometry derived from the old
    /// base must be discarded.
    fn reset_tile_map(&mut self, control: &BgControlRegister);
    /// Recompute cached render parameters (tile data base, palette mode).
    fn cache_render_data(&mut self, control: &BgControlRegister);
}

/// Raw BGxCNT bytes plus field decoders.
///
/// Decoding never has side effects; writes go through [`write`] which
/// reports the change to a [`ControlObserver`].
///
/// [`write`]: BgControlRegister::write
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BgControlRegister {
    raw: [u8; 2],
}

impl BgControlRegister {
    #[inline]
    pub fn byte(&self, index: usize) -> u8 {
        self.raw[index & 1]
    }

    #[inline]
    pub fn value(&self) -> u16 {
        u16::from_le_bytes(self.raw)
    }

    /// Store one byte and apply its side effects.
    ///
    /// Byte 0 re-caches render data. Byte 1 additionally resets the tile
    /// map, but only when the screen base block actually changed.
    pub fn write<O: ControlObserver>(
        &mut self,
        index: usize,
        value: u8,
        observer: &mut O,
    ) -> ControlChange {
        let index = index & 1;
        let old = self.value();
        self.raw[index] = value;
        let change = ControlChange {
            byte: index,
            old,
            new: self.value(),
        };

        if index == 1 && change.screen_base_changed() {
            observer.reset_tile_map(self);
        }
        observer.cache_render_data(self);
        change
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        self.raw[0] & 0x03
    }

    /// Character base block index (0-3).
    #[inline]
    pub fn tile_block_base(&self) -> u32 {
        ((self.raw[0] & 0x0C) >> 2) as u32
    }

    /// Byte offset of tile data inside VRAM.
    #[inline]
    pub fn tile_data_offset(&self) -> u32 {
        self.tile_block_base() * CHAR_BLOCK_SIZE
    }

    #[inline]
    pub fn mosaic(&self) -> bool {
        (self.raw[0] & 0x40) != 0
    }

    #[inline]
    pub fn palette_mode(&self) -> BgPaletteMode {
        if (self.raw[0] & 0x80) != 0 {
            BgPaletteMode::Palette256x1
        } else {
            BgPaletteMode::Palette16x16
        }
    }

    /// Screen base block index (0-31).
    #[inline]
    pub fn screen_block_base(&self) -> u32 {
        screen_base_block(self.value())
    }

    /// Byte offset of the tile map inside VRAM.
    #[inline]
    pub fn tile_map_offset(&self) -> u32 {
        self.screen_block_base() * SCREEN_BLOCK_SIZE
    }

    /// Does an affine background wrap around instead of going transparent?
    #[inline]
    pub fn display_area_overflow(&self) -> bool {
        (self.raw[1] & 0x20) != 0
    }

    #[inline]
    pub fn size_code(&self) -> u8 {
        (self.raw[1] & 0xC0) >> 6
    }

    #[inline]
    pub fn size(&self, affine: bool) -> BgSize {
        BgSize::from_code(self.size_code(), affine)
    }
}

#[inline]
fn screen_base_block(value: u16) -> u32 {
    ((value >> 8) & 0x1F) as u32
}
