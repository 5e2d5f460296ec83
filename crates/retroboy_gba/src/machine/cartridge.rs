use std::path::Path;

use super::error::{GbaError, GbaResult, ImageKind};

/// Largest Game Pak ROM the 0x08000000-0x09FFFFFF window can address.
pub const MAX_ROM_SIZE: usize = 32 * 1024 * 1024;

const TITLE_OFFSET: usize = 0x0A0;
const TITLE_LEN: usize = 12;
const GAME_CODE_OFFSET: usize = 0x0AC;
const MAKER_CODE_OFFSET: usize = 0x0B0;
const FIXED_VALUE_OFFSET: usize = 0x0B2;
const SOFTWARE_VERSION_OFFSET: usize = 0x0BC;
const COMPLEMENT_OFFSET: usize = 0x0BD;
/// Value every licensed cartridge carries at 0xB2.
const FIXED_VALUE: u8 = 0x96;

/// Cartridge ROM image plus the decoded header.
///
/// Header layout (GBATEK "GBA Cartridge Header"):
/// - 0x000  4  ROM entry point (32-bit ARM branch)
/// - 0x004  156 Nintendo logo
/// - 0x0A0  12 Game title (uppercase ASCII)
/// - 0x0AC  4  Game code
/// - 0x0B0  2  Maker code
/// - 0x0B2  1  Fixed value (0x96)
/// - 0x0BC  1  Software version
/// - 0x0BD  1  Complement check over 0xA0..=0xBC
///
/// Images too short to hold a header are accepted; their header fields read
/// as empty strings and zero.
#[derive(Clone, Debug)]
pub struct Rom {
    data: Vec<u8>,
    title: String,
    game_code: String,
    maker_code: String,
    software_version: u8,
    entry_point: u32,
    file_name: Option<String>,
}

impl Rom {
    pub fn from_bytes(data: Vec<u8>) -> GbaResult<Self> {
        if data.is_empty() {
            return Err(GbaError::ImageLoad {
                image: ImageKind::Rom,
                reason: "image is empty".to_string(),
            });
        }
        if data.len() > MAX_ROM_SIZE {
            return Err(GbaError::ImageLoad {
                image: ImageKind::Rom,
                reason: format!(
                    "image is {} bytes, larger than the {} byte cartridge window",
                    data.len(),
                    MAX_ROM_SIZE
                ),
            });
        }

        let mut rom = Self {
            title: header_ascii(&data, TITLE_OFFSET, TITLE_LEN),
            game_code: header_ascii(&data, GAME_CODE_OFFSET, 4),
            maker_code: header_ascii(&data, MAKER_CODE_OFFSET, 2),
            software_version: data.get(SOFTWARE_VERSION_OFFSET).copied().unwrap_or(0),
            entry_point: 0,
            file_name: None,
            data,
        };
        rom.entry_point = rom.read_word(0);
        rom.verify_header();

        log::debug!(
            "GBA ROM: {} bytes, title '{}', code '{}', entry 0x{:08X}",
            rom.data.len(),
            rom.title,
            rom.game_code,
            rom.entry_point
        );
        Ok(rom)
    }

    pub fn load(path: impl AsRef<Path>) -> GbaResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| GbaError::Io {
            image: ImageKind::Rom,
            source,
        })?;
        let mut rom = Self::from_bytes(data)?;
        rom.file_name = Some(path.display().to_string());
        Ok(rom)
    }

    /// Check the fixed byte and the header complement. Mismatches are only
    /// logged: homebrew images routinely leave them blank.
    fn verify_header(&self) {
        if self.data.len() <= COMPLEMENT_OFFSET {
            return;
        }

        let fixed = self.data[FIXED_VALUE_OFFSET];
        if fixed != FIXED_VALUE {
            log::warn!(
                "GBA ROM header: fixed value is 0x{:02X}, expected 0x{:02X}",
                fixed,
                FIXED_VALUE
            );
        }

        let expected = self.expected_complement();
        let stored = self.data[COMPLEMENT_OFFSET];
        if stored != expected {
            log::warn!(
                "GBA ROM header: complement check is 0x{:02X}, expected 0x{:02X}",
                stored,
                expected
            );
        }
    }

    /// `-(sum of 0xA0..=0xBC) - 0x19`, truncated to a byte.
    fn expected_complement(&self) -> u8 {
        let sum = self.data[TITLE_OFFSET..COMPLEMENT_OFFSET]
            .iter()
            .fold(0u8, |acc, &b| acc.wrapping_add(b));
        0u8.wrapping_sub(sum).wrapping_sub(0x19)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn game_code(&self) -> &str {
        &self.game_code
    }

    pub fn maker_code(&self) -> &str {
        &self.maker_code
    }

    pub fn software_version(&self) -> u8 {
        self.software_version
    }

    /// First word of the image: the ARM branch the BIOS jumps through.
    pub fn entry_point(&self) -> u32 {
        self.entry_point
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read one byte at `offset` from the start of the cartridge window.
    ///
    /// Past the end of the image the Game Pak bus floats and returns the
    /// low bits of the halfword address that was latched for the access.
    #[inline]
    pub fn read_byte(&self, offset: u32) -> u8 {
        match self.data.get(offset as usize) {
            Some(&b) => b,
            None => {
                let latched = ((offset >> 1) & 0xFFFF) as u16;
                latched.to_le_bytes()[(offset & 1) as usize]
            }
        }
    }

    #[inline]
    pub fn read_half_word(&self, offset: u32) -> u16 {
        u16::from_le_bytes([self.read_byte(offset), self.read_byte(offset.wrapping_add(1))])
    }

    #[inline]
    pub fn read_word(&self, offset: u32) -> u32 {
        u32::from_le_bytes([
            self.read_byte(offset),
            self.read_byte(offset.wrapping_add(1)),
            self.read_byte(offset.wrapping_add(2)),
            self.read_byte(offset.wrapping_add(3)),
        ])
    }
}

/// Fixed-width ASCII header field with trailing NULs removed. Missing bytes
/// (short images) simply shorten the field.
fn header_ascii(data: &[u8], offset: usize, len: usize) -> String {
    let end = (offset + len).min(data.len());
    let Some(bytes) = data.get(offset..end) else {
        return String::new();
    };
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .to_string()
}
