mod bios;
mod bus;
mod cartridge;
mod error;
mod gameboy_advance;
mod interrupts;
mod region;
mod video;

pub use bios::{Bios, BiosState};
pub use bus::GbaBus;
pub use cartridge::Rom;
pub use error::{Access, GbaError, GbaResult, ImageKind};
pub use gameboy_advance::{GameBoyAdvance, MachineConfig};
pub use interrupts::{Interrupt, InterruptController};
pub use video::{
    bg_palette, Background, BgControlRegister, BgPaletteMode, BgSize, ControlChange,
    ControlObserver, FrameBuffer, LcdController, ScanlineIndices, TileMap, TileMapEntry,
};

/// External work RAM: 256 KiB on a 16-bit bus.
const EWRAM_SIZE: usize = 256 * 1024;
/// Internal (CPU-linked) work RAM.
const IWRAM_SIZE: usize = 32 * 1024;
/// I/O register block window.
const IO_SIZE: usize = 1024;
const PALETTE_RAM_SIZE: usize = 1024;
/// 64 KiB background area plus 32 KiB object tiles.
const VRAM_SIZE: usize = 96 * 1024;
const OAM_SIZE: usize = 1024;

#[cfg(test)]
mod tests;
