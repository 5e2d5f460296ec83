use super::bios::Bios;
use super::cartridge::Rom;
use super::interrupts::InterruptController;
use super::region::RamRegion;
use super::video::{FrameBuffer, LcdController};
use super::{EWRAM_SIZE, IO_SIZE, IWRAM_SIZE, OAM_SIZE, PALETTE_RAM_SIZE, VRAM_SIZE};

mod checked;
mod init;
mod io;
mod mmio;
mod traits;

/// Backing store an address decodes to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Region {
    Bios,
    Rom,
    Io,
    Iwram,
    Ewram,
    PaletteRam,
    Vram,
    Oam,
}

impl Region {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Region::Bios => "BIOS",
            Region::Rom => "Game Pak ROM",
            Region::Io => "I/O registers",
            Region::Iwram => "internal work RAM",
            Region::Ewram => "external work RAM",
            Region::PaletteRam => "palette RAM",
            Region::Vram => "video RAM",
            Region::Oam => "object attribute RAM",
        }
    }

    /// Map an address to its region and the offset inside it.
    ///
    /// Ranges are disjoint; they are listed in the order the hardware
    /// documentation gives them priority, cartridge first.
    pub(crate) const fn decode(addr: u32) -> Option<(Region, u32)> {
        match addr {
            0x0800_0000..=0x09FF_FFFF => Some((Region::Rom, addr - 0x0800_0000)),
            0x0400_0000..=0x0400_03FE => Some((Region::Io, addr - 0x0400_0000)),
            0x0300_0000..=0x0300_7FFF => Some((Region::Iwram, addr - 0x0300_0000)),
            0x0200_0000..=0x0203_FFFF => Some((Region::Ewram, addr - 0x0200_0000)),
            0x0500_0000..=0x0500_03FF => Some((Region::PaletteRam, addr - 0x0500_0000)),
            0x0600_0000..=0x0601_7FFF => Some((Region::Vram, addr - 0x0600_0000)),
            // 1 KiB of OAM mirrored through the whole 16 MiB page.
            0x0700_0000..=0x07FF_FFFF => {
                Some((Region::Oam, (addr - 0x0700_0000) & (OAM_SIZE as u32 - 1)))
            }
            0x0000_0000..=0x0000_3FFF => Some((Region::Bios, addr)),
            _ => None,
        }
    }
}

/// The GBA system bus.
///
/// Owns every storage region and the I/O register block for the lifetime
/// of the machine. It is the only writer of that state; the background
/// renderer reads video and palette RAM through it on the same thread, so
/// a scanline always sees a consistent snapshot.
pub struct GbaBus {
    rom: Rom,
    /// `None` when booting without a BIOS image (HLE boot).
    bios: Option<Bios>,
    ewram: RamRegion,
    iwram: RamRegion,
    /// Raw bytes for I/O addresses without dedicated handling.
    io: RamRegion,
    palette_ram: RamRegion,
    vram: RamRegion,
    oam: RamRegion,
    lcd: LcdController,
    interrupts: InterruptController,
}

impl GbaBus {
    pub fn new(rom: Rom, bios: Option<Bios>) -> Self {
        let mut bus = Self {
            rom,
            bios,
            ewram: RamRegion::new(EWRAM_SIZE),
            iwram: RamRegion::new(IWRAM_SIZE),
            io: RamRegion::new(IO_SIZE),
            palette_ram: RamRegion::new(PALETTE_RAM_SIZE),
            vram: RamRegion::new(VRAM_SIZE),
            oam: RamRegion::new(OAM_SIZE),
            lcd: LcdController::new(),
            interrupts: InterruptController::new(),
        };
        bus.apply_initial_io_state();
        bus
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn bios(&self) -> Option<&Bios> {
        self.bios.as_ref()
    }

    pub fn bios_mut(&mut self) -> Option<&mut Bios> {
        self.bios.as_mut()
    }

    pub fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }

    pub fn lcd(&self) -> &LcdController {
        &self.lcd
    }

    pub fn lcd_mut(&mut self) -> &mut LcdController {
        &mut self.lcd
    }

    /// Video RAM as the renderer sees it: the same bytes the bus maps at
    /// 0x06000000.
    pub fn vram(&self) -> &[u8] {
        self.vram.bytes()
    }

    pub fn vram_mut(&mut self) -> &mut [u8] {
        self.vram.bytes_mut()
    }

    pub fn palette_ram(&self) -> &[u8] {
        self.palette_ram.bytes()
    }

    pub fn oam(&self) -> &[u8] {
        self.oam.bytes()
    }

    /// Compose scanline `line` from the current video state.
    pub fn render_scanline(&self, line: usize, frame: &mut FrameBuffer) {
        self.lcd
            .render_scanline(line, self.vram.bytes(), self.palette_ram.bytes(), frame);
    }
}
