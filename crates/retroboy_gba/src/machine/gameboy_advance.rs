use typed_builder::TypedBuilder;

use crate::cpu::Cpu;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::bios::Bios;
use super::cartridge::Rom;
use super::error::GbaResult;
use super::interrupts::Interrupt;
use super::video::FrameBuffer;
use super::GbaBus;

const DISPSTAT_VBLANK: u8 = 1 << 0;

/// Images and boot options for a new machine.
#[derive(TypedBuilder)]
pub struct MachineConfig {
    pub rom: Rom,
    #[builder(default)]
    pub bios: Option<Bios>,
    /// Start at the cartridge entry point with the post-boot register
    /// state even when a BIOS image is present.
    #[builder(default = false)]
    pub skip_bios: bool,
}

/// High-level Game Boy Advance machine.
///
/// Holds the register state of the CPU, the bus with every memory region
/// and the frame the LCD last produced. The instruction interpreter drives
/// `cpu` against `bus` and calls [`GameBoyAdvance::process_interrupts`]
/// between instructions.
pub struct GameBoyAdvance {
    pub cpu: Cpu,
    pub bus: GbaBus,
    frame: FrameBuffer,
}

impl GameBoyAdvance {
    pub fn new(config: MachineConfig) -> GbaResult<Self> {
        let MachineConfig {
            rom,
            bios,
            skip_bios,
        } = config;

        let mut cpu = Cpu::new();
        if bios.is_some() && !skip_bios {
            cpu.apply_reset_state();
        } else {
            cpu.apply_post_bios_state();
        }

        log::info!(
            "GBA: '{}' ({}), {} bytes, {}",
            rom.title(),
            rom.game_code(),
            rom.len(),
            if bios.is_some() { "BIOS present" } else { "no BIOS" }
        );

        Ok(Self {
            cpu,
            bus: GbaBus::new(rom, bios),
            frame: FrameBuffer::new(),
        })
    }

    pub fn rom_title(&self) -> &str {
        self.bus.rom().title()
    }

    /// Raise an interrupt request (sets the IF bit).
    pub fn request_interrupt(&mut self, source: Interrupt) {
        self.bus.interrupts_mut().request_interrupt(source);
    }

    /// Take the IRQ exception if one is pending and unmasked.
    pub fn process_interrupts(&mut self) -> bool {
        self.bus.interrupts().process_interrupts(&mut self.cpu)
    }

    /// Enter the BIOS SWI handler. Returns `false` when there is no BIOS or
    /// it is configured not to service SWIs.
    pub fn enter_swi(&mut self, comment: u32) -> bool {
        match self.bus.bios() {
            Some(bios) => bios.enter_swi(&mut self.cpu, comment),
            None => false,
        }
    }

    pub fn load_word_checked(&mut self, addr: u32) -> GbaResult<u32> {
        self.bus.load_word_checked(addr, &self.cpu)
    }

    pub fn store_word_checked(&mut self, addr: u32, value: u32) -> GbaResult<()> {
        self.bus.store_word_checked(addr, value)
    }

    pub fn render_scanline(&mut self, line: usize) {
        self.bus.set_vcount(line as u8);
        self.bus.render_scanline(line, &mut self.frame);
    }

    /// Draw all visible lines, then enter VBlank. The VBlank interrupt is
    /// requested when DISPSTAT enables it.
    pub fn render_frame(&mut self) {
        self.bus.set_display_status_flags(0);
        for line in 0..SCREEN_HEIGHT {
            self.render_scanline(line);
        }
        self.bus.set_vcount(SCREEN_HEIGHT as u8);
        self.bus.set_display_status_flags(DISPSTAT_VBLANK);
        if self.bus.vblank_irq_enabled() {
            self.request_interrupt(Interrupt::VBLANK);
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Copy the last frame into an RGB24 buffer of
    /// `SCREEN_WIDTH * SCREEN_HEIGHT * 3` bytes.
    pub fn video_frame(&self, buffer: &mut [u8]) {
        debug_assert!(buffer.len() >= SCREEN_WIDTH * SCREEN_HEIGHT * 3);
        self.frame.copy_rgb24(buffer);
    }
}
