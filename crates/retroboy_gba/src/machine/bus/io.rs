//! I/O register block, 0x04000000-0x040003FE.
//!
//! Registers with side effects are routed to their owner (the LCD
//! controller or the interrupt controller); everything else is plain
//! byte storage in `GbaBus::io`.

use super::GbaBus;
use crate::machine::interrupts::Interrupt;

pub(crate) const REG_DISPCNT: u32 = 0x000;
pub(crate) const REG_DISPSTAT: u32 = 0x004;
pub(crate) const REG_VCOUNT: u32 = 0x006;
pub(crate) const REG_BG0CNT: u32 = 0x008;
pub(crate) const REG_BG3CNT_HI: u32 = 0x00F;
pub(crate) const REG_BG0HOFS: u32 = 0x010;
pub(crate) const REG_BG3VOFS_HI: u32 = 0x01F;
pub(crate) const REG_SOUNDBIAS: u32 = 0x088;
pub(crate) const REG_KEYINPUT: u32 = 0x130;
pub(crate) const REG_IE: u32 = 0x200;
pub(crate) const REG_IF: u32 = 0x202;
pub(crate) const REG_IME: u32 = 0x208;

/// DISPSTAT bits 0-2 (VBlank, HBlank, VCount flags) are set by hardware.
const DISPSTAT_READ_ONLY: u8 = 0x07;
/// Scroll offsets are 9 bits wide.
const SCROLL_MASK: u16 = 0x01FF;

impl GbaBus {
    pub(super) fn io_read(&self, offset: u32) -> u8 {
        match offset {
            REG_DISPCNT | 0x001 => self.lcd.dispcnt().to_le_bytes()[(offset & 1) as usize],
            REG_BG0CNT..=REG_BG3CNT_HI => {
                let bg = ((offset - REG_BG0CNT) / 2) as usize;
                self.lcd.backgrounds[bg].control().byte((offset & 1) as usize)
            }
            REG_IE | 0x201 => self.interrupts.enable().bits().to_le_bytes()[(offset & 1) as usize],
            REG_IF | 0x203 => {
                self.interrupts.request().bits().to_le_bytes()[(offset & 1) as usize]
            }
            // IME reads as zero; the master enable is only visible through
            // the interrupt controller.
            REG_IME => 0,
            _ => self.io.read(offset),
        }
    }

    pub(super) fn io_write(&mut self, offset: u32, value: u8) {
        match offset {
            REG_DISPCNT | 0x001 => self.lcd.write_dispcnt((offset & 1) as usize, value),
            REG_DISPSTAT => {
                let status = self.io.read(offset) & DISPSTAT_READ_ONLY;
                self.io.write(offset, status | (value & !DISPSTAT_READ_ONLY));
            }
            REG_VCOUNT | 0x007 | REG_KEYINPUT | 0x131 => {
                log::trace!("GBA IO: ignored write to read-only 0x{:03X}", offset);
            }
            REG_BG0CNT..=REG_BG3CNT_HI => {
                let bg = ((offset - REG_BG0CNT) / 2) as usize;
                self.lcd.backgrounds[bg].write_control((offset & 1) as usize, value);
            }
            REG_BG0HOFS..=REG_BG3VOFS_HI => {
                self.io.write(offset, value);
                self.update_scroll(offset & !1);
            }
            REG_IE | 0x201 => {
                let mut bytes = self.interrupts.enable().bits().to_le_bytes();
                bytes[(offset & 1) as usize] = value;
                self.interrupts
                    .set_enable(Interrupt::from_bits_retain(u16::from_le_bytes(bytes)));
            }
            // Writing 1 to an IF bit acknowledges that request.
            REG_IF | 0x203 => self.interrupts.acknowledge((value as u16) << ((offset & 1) * 8)),
            // Writes to IME are discarded; the stored byte never changes.
            REG_IME => {
                log::trace!("GBA IO: discarded IME write 0x{:02X}", value);
            }
            _ => self.io.write(offset, value),
        }
    }

    /// Push the BGxHOFS/BGxVOFS halfword at `offset` into its background.
    fn update_scroll(&mut self, offset: u32) {
        let raw = u16::from_le_bytes([self.io.read(offset), self.io.read(offset + 1)]) & SCROLL_MASK;
        let register = (offset - REG_BG0HOFS) / 2;
        let bg = &mut self.lcd.backgrounds[(register / 2) as usize];
        if (register & 1) == 0 {
            bg.scroll_x = raw as u32;
        } else {
            bg.scroll_y = raw as u32;
        }
    }

    /// Hardware-driven DISPSTAT flags (bits 0-2).
    pub(crate) fn set_display_status_flags(&mut self, flags: u8) {
        let control = self.io.read(REG_DISPSTAT) & !DISPSTAT_READ_ONLY;
        self.io.write(REG_DISPSTAT, control | (flags & DISPSTAT_READ_ONLY));
    }

    pub(crate) fn set_vcount(&mut self, line: u8) {
        self.io.write(REG_VCOUNT, line);
    }

    /// DISPSTAT bit 3.
    pub(crate) fn vblank_irq_enabled(&self) -> bool {
        (self.io.read(REG_DISPSTAT) & 0x08) != 0
    }
}
