//! Word access with the ARM7TDMI bus quirks applied.
//!
//! Plain `read_word`/`write_word` are little-endian composition and nothing
//! else. The checked variants are what the instruction interpreter uses for
//! LDR/STR and they reproduce what real hardware returns for misaligned,
//! unmapped, DMA and BIOS-protected addresses.

use super::GbaBus;
use crate::cpu::{CpuState, MemoryBus, Processor};
use crate::machine::error::GbaResult;

/// Addresses at or above this are unmapped and read the open bus.
const OPEN_BUS_START: u32 = 0x1000_0000;
const BIOS_END: u32 = 0x0000_3FFF;
/// DMA0-3 word count registers (DMAxCNT_L). They are write-only; a word
/// read returns the control half (DMAxCNT_H) in the upper 16 bits.
const DMA_CNT_L: [u32; 4] = [0x0400_00B8, 0x0400_00C4, 0x0400_00D0, 0x0400_00DC];

impl GbaBus {
    /// Word load as seen by LDR.
    pub fn load_word_checked<P: Processor>(&mut self, addr: u32, cpu: &P) -> GbaResult<u32> {
        if addr >= OPEN_BUS_START {
            return self.open_bus_word(cpu);
        }

        let aligned = addr & !3;
        let rotation = (addr & 3) * 8;

        if aligned <= BIOS_END && cpu.pc() > BIOS_END {
            if let Some(bios) = &self.bios {
                return Ok(bios.state.latched_opcode().rotate_right(rotation));
            }
        }

        if DMA_CNT_L.contains(&addr) {
            return Ok((self.read_half_word(addr + 2)? as u32) << 16);
        }

        // Misaligned loads read the aligned word and rotate the addressed
        // byte into bits 0-7.
        Ok(self.read_word(aligned)?.rotate_right(rotation))
    }

    /// Word store as seen by STR: the low address bits are dropped and the
    /// value is written unrotated.
    pub fn store_word_checked(&mut self, addr: u32, value: u32) -> GbaResult<()> {
        self.write_word(addr & !3, value)
    }

    /// Combined entry point for the interpreter's single data transfer path.
    pub fn read_write_word_checked<P: Processor>(
        &mut self,
        addr: u32,
        value: &mut u32,
        is_load: bool,
        cpu: &P,
    ) -> GbaResult<()> {
        if is_load {
            *value = self.load_word_checked(addr, cpu)?;
            Ok(())
        } else {
            self.store_word_checked(addr, *value)
        }
    }

    /// The prefetched opcode left on the bus. In Thumb state the halfword
    /// appears in both halves of the word.
    fn open_bus_word<P: Processor>(&mut self, cpu: &P) -> GbaResult<u32> {
        let pc = cpu.pc();
        match cpu.state() {
            CpuState::Arm => self.read_word(pc),
            CpuState::Thumb => {
                let half = self.read_half_word(pc)? as u32;
                Ok((half << 16) | half)
            }
        }
    }
}
