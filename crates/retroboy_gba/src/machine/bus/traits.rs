use super::GbaBus;
use crate::cpu::MemoryBus;
use crate::machine::error::GbaResult;

impl MemoryBus for GbaBus {
    #[inline]
    fn read_byte(&mut self, addr: u32) -> GbaResult<u8> {
        self.read8_mmio(addr)
    }

    #[inline]
    fn write_byte(&mut self, addr: u32, value: u8) -> GbaResult<()> {
        self.write8_mmio(addr, value)
    }
}
