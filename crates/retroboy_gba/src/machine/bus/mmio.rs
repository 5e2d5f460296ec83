mod read;
mod write;

use super::GbaBus;
use crate::machine::error::GbaResult;

impl GbaBus {
    pub(super) fn read8_mmio(&mut self, addr: u32) -> GbaResult<u8> {
        self.read8_mmio_impl(addr)
    }

    pub(super) fn write8_mmio(&mut self, addr: u32, value: u8) -> GbaResult<()> {
        self.write8_mmio_impl(addr, value)
    }
}
