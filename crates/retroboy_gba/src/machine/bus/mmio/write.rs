use super::super::{GbaBus, Region};
use crate::machine::error::{Access, GbaError, GbaResult};

impl GbaBus {
    pub(super) fn write8_mmio_impl(&mut self, addr: u32, value: u8) -> GbaResult<()> {
        let Some((region, offset)) = Region::decode(addr) else {
            return Err(GbaError::BadAddress {
                address: addr,
                access: Access::Write,
            });
        };

        match region {
            // Game Pak ROM is read-only; the write never reaches the image.
            Region::Rom => {
                log::trace!("GBA bus: ignored ROM write 0x{:02X} at 0x{:08X}", value, addr);
            }
            Region::Bios => {
                if self.bios.is_none() {
                    return Err(GbaError::UnimplementedRegion {
                        region: region.name(),
                        address: addr,
                    });
                }
                log::trace!("GBA bus: ignored BIOS write 0x{:02X} at 0x{:08X}", value, addr);
            }
            Region::Io => self.io_write(offset, value),
            Region::Iwram => self.iwram.write(offset, value),
            Region::Ewram => self.ewram.write(offset, value),
            Region::PaletteRam => self.palette_ram.write(offset, value),
            Region::Vram => self.vram.write(offset, value),
            Region::Oam => self.oam.write(offset, value),
        }
        Ok(())
    }
}
