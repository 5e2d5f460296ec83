use super::super::{GbaBus, Region};
use crate::machine::error::{Access, GbaError, GbaResult};

impl GbaBus {
    pub(super) fn read8_mmio_impl(&mut self, addr: u32) -> GbaResult<u8> {
        let Some((region, offset)) = Region::decode(addr) else {
            return Err(GbaError::BadAddress {
                address: addr,
                access: Access::Read,
            });
        };

        let value = match region {
            Region::Rom => self.rom.read_byte(offset),
            Region::Io => self.io_read(offset),
            Region::Iwram => self.iwram.read(offset),
            Region::Ewram => self.ewram.read(offset),
            Region::PaletteRam => self.palette_ram.read(offset),
            Region::Vram => self.vram.read(offset),
            Region::Oam => self.oam.read(offset),
            Region::Bios => match &self.bios {
                Some(bios) => bios.read_byte(offset),
                None => {
                    return Err(GbaError::UnimplementedRegion {
                        region: region.name(),
                        address: addr,
                    })
                }
            },
        };
        Ok(value)
    }
}
