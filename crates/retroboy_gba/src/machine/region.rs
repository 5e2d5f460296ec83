/// Zero-initialised, fixed-length RAM backing one address range.
///
/// The length is chosen at construction and never changes; offsets are
/// relative to the start of the owning range and must already be reduced
/// by the bus.
pub(crate) struct RamRegion {
    data: Box<[u8]>,
}

impl RamRegion {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            data: vec![0; len].into_boxed_slice(),
        }
    }

    #[inline]
    pub(crate) fn read(&self, offset: u32) -> u8 {
        self.data[offset as usize]
    }

    #[inline]
    pub(crate) fn write(&mut self, offset: u32, value: u8) {
        self.data[offset as usize] = value;
    }

    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Little-endian halfword read straight from a byte slice.
///
/// Used by the renderer, which indexes video and palette RAM directly
/// rather than going through the fallible bus accessors.
#[inline]
pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}
