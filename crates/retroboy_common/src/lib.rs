/// RGBA colour shared by every retroboy core and frontend.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    /// Decode a 15-bit `0bbbbbgggggrrrrr` colour as stored in GBA palette RAM.
    ///
    /// Each 5-bit channel is widened to 8 bits by replicating its top bits
    /// into the low bits, so `0x1F` maps to `0xFF` rather than `0xF8`.
    #[inline]
    pub const fn from_bgr555(value: u16) -> Color {
        let r = (value & 0x1F) as u8;
        let g = ((value >> 5) & 0x1F) as u8;
        let b = ((value >> 10) & 0x1F) as u8;
        Color::new_rgb(expand5(r), expand5(g), expand5(b))
    }

    #[inline]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

#[inline]
const fn expand5(channel: u8) -> u8 {
    (channel << 3) | (channel >> 2)
}
