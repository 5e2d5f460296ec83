pub mod cpu;
pub mod machine;

pub use machine::{GameBoyAdvance, GbaError, GbaResult, MachineConfig};

/// Visible screen width in pixels for the Game Boy Advance LCD.
pub const SCREEN_WIDTH: usize = 240;
/// Visible screen height in pixels (number of rendered scanlines).
pub const SCREEN_HEIGHT: usize = 160;
