use super::io::{REG_KEYINPUT, REG_SOUNDBIAS};
use super::GbaBus;

impl GbaBus {
    /// Register values present before the first instruction runs.
    pub(super) fn apply_initial_io_state(&mut self) {
        // KEYINPUT is active-low: 0x03FF means no button is held.
        self.io.write(REG_KEYINPUT, 0xFF);
        self.io.write(REG_KEYINPUT + 1, 0x03);
        // SOUNDBIAS as left by the boot ROM.
        self.io.write(REG_SOUNDBIAS, 0x00);
        self.io.write(REG_SOUNDBIAS + 1, 0x02);
    }
}
