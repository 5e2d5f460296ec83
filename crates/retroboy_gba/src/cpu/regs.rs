use bitflags::bitflags;

bitflags! {
    /// Flag and control bits of the CPSR / SPSR.
    ///
    /// Bits 0-4 hold the processor mode and are handled by [`CpuMode`];
    /// they are not part of this set.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct StatusFlag: u32 {
        const N = 1 << 31;
        const Z = 1 << 30;
        const C = 1 << 29;
        const V = 1 << 28;
        const IRQ_DISABLE = 1 << 7;
        const FIQ_DISABLE = 1 << 6;
        const THUMB = 1 << 5;
    }
}

/// Mask of the mode field inside the CPSR.
pub const MODE_MASK: u32 = 0x1F;

/// Privilege mode encoded in CPSR bits 0-4.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum CpuMode {
    User,
    Fiq,
    Irq,
    Supervisor,
    Abort,
    Undefined,
    #[default]
    System,
}

impl CpuMode {
    pub const fn bits(self) -> u32 {
        match self {
            CpuMode::User => 0x10,
            CpuMode::Fiq => 0x11,
            CpuMode::Irq => 0x12,
            CpuMode::Supervisor => 0x13,
            CpuMode::Abort => 0x17,
            CpuMode::Undefined => 0x1B,
            CpuMode::System => 0x1F,
        }
    }

    /// Decode the mode field of a status register value.
    ///
    /// Reserved encodings fall back to `System`, which shares the user
    /// register bank and never owns an SPSR.
    pub const fn from_bits(cpsr: u32) -> Self {
        match cpsr & MODE_MASK {
            0x10 => CpuMode::User,
            0x11 => CpuMode::Fiq,
            0x12 => CpuMode::Irq,
            0x13 => CpuMode::Supervisor,
            0x17 => CpuMode::Abort,
            0x1B => CpuMode::Undefined,
            _ => CpuMode::System,
        }
    }

    /// Index into the banked R13/R14/SPSR storage, or `None` for the modes
    /// that use the user bank.
    pub(crate) const fn bank(self) -> Option<usize> {
        match self {
            CpuMode::User | CpuMode::System => None,
            CpuMode::Fiq => Some(0),
            CpuMode::Irq => Some(1),
            CpuMode::Supervisor => Some(2),
            CpuMode::Abort => Some(3),
            CpuMode::Undefined => Some(4),
        }
    }
}

/// Instruction set currently decoded by the processor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum CpuState {
    #[default]
    Arm,
    Thumb,
}

impl CpuState {
    /// Width of one instruction in bytes.
    #[inline]
    pub const fn instruction_width(self) -> u32 {
        match self {
            CpuState::Arm => 4,
            CpuState::Thumb => 2,
        }
    }
}

/// Number of privileged modes with their own R13/R14/SPSR bank.
pub(crate) const BANK_COUNT: usize = 5;

/// Visible register file plus the banked copies of R13/R14/SPSR.
///
/// FIQ additionally banks R8-R12 on hardware; nothing in this core enters
/// FIQ mode, so only the stack pointer and link register are swapped.
#[derive(Clone, Copy, Debug)]
pub struct Registers {
    pub r: [u32; 16],
    pub cpsr: u32,
    pub(crate) banked_sp: [u32; BANK_COUNT],
    pub(crate) banked_lr: [u32; BANK_COUNT],
    pub(crate) banked_spsr: [u32; BANK_COUNT],
    /// R13/R14 of the shared User/System bank while a privileged mode is
    /// active.
    pub(crate) user_sp: u32,
    pub(crate) user_lr: u32,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            r: [0; 16],
            cpsr: CpuMode::System.bits(),
            banked_sp: [0; BANK_COUNT],
            banked_lr: [0; BANK_COUNT],
            banked_spsr: [0; BANK_COUNT],
            user_sp: 0,
            user_lr: 0,
        }
    }
}

impl Registers {
    pub const SP: usize = 13;
    pub const LR: usize = 14;
    pub const PC: usize = 15;

    #[inline]
    pub fn mode(&self) -> CpuMode {
        CpuMode::from_bits(self.cpsr)
    }

    /// Switch the active mode, swapping R13/R14 with the target bank.
    pub fn switch_mode(&mut self, mode: CpuMode) {
        let old = self.mode();
        if old == mode {
            return;
        }

        match old.bank() {
            Some(bank) => {
                self.banked_sp[bank] = self.r[Self::SP];
                self.banked_lr[bank] = self.r[Self::LR];
            }
            None => {
                self.user_sp = self.r[Self::SP];
                self.user_lr = self.r[Self::LR];
            }
        }

        match mode.bank() {
            Some(bank) => {
                self.r[Self::SP] = self.banked_sp[bank];
                self.r[Self::LR] = self.banked_lr[bank];
            }
            None => {
                self.r[Self::SP] = self.user_sp;
                self.r[Self::LR] = self.user_lr;
            }
        }

        self.cpsr = (self.cpsr & !MODE_MASK) | mode.bits();
    }

    /// Saved status register of `mode`, or the CPSR for modes without one.
    pub fn spsr(&self, mode: CpuMode) -> u32 {
        match mode.bank() {
            Some(bank) => self.banked_spsr[bank],
            None => self.cpsr,
        }
    }

    /// Write the saved status register of `mode`; ignored for User/System.
    pub fn set_spsr(&mut self, mode: CpuMode, value: u32) {
        if let Some(bank) = mode.bank() {
            self.banked_spsr[bank] = value;
        }
    }

    /// Stack pointer belonging to `mode`, regardless of the active mode.
    pub fn sp_for(&self, mode: CpuMode) -> u32 {
        if mode.bank() == self.mode().bank() {
            return self.r[Self::SP];
        }
        match mode.bank() {
            Some(bank) => self.banked_sp[bank],
            None => self.user_sp,
        }
    }

    /// Set the stack pointer belonging to `mode`, regardless of the active mode.
    pub fn set_sp_for(&mut self, mode: CpuMode, value: u32) {
        if mode.bank() == self.mode().bank() {
            self.r[Self::SP] = value;
            return;
        }
        match mode.bank() {
            Some(bank) => self.banked_sp[bank] = value,
            None => self.user_sp = value,
        }
    }
}
