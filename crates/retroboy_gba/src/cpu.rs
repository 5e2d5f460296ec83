mod regs;

pub use regs::{CpuMode, CpuState, Registers, StatusFlag, MODE_MASK};

use crate::machine::GbaResult;

/// Abstraction over the GBA system bus as seen by the processor.
///
/// Every access can fail: an address outside the memory map is a decode
/// bug (or an unimplemented feature) and must reach the caller
/// instead of silently reading zero.
pub trait MemoryBus {
    fn read_byte(&mut self, addr: u32) -> GbaResult<u8>;
    fn write_byte(&mut self, addr: u32, value: u8) -> GbaResult<()>;

    /// Little-endian halfword built from two byte reads.
    fn read_half_word(&mut self, addr: u32) -> GbaResult<u16> {
        let lo = self.read_byte(addr)?;
        let hi = self.read_byte(addr.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Little-endian word built from four byte reads.
    fn read_word(&mut self, addr: u32) -> GbaResult<u32> {
        let mut bytes = [0u8; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read_byte(addr.wrapping_add(i as u32))?;
        }
        Ok(u32::from_le_bytes(bytes))
    }

    fn write_half_word(&mut self, addr: u32, value: u16) -> GbaResult<()> {
        let [lo, hi] = value.to_le_bytes();
        self.write_byte(addr, lo)?;
        self.write_byte(addr.wrapping_add(1), hi)
    }

    fn write_word(&mut self, addr: u32, value: u32) -> GbaResult<()> {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.write_byte(addr.wrapping_add(i as u32), byte)?;
        }
        Ok(())
    }
}

/// Processor state consumed by the bus and interrupt controller.
///
/// The instruction interpreter lives outside this crate; anything that
/// exposes these fields can be driven through exception entry and the
/// open-bus paths of the checked word access.
pub trait Processor {
    /// Architectural R15, two instructions ahead of the executing one.
    fn pc(&self) -> u32;
    /// Address of the instruction currently being executed.
    fn pc_adjusted(&self) -> u32;
    fn set_pc(&mut self, value: u32);
    fn lr(&self) -> u32;
    fn set_lr(&mut self, value: u32);
    fn cpsr(&self) -> u32;
    fn spsr(&self, mode: CpuMode) -> u32;
    fn set_spsr(&mut self, mode: CpuMode, value: u32);
    fn state(&self) -> CpuState;
    fn set_state(&mut self, state: CpuState);
    fn mode(&self) -> CpuMode;
    fn set_mode(&mut self, mode: CpuMode);
    fn irq_disabled(&self) -> bool;
    fn set_irq_disabled(&mut self, disabled: bool);
    /// Ask the interpreter to refill its prefetch pipeline before the next
    /// fetch (PC was written outside of normal sequencing).
    fn request_pipeline_flush(&mut self);
}

/// ARM7TDMI register state.
///
/// Only the parts that exception entry and the bus quirks touch are
/// modelled; decode/execute is provided by whoever drives this struct.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    /// Set when PC was redirected and the prefetch pipeline must be refilled.
    pub flush_pipeline: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Cartridge ROM entry point used when the BIOS boot sequence is skipped.
    pub const ROM_ENTRY: u32 = 0x0800_0000;
    /// Reset vector inside the BIOS.
    pub const RESET_VECTOR: u32 = 0x0000_0000;
    pub const IRQ_VECTOR: u32 = 0x0000_0018;
    pub const SWI_VECTOR: u32 = 0x0000_0008;

    pub fn new() -> Self {
        Self {
            regs: Registers::default(),
            flush_pipeline: false,
        }
    }

    /// Power-on state when a real BIOS image will run the boot sequence.
    pub fn apply_reset_state(&mut self) {
        self.regs = Registers::default();
        self.regs.cpsr =
            CpuMode::Supervisor.bits() | (StatusFlag::IRQ_DISABLE | StatusFlag::FIQ_DISABLE).bits();
        self.regs.r[Registers::PC] = Self::RESET_VECTOR;
        self.flush_pipeline = true;
    }

    /// Register state the BIOS leaves behind when it jumps to the cartridge.
    ///
    /// These stack pointers are what the official boot ROM installs and
    /// what HLE-booting emulators conventionally reproduce.
    pub fn apply_post_bios_state(&mut self) {
        self.regs = Registers::default();
        self.regs.set_sp_for(CpuMode::Supervisor, 0x0300_7FE0);
        self.regs.set_sp_for(CpuMode::Irq, 0x0300_7FA0);
        self.regs.set_sp_for(CpuMode::System, 0x0300_7F00);
        self.regs.r[Registers::PC] = Self::ROM_ENTRY;
        self.flush_pipeline = true;
    }

    #[inline]
    pub fn get_flag(&self, flag: StatusFlag) -> bool {
        (self.regs.cpsr & flag.bits()) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: StatusFlag, value: bool) {
        if value {
            self.regs.cpsr |= flag.bits();
        } else {
            self.regs.cpsr &= !flag.bits();
        }
    }
}

impl Processor for Cpu {
    #[inline]
    fn pc(&self) -> u32 {
        self.regs.r[Registers::PC]
    }

    #[inline]
    fn pc_adjusted(&self) -> u32 {
        let width = self.state().instruction_width();
        self.pc().wrapping_sub(width * 2)
    }

    #[inline]
    fn set_pc(&mut self, value: u32) {
        self.regs.r[Registers::PC] = value;
    }

    #[inline]
    fn lr(&self) -> u32 {
        self.regs.r[Registers::LR]
    }

    #[inline]
    fn set_lr(&mut self, value: u32) {
        self.regs.r[Registers::LR] = value;
    }

    #[inline]
    fn cpsr(&self) -> u32 {
        self.regs.cpsr
    }

    fn spsr(&self, mode: CpuMode) -> u32 {
        self.regs.spsr(mode)
    }

    fn set_spsr(&mut self, mode: CpuMode, value: u32) {
        self.regs.set_spsr(mode, value);
    }

    #[inline]
    fn state(&self) -> CpuState {
        if self.get_flag(StatusFlag::THUMB) {
            CpuState::Thumb
        } else {
            CpuState::Arm
        }
    }

    fn set_state(&mut self, state: CpuState) {
        self.set_flag(StatusFlag::THUMB, state == CpuState::Thumb);
    }

    #[inline]
    fn mode(&self) -> CpuMode {
        self.regs.mode()
    }

    fn set_mode(&mut self, mode: CpuMode) {
        self.regs.switch_mode(mode);
    }

    #[inline]
    fn irq_disabled(&self) -> bool {
        self.get_flag(StatusFlag::IRQ_DISABLE)
    }

    fn set_irq_disabled(&mut self, disabled: bool) {
        self.set_flag(StatusFlag::IRQ_DISABLE, disabled);
    }

    fn request_pipeline_flush(&mut self) {
        self.flush_pipeline = true;
    }
}
