use bitflags::bitflags;

use crate::cpu::{Cpu, CpuMode, CpuState, Processor};

bitflags! {
    /// Interrupt sources, one bit each in IE (0x04000200) and IF (0x04000202).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Interrupt: u16 {
        const VBLANK = 1 << 0;
        const HBLANK = 1 << 1;
        const VCOUNTER_MATCH = 1 << 2;
        const TIMER0_OVERFLOW = 1 << 3;
        const TIMER1_OVERFLOW = 1 << 4;
        const TIMER2_OVERFLOW = 1 << 5;
        const TIMER3_OVERFLOW = 1 << 6;
        const SERIAL = 1 << 7;
        const DMA0 = 1 << 8;
        const DMA1 = 1 << 9;
        const DMA2 = 1 << 10;
        const DMA3 = 1 << 11;
        const KEYPAD = 1 << 12;
        const GAME_PAK = 1 << 13;
    }
}

/// Interrupt enable mask, request flags and master enable.
///
/// A requested interrupt stays pending until software acknowledges it by
/// writing a 1 to its IF bit; taking the IRQ exception never clears it, and
/// neither does it touch the master enable. The IRQ handler is responsible
/// for both.
///
/// Note that the CPU has its own master switch, the I bit in CPSR, which is
/// checked in addition to the master enable here.
#[derive(Clone, Debug, Default)]
pub struct InterruptController {
    /// IME: 0 disables all interrupts, anything else defers to IE.
    master_enable: u8,
    enable: Interrupt,
    request: Interrupt,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn master_enable(&self) -> u8 {
        self.master_enable
    }

    pub fn set_master_enable(&mut self, value: u8) {
        self.master_enable = value;
    }

    pub fn enable(&self) -> Interrupt {
        self.enable
    }

    /// Replace the IE mask. Bits above the defined sources are kept so that
    /// software reads back what it wrote.
    pub fn set_enable(&mut self, mask: Interrupt) {
        self.enable = mask;
    }

    pub fn request(&self) -> Interrupt {
        self.request
    }

    /// Raise a request. Already-pending sources stay pending; the mask and
    /// master enable do not gate the request itself.
    pub fn request_interrupt(&mut self, source: Interrupt) {
        self.request |= source;
    }

    /// Software acknowledge: every bit set in `bits` is cleared from IF.
    pub fn acknowledge(&mut self, bits: u16) {
        self.request = Interrupt::from_bits_retain(self.request.bits() & !bits);
    }

    /// Requested sources that are also enabled in IE.
    pub fn pending(&self) -> Interrupt {
        self.request & self.enable
    }

    /// Enter the IRQ exception if an enabled request is pending and both the
    /// master enable and the CPU's I flag allow it.
    ///
    /// The gate is `IE & IF`, not IF alone: a request for a source that is
    /// not set in IE stays pending without entering the handler.
    ///
    /// Call once per processor step, before the next fetch. Returns whether
    /// the exception was taken.
    pub fn process_interrupts<P: Processor>(&self, cpu: &mut P) -> bool {
        if self.master_enable == 0 || cpu.irq_disabled() || self.pending().is_empty() {
            return false;
        }

        // The handler restores CPSR from SPSR_irq on return (SUBS PC, LR, #4).
        let cpsr = cpu.cpsr();
        let return_link = cpu.pc_adjusted().wrapping_add(cpu.state().instruction_width());

        cpu.set_spsr(CpuMode::Irq, cpsr);
        cpu.set_irq_disabled(true);
        cpu.set_mode(CpuMode::Irq);
        cpu.set_lr(return_link);
        cpu.set_pc(Cpu::IRQ_VECTOR);
        cpu.set_state(CpuState::Arm);
        cpu.request_pipeline_flush();

        log::debug!(
            "GBA IRQ entry: IE=0x{:04X} IF=0x{:04X} lr=0x{:08X} spsr=0x{:08X}",
            self.enable.bits(),
            self.request.bits(),
            return_link,
            cpsr
        );
        true
    }
}
