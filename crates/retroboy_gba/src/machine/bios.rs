use std::path::Path;

use crate::cpu::{Cpu, CpuMode, CpuState, Processor};

use super::error::{GbaError, GbaResult, ImageKind};

/// Size of the GBA system ROM mapped at 0x00000000.
pub const BIOS_SIZE: usize = 16 * 1024;

/// Phase of BIOS execution, used for read protection.
///
/// Once the PC leaves the BIOS, reads from it return the last opcode the
/// BIOS fetched instead of real data. Which opcode that is depends on how
/// the BIOS was last exited.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum BiosState {
    #[default]
    Startup,
    IrqExecute,
    IrqFinish,
    SwiFinish,
}

impl BiosState {
    /// Opcode latched on the bus after leaving the BIOS in this state.
    pub const fn latched_opcode(self) -> u32 {
        match self {
            BiosState::Startup => 0xE129_F000,
            BiosState::IrqExecute => 0xE25E_F004,
            BiosState::IrqFinish => 0xE55E_C002,
            BiosState::SwiFinish => 0xE3A0_2004,
        }
    }
}

/// System ROM image.
pub struct Bios {
    data: Box<[u8]>,
    pub state: BiosState,
    /// Route software interrupts through the real BIOS handlers.
    pub use_gba_bios: bool,
}

impl Bios {
    pub fn from_bytes(data: Vec<u8>) -> GbaResult<Self> {
        if data.len() != BIOS_SIZE {
            return Err(GbaError::ImageLoad {
                image: ImageKind::Bios,
                reason: format!("expected {} bytes, got {}", BIOS_SIZE, data.len()),
            });
        }
        log::debug!("GBA BIOS: loaded {} bytes", data.len());
        Ok(Self {
            data: data.into_boxed_slice(),
            state: BiosState::Startup,
            use_gba_bios: true,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> GbaResult<Self> {
        let data = std::fs::read(path).map_err(|source| GbaError::Io {
            image: ImageKind::Bios,
            source,
        })?;
        Self::from_bytes(data)
    }

    /// Offsets wrap within the 16 KiB image.
    #[inline]
    pub fn read_byte(&self, offset: u32) -> u8 {
        self.data[(offset as usize) & (BIOS_SIZE - 1)]
    }

    #[inline]
    pub fn read_half_word(&self, offset: u32) -> u16 {
        u16::from_le_bytes([self.read_byte(offset), self.read_byte(offset.wrapping_add(1))])
    }

    #[inline]
    pub fn read_word(&self, offset: u32) -> u32 {
        u32::from_le_bytes([
            self.read_byte(offset),
            self.read_byte(offset.wrapping_add(1)),
            self.read_byte(offset.wrapping_add(2)),
            self.read_byte(offset.wrapping_add(3)),
        ])
    }

    /// Enter the SWI exception so the real BIOS services the call.
    ///
    /// `cpu` must be positioned as the interpreter leaves it while executing
    /// the SWI: R15 two instructions ahead. Returns `false` without touching
    /// the processor when SWIs are not routed through the BIOS image.
    pub fn enter_swi<P: Processor>(&self, cpu: &mut P, comment: u32) -> bool {
        if !self.use_gba_bios {
            return false;
        }

        let width = cpu.state().instruction_width();
        let return_address = cpu.pc().wrapping_sub(width);
        let cpsr = cpu.cpsr();

        cpu.set_mode(CpuMode::Supervisor);
        cpu.set_lr(return_address);
        cpu.set_spsr(CpuMode::Supervisor, cpsr);
        cpu.set_state(CpuState::Arm);
        cpu.set_irq_disabled(true);
        cpu.set_pc(Cpu::SWI_VECTOR);
        cpu.request_pipeline_flush();

        log::debug!(
            "GBA SWI 0x{:02X}: return=0x{:08X} cpsr=0x{:08X}",
            comment,
            return_address,
            cpsr
        );
        true
    }
}
