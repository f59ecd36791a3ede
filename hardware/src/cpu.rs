use log::{debug, error};

use crate::{
    asm::Instruction,
    interrupt::Irq,
    memory::Memory,
};

/// The single simulated CPU. `program_counter` is relative to
/// `base_address`; no program counter means the CPU is idle.
#[derive(Debug, Default)]
pub struct Cpu {
    program_counter: Option<usize>,
    base_address: usize,
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            program_counter: None,
            base_address: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.program_counter.is_some()
    }

    pub fn program_counter(&self) -> Option<usize> {
        self.program_counter
    }

    pub fn base_address(&self) -> usize {
        self.base_address
    }

    /// Hands the CPU to a process image starting at `base_address`.
    pub fn dispatch(&mut self, base_address: usize, program_counter: usize) {
        self.base_address = base_address;
        self.program_counter = Some(program_counter);
    }

    pub fn set_idle(&mut self) {
        self.program_counter = None;
    }

    /// Executes one instruction and returns the interrupt it raises, if any.
    /// A fetch fault kills the faulting process.
    pub fn step(&mut self, memory: &Memory) -> Option<Irq> {
        let pc = self.program_counter?;
        let address = self.base_address + pc;
        self.program_counter = Some(pc + 1);

        match memory.read(address) {
            Ok(Instruction::Cpu) => {
                debug!("CPU executed instruction at {address}");
                None
            }
            Ok(instruction @ Instruction::Io) => Some(Irq::io_in(instruction)),
            Ok(Instruction::Exit) => Some(Irq::kill()),
            Err(err) => {
                error!("CPU fetch fault: {err}");
                Some(Irq::kill())
            }
        }
    }
}
