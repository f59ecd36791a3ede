use modular_bitfield::prelude::*;

use super::consts::{OPCODE_CPU, OPCODE_EMPTY, OPCODE_EXIT, OPCODE_IO};
use crate::asm::Instruction;

/// One memory cell. An all-zero word is an unwritten cell.
#[bitfield(bits = 8)]
#[derive(Clone, Copy, Debug)]
pub struct Word {
    opcode: B2,
    #[skip(getters, setters)]
    reserved: B6,
}

impl Word {
    pub fn encode(instruction: Instruction) -> Self {
        let opcode = match instruction {
            Instruction::Cpu => OPCODE_CPU,
            Instruction::Io => OPCODE_IO,
            Instruction::Exit => OPCODE_EXIT,
        };
        Word::new().with_opcode(opcode)
    }

    /// Returns `None` for an unwritten cell.
    pub fn decode(&self) -> Option<Instruction> {
        match self.opcode() {
            OPCODE_CPU => Some(Instruction::Cpu),
            OPCODE_IO => Some(Instruction::Io),
            OPCODE_EXIT => Some(Instruction::Exit),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.opcode() == OPCODE_EMPTY
    }
}

impl Default for Word {
    fn default() -> Self {
        Word::new()
    }
}
