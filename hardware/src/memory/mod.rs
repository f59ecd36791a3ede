pub mod consts;
mod word;

use std::fmt;

use crate::{asm::Instruction, error::HardwareError};
pub use word::Word;

/// Flat, word-addressed program memory.
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![Word::default(); size],
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn write(&mut self, address: usize, instruction: Instruction) -> Result<(), HardwareError> {
        let size = self.size();
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(HardwareError::OutOfBounds { address, size })?;
        *cell = Word::encode(instruction);
        Ok(())
    }

    pub fn read(&self, address: usize) -> Result<Instruction, HardwareError> {
        let cell = self.cells.get(address).ok_or(HardwareError::OutOfBounds {
            address,
            size: self.size(),
        })?;
        cell.decode().ok_or(HardwareError::InvalidWord { address })
    }

    /// Number of cells that hold an instruction.
    pub fn used(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Memory [")?;
        for (address, cell) in self.cells.iter().enumerate() {
            if address > 0 {
                write!(f, " ")?;
            }
            match cell.decode() {
                Some(instruction) => write!(f, "{address}:{instruction}")?,
                None => write!(f, "{address}:-")?,
            }
        }
        write!(f, "]")
    }
}
