use log::debug;
use tickos_hardware::{HardwareError, Memory, Program};

/// Places program images one after another in memory. Images are never
/// reclaimed, so the cursor only grows.
#[derive(Debug, Default)]
pub struct Loader {
    next_address: usize,
}

impl Loader {
    pub fn new() -> Self {
        Self { next_address: 0 }
    }

    #[cfg(test)]
    pub fn next_address(&self) -> usize {
        self.next_address
    }

    /// Copies the program into memory and returns its base address. An
    /// image that does not fit is rejected before anything is written.
    pub fn load(&mut self, program: &Program, memory: &mut Memory) -> Result<usize, HardwareError> {
        let base_address = self.next_address;
        let end = base_address + program.len();
        if end > memory.size() {
            return Err(HardwareError::OutOfBounds {
                address: end - 1,
                size: memory.size(),
            });
        }

        for (offset, instruction) in program.instructions().iter().enumerate() {
            memory.write(base_address + offset, *instruction)?;
        }
        self.next_address += program.len();

        debug!(
            "loaded {} at {}..{}",
            program.name(),
            base_address,
            self.next_address
        );
        Ok(base_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickos_hardware::{asm, Instruction};

    #[test]
    fn images_are_placed_back_to_back() {
        let mut memory = Memory::new(16);
        let mut loader = Loader::new();

        let first = loader
            .load(&Program::new("a", asm::cpu(2)), &mut memory)
            .unwrap();
        let second = loader
            .load(&Program::new("b", asm::io()), &mut memory)
            .unwrap();

        assert_eq!(first, 0);
        assert_eq!(second, 3);
        assert_eq!(loader.next_address(), 5);
        assert_eq!(memory.read(2), Ok(Instruction::Exit));
        assert_eq!(memory.read(3), Ok(Instruction::Io));
    }

    #[test]
    fn image_that_does_not_fit_is_an_error() {
        let mut memory = Memory::new(2);
        let mut loader = Loader::new();

        let result = loader.load(&Program::new("big", asm::cpu(4)), &mut memory);

        assert_eq!(
            result,
            Err(HardwareError::OutOfBounds {
                address: 4,
                size: 2
            })
        );
    }

    #[test]
    fn rejected_image_leaves_memory_untouched() {
        let mut memory = Memory::new(4);
        let mut loader = Loader::new();
        loader
            .load(&Program::new("a", asm::cpu(1)), &mut memory)
            .unwrap();

        let result = loader.load(&Program::new("b", asm::cpu(3)), &mut memory);

        assert!(result.is_err());
        assert_eq!(memory.used(), 2);
        assert_eq!(loader.next_address(), 2);
        assert_eq!(memory.read(2), Err(HardwareError::InvalidWord { address: 2 }));
    }
}
