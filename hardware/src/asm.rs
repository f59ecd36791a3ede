use std::fmt;

/// The operations the CPU understands. Only two facts matter to the kernel:
/// whether an instruction needs the I/O device, and whether it ends the
/// process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Cpu,
    Io,
    Exit,
}

impl Instruction {
    pub fn is_io(&self) -> bool {
        matches!(self, Instruction::Io)
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Instruction::Exit)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Cpu => write!(f, "CPU"),
            Instruction::Io => write!(f, "IO"),
            Instruction::Exit => write!(f, "EXIT"),
        }
    }
}

/// A burst of `ticks` CPU instructions.
pub fn cpu(ticks: usize) -> Vec<Instruction> {
    vec![Instruction::Cpu; ticks]
}

pub fn io() -> Vec<Instruction> {
    vec![Instruction::Io]
}

pub fn exit() -> Vec<Instruction> {
    vec![Instruction::Exit]
}

/// A named, immutable instruction sequence that always ends in EXIT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    name: String,
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new<I>(name: &str, instructions: I) -> Self
    where
        I: IntoIterator<Item = Instruction>,
    {
        let mut instructions: Vec<Instruction> = instructions.into_iter().collect();
        if !instructions.last().is_some_and(Instruction::is_exit) {
            instructions.push(Instruction::Exit);
        }

        Self {
            name: name.to_owned(),
            instructions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Program({}, [", self.name)?;
        for (index, instruction) in self.instructions.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{instruction}")?;
        }
        write!(f, "])")
    }
}
