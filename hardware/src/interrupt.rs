use std::fmt;

use crate::{
    asm::{Instruction, Program},
    Hardware,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterruptType {
    New,
    Kill,
    IoIn,
    IoOut,
    Timeout,
    Stat,
}

impl InterruptType {
    pub const ALL: [InterruptType; 6] = [
        InterruptType::New,
        InterruptType::Kill,
        InterruptType::IoIn,
        InterruptType::IoOut,
        InterruptType::Timeout,
        InterruptType::Stat,
    ];
}

impl fmt::Display for InterruptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterruptType::New => "NEW",
            InterruptType::Kill => "KILL",
            InterruptType::IoIn => "IO_IN",
            InterruptType::IoOut => "IO_OUT",
            InterruptType::Timeout => "TIMEOUT",
            InterruptType::Stat => "STAT",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IrqPayload {
    None,
    New {
        program: Program,
        priority: Option<u8>,
    },
    Io(Instruction),
}

/// An interrupt request: what happened, plus whatever its handler needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Irq {
    kind: InterruptType,
    payload: IrqPayload,
}

impl Irq {
    pub fn new(kind: InterruptType, payload: IrqPayload) -> Self {
        Self { kind, payload }
    }

    pub fn new_process(program: Program, priority: Option<u8>) -> Self {
        Irq::new(InterruptType::New, IrqPayload::New { program, priority })
    }

    pub fn kill() -> Self {
        Irq::new(InterruptType::Kill, IrqPayload::None)
    }

    pub fn io_in(instruction: Instruction) -> Self {
        Irq::new(InterruptType::IoIn, IrqPayload::Io(instruction))
    }

    pub fn io_out() -> Self {
        Irq::new(InterruptType::IoOut, IrqPayload::None)
    }

    pub fn timeout() -> Self {
        Irq::new(InterruptType::Timeout, IrqPayload::None)
    }

    pub fn stat() -> Self {
        Irq::new(InterruptType::Stat, IrqPayload::None)
    }

    pub fn kind(&self) -> InterruptType {
        self.kind
    }

    pub fn payload(&self) -> &IrqPayload {
        &self.payload
    }

    pub fn into_payload(self) -> IrqPayload {
        self.payload
    }
}

/// Receives every interrupt the hardware raises. Handling happens
/// synchronously; the sink gets the hardware back so it can drive the CPU,
/// timer and I/O device while it handles the request.
pub trait InterruptSink {
    fn raise(&mut self, hardware: &mut Hardware, irq: Irq);
}
