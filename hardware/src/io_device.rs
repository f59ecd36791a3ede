use log::{debug, error};

use crate::{asm::Instruction, interrupt::Irq};

/// A device that serves one instruction at a time, taking a fixed number of
/// ticks per request and raising IO_OUT when done.
#[derive(Debug)]
pub struct IoDevice {
    id: String,
    service_time: u64,
    in_flight: Option<InFlight>,
}

#[derive(Debug)]
struct InFlight {
    instruction: Instruction,
    remaining: u64,
}

impl IoDevice {
    pub fn new(id: &str, service_time: u64) -> Self {
        Self {
            id: id.to_owned(),
            service_time: service_time.max(1),
            in_flight: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn service_time(&self) -> u64 {
        self.service_time
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    pub fn current(&self) -> Option<Instruction> {
        self.in_flight.as_ref().map(|op| op.instruction)
    }

    /// Starts serving `instruction`. Handing work to a busy device is a
    /// wiring error in the caller; the new request replaces nothing and is
    /// ignored.
    pub fn execute(&mut self, instruction: Instruction) {
        if let Some(op) = &self.in_flight {
            error!(
                "{} is busy with {}, dropping {instruction}",
                self.id,
                op.instruction
            );
            return;
        }
        debug!("{} started {instruction}", self.id);
        self.in_flight = Some(InFlight {
            instruction,
            remaining: self.service_time,
        });
    }

    /// The device goes idle before IO_OUT is returned, so the handler may
    /// immediately start the next request.
    pub fn tick(&mut self) -> Option<Irq> {
        let op = self.in_flight.as_mut()?;
        op.remaining -= 1;
        if op.remaining > 0 {
            return None;
        }

        debug!("{} finished {}", self.id, op.instruction);
        self.in_flight = None;
        Some(Irq::io_out())
    }
}
