//! Simulated hardware for the tickos kernel: memory, a single CPU, a clock,
//! a countdown timer and one I/O device, all advanced together one tick at a
//! time by [`Hardware::tick`].

pub mod asm;
pub mod clock;
pub mod cpu;
pub mod error;
pub mod interrupt;
pub mod io_device;
pub mod memory;

pub use asm::{Instruction, Program};
pub use clock::{Clock, Timer};
pub use cpu::Cpu;
pub use error::HardwareError;
pub use interrupt::{InterruptSink, InterruptType, Irq, IrqPayload};
pub use io_device::IoDevice;
pub use memory::Memory;

use log::trace;
use memory::consts::{DEFAULT_IO_TIME, DEFAULT_MEMORY_SIZE};

/// The whole machine. Owned by the simulation and lent to the kernel while
/// an interrupt is being handled.
pub struct Hardware {
    pub cpu: Cpu,
    pub memory: Memory,
    pub clock: Clock,
    pub timer: Timer,
    pub io_device: IoDevice,
    stats_enabled: bool,
}

impl Hardware {
    pub fn new() -> Self {
        Hardware::with_sizes(DEFAULT_MEMORY_SIZE, DEFAULT_IO_TIME)
    }

    pub fn with_sizes(memory_size: usize, io_time: u64) -> Self {
        Self {
            cpu: Cpu::new(),
            memory: Memory::new(memory_size),
            clock: Clock::new(),
            timer: Timer::new(),
            io_device: IoDevice::new("printer", io_time),
            stats_enabled: true,
        }
    }

    pub fn set_stats_enabled(&mut self, enabled: bool) {
        self.stats_enabled = enabled;
    }

    pub fn stats_enabled(&self) -> bool {
        self.stats_enabled
    }

    /// Advances every component by one tick, delivering raised interrupts to
    /// `sink` synchronously and in order: STAT, then TIMEOUT or whatever the
    /// executed instruction raised, then IO_OUT.
    pub fn tick<S: InterruptSink>(&mut self, sink: &mut S) {
        let tick = self.clock.advance();
        trace!("tick {tick}");

        if self.stats_enabled {
            sink.raise(self, Irq::stat());
        }

        if self.cpu.is_busy() {
            if self.timer.expired() {
                self.timer.reset();
                sink.raise(self, Irq::timeout());
            } else {
                self.timer.count();
                if let Some(irq) = self.cpu.step(&self.memory) {
                    sink.raise(self, irq);
                }
            }
        }

        if let Some(irq) = self.io_device.tick() {
            sink.raise(self, irq);
        }
    }
}

impl Default for Hardware {
    fn default() -> Self {
        Hardware::new()
    }
}
