mod dispatcher;
mod error;
mod handlers;
mod io;
mod loader;
mod pcb;
mod table;
mod vector;

use log::{error, info};
use tickos_hardware::{Hardware, InterruptSink, Irq, Program};

use crate::scheduler::Scheduler;

pub use dispatcher::Dispatcher;
pub use error::KernelError;
pub use io::IoDeviceController;
pub use loader::Loader;
pub use pcb::{Pcb, Pid, ProcessState, DEFAULT_PRIORITY};
pub use table::ProcessTable;
pub use vector::{InterruptHandler, InterruptVector};

/// The operating system core: owns the process table and the policy
/// objects, and reacts to every interrupt the hardware raises.
pub struct Kernel<S> {
    table: ProcessTable,
    scheduler: S,
    io_controller: IoDeviceController,
    loader: Loader,
    dispatcher: Dispatcher,
    vector: InterruptVector,
}

impl<S: Scheduler> Kernel<S> {
    pub fn new(scheduler: S, hardware: &mut Hardware) -> Self {
        Kernel::with_vector(scheduler, hardware, InterruptVector::with_default_handlers())
    }

    pub fn with_vector(scheduler: S, hardware: &mut Hardware, vector: InterruptVector) -> Self {
        if let Some(quantum) = scheduler.quantum() {
            hardware.timer.set_quantum(quantum);
        }
        info!("kernel booted with {}", scheduler.name());

        Self {
            table: ProcessTable::new(),
            scheduler,
            io_controller: IoDeviceController::new(),
            loader: Loader::new(),
            dispatcher: Dispatcher,
            vector,
        }
    }

    /// Submits a program for execution. `priority` only matters to the
    /// priority schedulers.
    pub fn run(&mut self, hardware: &mut Hardware, program: Program, priority: Option<u8>) {
        let name = program.name().to_owned();
        self.raise(hardware, Irq::new_process(program, priority));
        info!("executing program: {name}");
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn io_controller(&self) -> &IoDeviceController {
        &self.io_controller
    }

    #[cfg(test)]
    pub fn vector_mut(&mut self) -> &mut InterruptVector {
        &mut self.vector
    }

    pub fn all_terminated(&self) -> bool {
        self.table
            .iter()
            .all(|pcb| pcb.state() == ProcessState::Terminated)
    }
}

impl<S: Scheduler> InterruptSink for Kernel<S> {
    fn raise(&mut self, hardware: &mut Hardware, irq: Irq) {
        let kind = irq.kind();
        let Some(handler) = self.vector.handler_for(kind) else {
            error!("no handler registered for {kind}, interrupt dropped");
            return;
        };

        if let Err(err) = self.execute(handler, hardware, irq) {
            error!("{kind} handler failed: {err}");
        }
        if !self.table.is_consistent() {
            error!("process table inconsistent after {kind}: {}", self.table);
        }
    }
}
