use std::fmt::Write;

use log::info;
use tickos_hardware::{Hardware, Program};

use super::Gantt;
use crate::{
    kernel::{Kernel, ProcessState},
    scheduler::Scheduler,
};

/// The machine and the kernel running on it, advanced one tick at a time.
pub struct Simulation<S> {
    hardware: Hardware,
    kernel: Kernel<S>,
    gantt: Gantt,
}

impl<S: Scheduler> Simulation<S> {
    pub fn new(scheduler: S, mut hardware: Hardware) -> Self {
        let kernel = Kernel::new(scheduler, &mut hardware);
        Self {
            hardware,
            kernel,
            gantt: Gantt::new(),
        }
    }

    pub fn submit(&mut self, program: Program, priority: Option<u8>) {
        self.kernel.run(&mut self.hardware, program, priority);
    }

    pub fn step(&mut self) {
        self.hardware.tick(&mut self.kernel);
        self.gantt
            .record(self.hardware.clock.current_tick(), self.kernel.table());
    }

    /// All submitted work has terminated.
    pub fn finished(&self) -> bool {
        !self.kernel.table().is_empty() && self.kernel.all_terminated()
    }

    /// Steps until every process terminates or `max_ticks` pass. Returns the
    /// number of ticks run.
    pub fn run_until_finished(&mut self, max_ticks: u64) -> u64 {
        let mut ticks = 0;
        while !self.finished() && ticks < max_ticks {
            self.step();
            ticks += 1;
        }
        info!(
            "simulation stopped after {ticks} ticks, {} of {} processes terminated",
            self.kernel.table().count_in(ProcessState::Terminated),
            self.kernel.table().len()
        );
        ticks
    }

    /// Per-process state history followed by the I/O counters.
    pub fn summary(&self) -> String {
        let mut summary = String::new();
        for pcb in self.kernel.table().iter() {
            let path: Vec<String> = pcb.history().iter().map(ToString::to_string).collect();
            let _ = writeln!(summary, "{:>3} {}: {}", pcb.pid(), pcb.name(), path.join(" > "));
        }
        let io = self.kernel.io_controller();
        let _ = writeln!(
            summary,
            "io: {} submitted, {} completed",
            io.submitted(),
            io.completed()
        );
        summary
    }

    pub fn kernel(&self) -> &Kernel<S> {
        &self.kernel
    }

    pub fn hardware(&self) -> &Hardware {
        &self.hardware
    }

    pub fn gantt(&self) -> &Gantt {
        &self.gantt
    }
}
