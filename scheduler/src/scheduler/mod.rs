mod fcfs;
mod priority;
mod round_robin;

use std::{fmt, str::FromStr};

use crate::kernel::{Pcb, Pid};

pub use fcfs::FcfsScheduler;
pub use priority::PriorityScheduler;
pub use round_robin::RoundRobinScheduler;

/// Quantum used by round robin when none is configured.
pub const DEFAULT_QUANTUM: u32 = 3;

/// Ready-queue policy. Queues hold pids; the PCBs stay in the process table.
pub trait Scheduler {
    fn name(&self) -> &'static str;

    /// Queues a ready process, stamping the tick it was admitted at.
    fn admit(&mut self, pcb: &mut Pcb, tick: u64);
    fn next(&mut self) -> Option<Pid>;
    fn has_work(&self) -> bool;

    /// Whether `candidate` should take the CPU away from `running`.
    fn must_preempt(&self, _running: &Pcb, _candidate: &Pcb) -> bool {
        false
    }

    /// Called on every STAT interrupt.
    fn on_clock_tick(&mut self, _tick: u64) {}

    /// Time slice the hardware timer should enforce, if any.
    fn quantum(&self) -> Option<u32> {
        None
    }

    /// Queued pids in the order they would be picked.
    fn queued(&self) -> Vec<Pid>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyKind {
    Fcfs,
    Priority,
    PreemptivePriority,
    RoundRobin,
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(PolicyKind::Fcfs),
            "priority" => Ok(PolicyKind::Priority),
            "preemptive" | "preemptive-priority" => Ok(PolicyKind::PreemptivePriority),
            "rr" | "round-robin" => Ok(PolicyKind::RoundRobin),
            other => Err(format!("unknown scheduling policy '{other}'")),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Fcfs => "fcfs",
            PolicyKind::Priority => "priority",
            PolicyKind::PreemptivePriority => "preemptive",
            PolicyKind::RoundRobin => "rr",
        };
        f.write_str(name)
    }
}

/// The scheduler chosen at start-up.
pub enum Policy {
    Fcfs(FcfsScheduler),
    Priority(PriorityScheduler),
    RoundRobin(RoundRobinScheduler),
}

impl Policy {
    pub fn new(kind: PolicyKind, quantum: u32) -> Self {
        match kind {
            PolicyKind::Fcfs => Policy::Fcfs(FcfsScheduler::new()),
            PolicyKind::Priority => Policy::Priority(PriorityScheduler::non_preemptive()),
            PolicyKind::PreemptivePriority => Policy::Priority(PriorityScheduler::preemptive()),
            PolicyKind::RoundRobin => Policy::RoundRobin(RoundRobinScheduler::new(quantum)),
        }
    }

    fn inner(&self) -> &dyn Scheduler {
        match self {
            Policy::Fcfs(scheduler) => scheduler,
            Policy::Priority(scheduler) => scheduler,
            Policy::RoundRobin(scheduler) => scheduler,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Scheduler {
        match self {
            Policy::Fcfs(scheduler) => scheduler,
            Policy::Priority(scheduler) => scheduler,
            Policy::RoundRobin(scheduler) => scheduler,
        }
    }
}

impl Scheduler for Policy {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn admit(&mut self, pcb: &mut Pcb, tick: u64) {
        self.inner_mut().admit(pcb, tick)
    }

    fn next(&mut self) -> Option<Pid> {
        self.inner_mut().next()
    }

    fn has_work(&self) -> bool {
        self.inner().has_work()
    }

    fn must_preempt(&self, running: &Pcb, candidate: &Pcb) -> bool {
        self.inner().must_preempt(running, candidate)
    }

    fn on_clock_tick(&mut self, tick: u64) {
        self.inner_mut().on_clock_tick(tick)
    }

    fn quantum(&self) -> Option<u32> {
        self.inner().quantum()
    }

    fn queued(&self) -> Vec<Pid> {
        self.inner().queued()
    }
}
