use super::{FcfsScheduler, Scheduler};
use crate::kernel::{Pcb, Pid};

/// FCFS ordering plus a time slice. Preemption comes from the hardware timer
/// (TIMEOUT), never from comparing processes.
#[derive(Debug)]
pub struct RoundRobinScheduler {
    queue: FcfsScheduler,
    quantum: u32,
}

impl RoundRobinScheduler {
    pub fn new(quantum: u32) -> Self {
        Self {
            queue: FcfsScheduler::new(),
            quantum: quantum.max(1),
        }
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        "Round Robin Scheduler"
    }

    fn admit(&mut self, pcb: &mut Pcb, tick: u64) {
        self.queue.admit(pcb, tick);
    }

    fn next(&mut self) -> Option<Pid> {
        self.queue.next()
    }

    fn has_work(&self) -> bool {
        self.queue.has_work()
    }

    fn quantum(&self) -> Option<u32> {
        Some(self.quantum)
    }

    fn queued(&self) -> Vec<Pid> {
        self.queue.queued()
    }
}
