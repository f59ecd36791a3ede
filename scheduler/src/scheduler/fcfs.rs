use std::collections::VecDeque;

use super::Scheduler;
use crate::kernel::{Pcb, Pid};

/// First come, first served.
#[derive(Debug, Default)]
pub struct FcfsScheduler {
    ready_queue: VecDeque<Pid>,
}

impl FcfsScheduler {
    pub fn new() -> Self {
        Self {
            ready_queue: VecDeque::new(),
        }
    }
}

impl Scheduler for FcfsScheduler {
    fn name(&self) -> &'static str {
        "FCFS Scheduler"
    }

    fn admit(&mut self, pcb: &mut Pcb, tick: u64) {
        pcb.set_admitted_at(tick);
        self.ready_queue.push_back(pcb.pid());
    }

    fn next(&mut self) -> Option<Pid> {
        self.ready_queue.pop_front()
    }

    fn has_work(&self) -> bool {
        !self.ready_queue.is_empty()
    }

    fn queued(&self) -> Vec<Pid> {
        self.ready_queue.iter().copied().collect()
    }
}
