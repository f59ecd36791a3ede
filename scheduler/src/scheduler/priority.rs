use std::collections::VecDeque;

use log::debug;

use super::Scheduler;
use crate::kernel::{Pcb, Pid};

const PRIORITY_LEVELS: usize = 5;
/// STAT ticks between two aging passes.
const AGING_INTERVAL: u32 = 3;
/// Ticks an entry must have waited before it is promoted.
const AGING_THRESHOLD: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueuedProcess {
    pid: Pid,
    /// Current rank, 1 is the highest. Aging lowers it.
    rank: u8,
    admitted_at: u64,
}

/// Five ready queues ranked 1 (highest) to 5, with aging so that nothing
/// starves. The preemptive flavour also takes the CPU away from a running
/// process when a strictly better ranked one becomes ready.
#[derive(Debug)]
pub struct PriorityScheduler {
    ready_queues: [VecDeque<QueuedProcess>; PRIORITY_LEVELS],
    ticks_to_age: u32,
    preemptive: bool,
}

impl PriorityScheduler {
    pub fn non_preemptive() -> Self {
        PriorityScheduler::with_preemption(false)
    }

    pub fn preemptive() -> Self {
        PriorityScheduler::with_preemption(true)
    }

    fn with_preemption(preemptive: bool) -> Self {
        Self {
            ready_queues: Default::default(),
            ticks_to_age: AGING_INTERVAL,
            preemptive,
        }
    }

    /// Rank currently held by a queued pid.
    #[cfg(test)]
    pub fn rank_of(&self, pid: Pid) -> Option<u8> {
        self.ready_queues
            .iter()
            .flatten()
            .find(|entry| entry.pid == pid)
            .map(|entry| entry.rank)
    }

    fn clamp_rank(priority: u8) -> u8 {
        priority.clamp(1, PRIORITY_LEVELS as u8)
    }

    /// Moves every entry that has waited long enough one rank up. Ranks are
    /// scanned from 2 downwards so an entry climbs at most once per pass.
    fn age(&mut self, tick: u64) {
        for level in 1..PRIORITY_LEVELS {
            let (higher, lower) = self.ready_queues.split_at_mut(level);
            let target = &mut higher[level - 1];
            let source = &mut lower[0];

            let mut kept = VecDeque::with_capacity(source.len());
            for mut entry in source.drain(..) {
                if entry.admitted_at + AGING_THRESHOLD <= tick {
                    entry.rank -= 1;
                    debug!("aged pid {} to rank {}", entry.pid, entry.rank);
                    target.push_back(entry);
                } else {
                    kept.push_back(entry);
                }
            }
            *source = kept;
        }
    }
}

impl Scheduler for PriorityScheduler {
    fn name(&self) -> &'static str {
        if self.preemptive {
            "Preemptive Priority Scheduler"
        } else {
            "Priority Scheduler"
        }
    }

    fn admit(&mut self, pcb: &mut Pcb, tick: u64) {
        pcb.set_admitted_at(tick);
        let rank = PriorityScheduler::clamp_rank(pcb.priority());
        self.ready_queues[rank as usize - 1].push_back(QueuedProcess {
            pid: pcb.pid(),
            rank,
            admitted_at: tick,
        });
    }

    fn next(&mut self) -> Option<Pid> {
        self.ready_queues
            .iter_mut()
            .find_map(|queue| queue.pop_front())
            .map(|entry| entry.pid)
    }

    fn has_work(&self) -> bool {
        self.ready_queues.iter().any(|queue| !queue.is_empty())
    }

    /// Lower numbers are better: preempt when the running process sits in a
    /// numerically greater rank than the candidate would be queued at.
    fn must_preempt(&self, running: &Pcb, candidate: &Pcb) -> bool {
        self.preemptive
            && PriorityScheduler::clamp_rank(running.priority())
                > PriorityScheduler::clamp_rank(candidate.priority())
    }

    fn on_clock_tick(&mut self, tick: u64) {
        self.ticks_to_age -= 1;
        if self.ticks_to_age == 0 {
            self.age(tick);
            self.ticks_to_age = AGING_INTERVAL;
        }
    }

    fn queued(&self) -> Vec<Pid> {
        self.ready_queues
            .iter()
            .flatten()
            .map(|entry| entry.pid)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcb(pid: Pid, priority: u8) -> Pcb {
        Pcb::new(pid, "prg", priority)
    }

    fn admit(scheduler: &mut PriorityScheduler, pid: Pid, priority: u8, tick: u64) {
        scheduler.admit(&mut pcb(pid, priority), tick);
    }

    fn tick_through(scheduler: &mut PriorityScheduler, from: u64, to: u64) {
        for tick in from..=to {
            scheduler.on_clock_tick(tick);
        }
    }

    #[test]
    fn best_rank_first_then_fifo_within_a_rank() {
        let mut scheduler = PriorityScheduler::non_preemptive();
        admit(&mut scheduler, 1, 3, 0);
        admit(&mut scheduler, 2, 1, 0);
        admit(&mut scheduler, 3, 3, 0);
        admit(&mut scheduler, 4, 5, 0);

        let order: Vec<Pid> = std::iter::from_fn(|| scheduler.next()).collect();

        assert_eq!(order, vec![2, 1, 3, 4]);
        assert!(!scheduler.has_work());
    }

    #[test]
    fn out_of_range_priorities_are_clamped() {
        let mut scheduler = PriorityScheduler::non_preemptive();
        admit(&mut scheduler, 1, 0, 0);
        admit(&mut scheduler, 2, 9, 0);

        assert_eq!(scheduler.rank_of(1), Some(1));
        assert_eq!(scheduler.rank_of(2), Some(5));
    }

    #[test]
    fn waiting_entry_is_promoted_on_the_next_aging_pass() {
        let mut scheduler = PriorityScheduler::non_preemptive();
        admit(&mut scheduler, 1, 3, 0);

        tick_through(&mut scheduler, 1, 2);
        assert_eq!(scheduler.rank_of(1), Some(3));

        scheduler.on_clock_tick(3);
        assert_eq!(scheduler.rank_of(1), Some(2));
    }

    #[test]
    fn fresh_entries_are_not_aged() {
        let mut scheduler = PriorityScheduler::non_preemptive();
        admit(&mut scheduler, 1, 3, 2);

        tick_through(&mut scheduler, 1, 3);

        assert_eq!(scheduler.rank_of(1), Some(3));
    }

    #[test]
    fn starved_entry_eventually_reaches_rank_one() {
        let mut scheduler = PriorityScheduler::non_preemptive();
        admit(&mut scheduler, 1, 5, 0);

        tick_through(&mut scheduler, 1, 3);
        assert_eq!(scheduler.rank_of(1), Some(4));
        tick_through(&mut scheduler, 4, 12);
        assert_eq!(scheduler.rank_of(1), Some(1));
        tick_through(&mut scheduler, 13, 30);
        assert_eq!(scheduler.rank_of(1), Some(1));
    }

    #[test]
    fn aged_entry_overtakes_newer_better_ranked_work() {
        let mut scheduler = PriorityScheduler::non_preemptive();
        admit(&mut scheduler, 1, 2, 0);
        tick_through(&mut scheduler, 1, 3);
        admit(&mut scheduler, 2, 1, 3);

        assert_eq!(scheduler.next(), Some(1));
        assert_eq!(scheduler.next(), Some(2));
    }

    #[test]
    fn aging_does_not_touch_the_pcb_priority() {
        let mut scheduler = PriorityScheduler::non_preemptive();
        let mut process = pcb(1, 4);
        scheduler.admit(&mut process, 0);

        tick_through(&mut scheduler, 1, 3);

        assert_eq!(scheduler.rank_of(1), Some(3));
        assert_eq!(process.priority(), 4);
    }

    #[test]
    fn non_preemptive_never_preempts() {
        let scheduler = PriorityScheduler::non_preemptive();

        assert!(!scheduler.must_preempt(&pcb(1, 5), &pcb(2, 1)));
    }

    #[test]
    fn preemptive_compares_running_against_candidate() {
        let scheduler = PriorityScheduler::preemptive();
        let running = pcb(1, 3);

        assert!(scheduler.must_preempt(&running, &pcb(2, 1)));
        assert!(!scheduler.must_preempt(&running, &pcb(3, 4)));
        assert!(!scheduler.must_preempt(&running, &pcb(4, 3)));
    }

    #[test]
    fn out_of_range_priorities_preempt_by_clamped_rank() {
        let scheduler = PriorityScheduler::preemptive();

        assert!(!scheduler.must_preempt(&pcb(1, 9), &pcb(2, 7)));
        assert!(!scheduler.must_preempt(&pcb(1, 1), &pcb(2, 0)));
        assert!(scheduler.must_preempt(&pcb(1, 9), &pcb(2, 4)));
        assert!(scheduler.must_preempt(&pcb(1, 2), &pcb(2, 0)));
    }
}
