use std::{collections::VecDeque, fmt};

use log::debug;
use tickos_hardware::{Instruction, IoDevice};

use super::Pid;

/// Serializes access to the I/O device. Requests are served strictly in
/// arrival order, whatever the priority of the process behind them.
#[derive(Debug, Default)]
pub struct IoDeviceController {
    waiting: VecDeque<(Pid, Instruction)>,
    current: Option<Pid>,
    submitted: u64,
    completed: u64,
}

impl IoDeviceController {
    pub fn new() -> Self {
        Self {
            waiting: VecDeque::new(),
            current: None,
            submitted: 0,
            completed: 0,
        }
    }

    pub fn request(&mut self, pid: Pid, instruction: Instruction, device: &mut IoDevice) {
        self.waiting.push_back((pid, instruction));
        self.submitted += 1;
        self.start_next_if_idle(device);
    }

    /// Returns the process whose request just finished and starts the next
    /// pending one.
    pub fn collect_completed(&mut self, device: &mut IoDevice) -> Option<Pid> {
        let finished = self.current.take();
        if finished.is_some() {
            self.completed += 1;
        }
        self.start_next_if_idle(device);
        finished
    }

    fn start_next_if_idle(&mut self, device: &mut IoDevice) {
        if self.current.is_some() || !device.is_idle() {
            return;
        }
        if let Some((pid, instruction)) = self.waiting.pop_front() {
            debug!("{} serving pid {pid}", device.id());
            self.current = Some(pid);
            device.execute(instruction);
        }
    }

    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    pub fn waiting(&self) -> impl Iterator<Item = Pid> + '_ {
        self.waiting.iter().map(|(pid, _)| *pid)
    }

    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }
}

impl fmt::Display for IoDeviceController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current() {
            Some(pid) => write!(f, "IoDeviceController running: {pid} waiting: [")?,
            None => write!(f, "IoDeviceController running: - waiting: [")?,
        }
        for (index, pid) in self.waiting().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{pid}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(device: &mut IoDevice) {
        while device.tick().is_none() {}
    }

    #[test]
    fn idle_device_starts_immediately() {
        let mut device = IoDevice::new("disk", 3);
        let mut controller = IoDeviceController::new();

        controller.request(1, Instruction::Io, &mut device);

        assert_eq!(controller.current(), Some(1));
        assert_eq!(controller.waiting().count(), 0);
        assert!(!device.is_idle());
    }

    #[test]
    fn busy_device_queues_in_submission_order() {
        let mut device = IoDevice::new("disk", 3);
        let mut controller = IoDeviceController::new();

        for pid in [4, 1, 3, 2] {
            controller.request(pid, Instruction::Io, &mut device);
        }

        assert_eq!(controller.current(), Some(4));
        assert_eq!(controller.waiting().collect::<Vec<_>>(), vec![1, 3, 2]);
        assert_eq!(controller.to_string(), "IoDeviceController running: 4 waiting: [1, 3, 2]");
    }

    #[test]
    fn completions_drain_fifo() {
        let mut device = IoDevice::new("disk", 2);
        let mut controller = IoDeviceController::new();
        for pid in [4, 1, 3, 2] {
            controller.request(pid, Instruction::Io, &mut device);
        }

        let mut served = Vec::new();
        while controller.current().is_some() {
            finish(&mut device);
            served.extend(controller.collect_completed(&mut device));
        }

        assert_eq!(served, vec![4, 1, 3, 2]);
        assert_eq!(controller.submitted(), 4);
        assert_eq!(controller.completed(), 4);
        assert!(device.is_idle());
    }

    #[test]
    fn collecting_with_nothing_in_flight_returns_none() {
        let mut device = IoDevice::new("disk", 2);
        let mut controller = IoDeviceController::new();

        assert_eq!(controller.collect_completed(&mut device), None);
        assert_eq!(controller.completed(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn service_order_is_submission_order(pids in proptest::collection::vec(1u32..50, 1..12)) {
                let mut device = IoDevice::new("disk", 1);
                let mut controller = IoDeviceController::new();
                for &pid in &pids {
                    controller.request(pid, Instruction::Io, &mut device);
                }

                let mut served = Vec::new();
                while controller.current().is_some() {
                    finish(&mut device);
                    served.extend(controller.collect_completed(&mut device));
                }

                prop_assert_eq!(served, pids);
            }
        }
    }
}
