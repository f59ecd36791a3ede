use std::fmt;

use super::{KernelError, Pcb, Pid, ProcessState};

/// Owns every PCB created during a run, terminated ones included, and
/// remembers which one holds the CPU.
#[derive(Debug, Default)]
pub struct ProcessTable {
    pcbs: Vec<Pcb>,
    running: Option<Pid>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            pcbs: Vec::new(),
            running: None,
        }
    }

    pub fn add(&mut self, pcb: Pcb) {
        self.pcbs.push(pcb);
    }

    pub fn get(&self, pid: Pid) -> Result<&Pcb, KernelError> {
        self.pcbs
            .iter()
            .find(|pcb| pcb.pid() == pid)
            .ok_or(KernelError::PidNotFound(pid))
    }

    pub fn get_mut(&mut self, pid: Pid) -> Result<&mut Pcb, KernelError> {
        self.pcbs
            .iter_mut()
            .find(|pcb| pcb.pid() == pid)
            .ok_or(KernelError::PidNotFound(pid))
    }

    /// Archives a terminated PCB out of the table. Live processes may still
    /// be queued or on the CPU, so they are refused.
    pub fn remove(&mut self, pid: Pid) -> Result<Pcb, KernelError> {
        let index = self
            .pcbs
            .iter()
            .position(|pcb| pcb.pid() == pid)
            .ok_or(KernelError::PidNotFound(pid))?;
        let state = self.pcbs[index].state();
        if state != ProcessState::Terminated {
            return Err(KernelError::StillActive { pid, state });
        }
        Ok(self.pcbs.remove(index))
    }

    /// One more than the largest pid in the table, or 1 when it is empty.
    pub fn new_pid(&self) -> Pid {
        self.pcbs.iter().map(Pcb::pid).max().map_or(1, |pid| pid + 1)
    }

    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    pub fn running_pcb(&self) -> Option<&Pcb> {
        self.running.and_then(|pid| self.get(pid).ok())
    }

    pub fn set_running(&mut self, pid: Option<Pid>) {
        self.running = pid;
    }

    pub fn set_state(&mut self, pid: Pid, state: ProcessState) -> Result<(), KernelError> {
        let pcb = self.get_mut(pid)?;
        pcb.set_state(state)
            .map_err(|from| KernelError::InvalidTransition { pid, from, to: state })
    }

    pub fn set_program_counter(&mut self, pid: Pid, program_counter: usize) -> Result<(), KernelError> {
        self.get_mut(pid)?.set_program_counter(program_counter);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pcb> {
        self.pcbs.iter()
    }

    pub fn len(&self) -> usize {
        self.pcbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pcbs.is_empty()
    }

    pub fn count_in(&self, state: ProcessState) -> usize {
        self.pcbs.iter().filter(|pcb| pcb.state() == state).count()
    }

    /// At most one PCB is running, and the running slot names it.
    pub fn is_consistent(&self) -> bool {
        let running: Vec<Pid> = self
            .pcbs
            .iter()
            .filter(|pcb| pcb.state() == ProcessState::Running)
            .map(Pcb::pid)
            .collect();

        match (running.as_slice(), self.running) {
            ([], None) => true,
            ([pid], Some(slot)) => *pid == slot,
            _ => false,
        }
    }
}

impl fmt::Display for ProcessTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, pcb) in self.pcbs.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{pcb}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::DEFAULT_PRIORITY;

    fn table_with(pids: &[Pid]) -> ProcessTable {
        let mut table = ProcessTable::new();
        for &pid in pids {
            table.add(Pcb::new(pid, "prg", DEFAULT_PRIORITY));
        }
        table
    }

    fn terminate(table: &mut ProcessTable, pid: Pid) {
        for state in [ProcessState::Ready, ProcessState::Running, ProcessState::Terminated] {
            table.set_state(pid, state).unwrap();
        }
    }

    #[test]
    fn first_pid_is_one() {
        assert_eq!(ProcessTable::new().new_pid(), 1);
    }

    #[test]
    fn new_pid_follows_the_largest_pid() {
        let mut table = table_with(&[1, 2, 3]);
        terminate(&mut table, 2);
        table.remove(2).unwrap();

        assert_eq!(table.new_pid(), 4);
    }

    #[test]
    fn get_unknown_pid_is_not_found() {
        let table = table_with(&[1]);

        assert_eq!(table.get(9).unwrap_err(), KernelError::PidNotFound(9));
    }

    #[test]
    fn mutating_unknown_pid_is_reported() {
        let mut table = table_with(&[1]);

        assert_eq!(
            table.set_state(5, ProcessState::Ready),
            Err(KernelError::PidNotFound(5))
        );
        assert_eq!(
            table.set_program_counter(5, 3),
            Err(KernelError::PidNotFound(5))
        );
    }

    #[test]
    fn invalid_transition_is_reported() {
        let mut table = table_with(&[1]);

        assert_eq!(
            table.set_state(1, ProcessState::Running),
            Err(KernelError::InvalidTransition {
                pid: 1,
                from: ProcessState::New,
                to: ProcessState::Running,
            })
        );
    }

    #[test]
    fn mutators_change_the_stored_pcb() {
        let mut table = table_with(&[1, 2]);
        table.set_state(2, ProcessState::Ready).unwrap();
        table.set_program_counter(2, 7).unwrap();

        let pcb = table.get(2).unwrap();
        assert_eq!(pcb.state(), ProcessState::Ready);
        assert_eq!(pcb.program_counter(), 7);
        assert_eq!(table.get(1).unwrap().state(), ProcessState::New);
    }

    #[test]
    fn only_terminated_pcbs_can_be_removed() {
        let mut table = table_with(&[1]);
        table.set_state(1, ProcessState::Ready).unwrap();
        table.set_state(1, ProcessState::Running).unwrap();
        table.set_running(Some(1));

        assert_eq!(
            table.remove(1).unwrap_err(),
            KernelError::StillActive {
                pid: 1,
                state: ProcessState::Running
            }
        );
        assert_eq!(table.running(), Some(1));

        table.set_state(1, ProcessState::Terminated).unwrap();
        table.set_running(None);
        assert_eq!(table.remove(1).unwrap().pid(), 1);
        assert!(table.is_consistent());
        assert!(table.is_empty());
    }

    #[test]
    fn running_slot_must_match_running_state() {
        let mut table = table_with(&[1]);
        table.set_running(Some(1));

        assert!(!table.is_consistent());
    }

    #[test]
    fn display_dumps_pid_and_state() {
        let mut table = table_with(&[1, 2]);
        table.set_state(1, ProcessState::Ready).unwrap();

        assert_eq!(
            table.to_string(),
            "[PID 1, State: ready; PID 2, State: new]"
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn pids_strictly_increase(removals in proptest::collection::vec(any::<bool>(), 1..24)) {
                let mut table = ProcessTable::new();
                let mut max_pid = 0;

                for remove_previous in removals {
                    let pid = table.new_pid();
                    prop_assert_eq!(pid, table.iter().map(Pcb::pid).max().unwrap_or(0) + 1);
                    prop_assert!(pid > max_pid || table.is_empty());
                    table.add(Pcb::new(pid, "prg", DEFAULT_PRIORITY));
                    max_pid = max_pid.max(pid);

                    if remove_previous && table.len() > 1 {
                        let first = table.iter().next().unwrap().pid();
                        terminate(&mut table, first);
                        table.remove(first).unwrap();
                    }
                }
            }
        }
    }
}
