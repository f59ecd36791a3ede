use std::fmt;

pub type Pid = u32;

/// Priority given to processes submitted without one.
pub const DEFAULT_PRIORITY: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Waiting,
    Terminated,
}

impl ProcessState {
    pub fn can_become(self, next: ProcessState) -> bool {
        use ProcessState::*;

        matches!(
            (self, next),
            (New, Ready)
                | (Ready, Running)
                | (Running, Waiting)
                | (Running, Terminated)
                | (Running, Ready)
                | (Waiting, Ready)
                | (Waiting, Running)
        )
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::New => "new",
            ProcessState::Ready => "ready",
            ProcessState::Running => "running",
            ProcessState::Waiting => "waiting",
            ProcessState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Process control block. Lives in the [`ProcessTable`](super::ProcessTable);
/// everything else refers to it by pid.
#[derive(Clone, Debug)]
pub struct Pcb {
    pid: Pid,
    name: String,
    base_address: usize,
    program_counter: usize,
    state: ProcessState,
    priority: u8,
    admitted_at: u64,
    history: Vec<ProcessState>,
}

impl Pcb {
    pub fn new(pid: Pid, name: &str, priority: u8) -> Self {
        Self {
            pid,
            name: name.to_owned(),
            base_address: 0,
            program_counter: 0,
            state: ProcessState::New,
            priority,
            admitted_at: 0,
            history: vec![ProcessState::New],
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_address(&self) -> usize {
        self.base_address
    }

    pub fn set_base_address(&mut self, base_address: usize) {
        self.base_address = base_address;
    }

    pub fn program_counter(&self) -> usize {
        self.program_counter
    }

    pub fn set_program_counter(&mut self, program_counter: usize) {
        self.program_counter = program_counter;
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Moves to `state` if the lifecycle allows it. Returns the rejected
    /// current state otherwise.
    pub fn set_state(&mut self, state: ProcessState) -> Result<(), ProcessState> {
        if !self.state.can_become(state) {
            return Err(self.state);
        }
        self.state = state;
        self.history.push(state);
        Ok(())
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Tick at which the process last entered a ready queue.
    #[cfg(test)]
    pub fn admitted_at(&self) -> u64 {
        self.admitted_at
    }

    pub fn set_admitted_at(&mut self, tick: u64) {
        self.admitted_at = tick;
    }

    /// Every state the process has been in, oldest first.
    pub fn history(&self) -> &[ProcessState] {
        &self.history
    }
}

impl fmt::Display for Pcb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID {}, State: {}", self.pid, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProcessState::*;

    #[test]
    fn follows_the_lifecycle() {
        let mut pcb = Pcb::new(1, "prg", DEFAULT_PRIORITY);

        for state in [Ready, Running, Waiting, Ready, Running, Terminated] {
            pcb.set_state(state).unwrap();
        }

        assert_eq!(
            pcb.history(),
            &[New, Ready, Running, Waiting, Ready, Running, Terminated]
        );
    }

    #[test]
    fn terminated_is_absorbing() {
        let mut pcb = Pcb::new(1, "prg", DEFAULT_PRIORITY);
        pcb.set_state(Ready).unwrap();
        pcb.set_state(Running).unwrap();
        pcb.set_state(Terminated).unwrap();

        for state in [New, Ready, Running, Waiting, Terminated] {
            assert_eq!(pcb.set_state(state), Err(Terminated));
        }
        assert_eq!(pcb.state(), Terminated);
    }

    #[test]
    fn new_process_cannot_run_before_it_is_ready() {
        let mut pcb = Pcb::new(1, "prg", DEFAULT_PRIORITY);

        assert_eq!(pcb.set_state(Running), Err(New));
        assert_eq!(pcb.history(), &[New]);
    }

    #[test]
    fn display_shows_pid_and_state() {
        let pcb = Pcb::new(7, "prg", 1);

        assert_eq!(pcb.to_string(), "PID 7, State: new");
    }
}
