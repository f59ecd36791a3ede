/// Counts elapsed ticks since the machine was switched on.
#[derive(Debug, Default)]
pub struct Clock {
    current_tick: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self { current_tick: 0 }
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Returns the new tick number.
    pub(crate) fn advance(&mut self) -> u64 {
        self.current_tick += 1;
        self.current_tick
    }
}

/// Countdown timer used for time slicing. Inactive until a quantum is set.
#[derive(Debug, Default)]
pub struct Timer {
    quantum: Option<u32>,
    ticks: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            quantum: None,
            ticks: 0,
        }
    }

    pub fn quantum(&self) -> Option<u32> {
        self.quantum
    }

    pub fn set_quantum(&mut self, quantum: u32) {
        self.quantum = Some(quantum);
        self.ticks = 0;
    }

    pub fn is_active(&self) -> bool {
        self.quantum.is_some()
    }

    /// Gives the current occupant of the CPU a fresh quantum.
    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    pub fn elapsed(&self) -> u32 {
        self.ticks
    }

    pub(crate) fn count(&mut self) {
        self.ticks += 1;
    }

    pub(crate) fn expired(&self) -> bool {
        self.quantum.is_some_and(|quantum| self.ticks >= quantum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances_by_one() {
        let mut clock = Clock::new();

        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.current_tick(), 2);
    }

    #[test]
    fn timer_without_quantum_never_expires() {
        let mut timer = Timer::new();
        for _ in 0..100 {
            timer.count();
        }

        assert!(!timer.expired());
        assert!(!timer.is_active());
    }

    #[test]
    fn timer_expires_after_quantum_and_reset_rearms_it() {
        let mut timer = Timer::new();
        timer.set_quantum(3);

        timer.count();
        timer.count();
        assert!(!timer.expired());
        timer.count();
        assert!(timer.expired());

        timer.reset();
        assert!(!timer.expired());
        assert_eq!(timer.elapsed(), 0);
    }
}
