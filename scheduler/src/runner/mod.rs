mod display;
mod gantt;
mod simulation;

use std::{io, time::Duration};

use crate::scheduler::Scheduler;
use display::{DisplayTerminal, RunnerEvent};

pub use gantt::Gantt;
pub use simulation::Simulation;

/// Drives a [`Simulation`] in the terminal, one hardware tick per display
/// tick.
pub struct ProcessRunner<S> {
    terminal: DisplayTerminal,
    simulation: Simulation<S>,
    paused: bool,
}

impl<S: Scheduler> ProcessRunner<S> {
    pub fn new(simulation: Simulation<S>, tick_rate: Duration) -> Result<Self, io::Error> {
        let terminal = DisplayTerminal::new(tick_rate)?;

        Ok(Self {
            terminal,
            simulation,
            paused: false,
        })
    }

    fn step(&mut self) {
        if !self.simulation.finished() {
            self.simulation.step();
        }
    }

    // Returns false if the program should quit
    pub fn run(&mut self) -> Result<bool, io::Error> {
        match self.terminal.get_input() {
            RunnerEvent::Quit => return Ok(false),
            RunnerEvent::Tick if !self.paused => self.step(),
            RunnerEvent::Pause => self.paused = true,
            RunnerEvent::Resume => self.paused = false,
            RunnerEvent::Step if self.paused => self.step(),
            _ => {}
        }
        self.terminal.draw(&self.simulation, self.paused)?;
        Ok(true)
    }

    /// Restores the terminal and hands back the simulation.
    pub fn into_simulation(self) -> Simulation<S> {
        self.simulation
    }
}
