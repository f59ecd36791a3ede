mod config;
mod kernel;
mod logger;
mod programs;
mod runner;
mod scheduler;

use config::Config;
use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use log::info;
use runner::{ProcessRunner, Simulation};
use scheduler::Policy;
use std::{error::Error, io};
use tickos_hardware::Hardware;

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env_and_args()?;
    logger::init(config.log_level, config.headless)?;
    info!("starting emulator with {config:?}");

    let hardware = Hardware::with_sizes(config.memory_size, config.io_time);
    let mut simulation = Simulation::new(Policy::new(config.policy, config.quantum), hardware);
    for (program, priority) in programs::demo() {
        simulation.submit(program, Some(priority));
    }

    if config.headless {
        simulation.run_until_finished(config.max_ticks);
        print!("{}", simulation.gantt().render(usize::MAX));
        print!("{}", simulation.summary());
        return Ok(());
    }

    execute!(io::stdout(), Clear(ClearType::All))?;

    let mut runner = ProcessRunner::new(simulation, config.tick_rate)?;
    while runner.run()? {}
    let simulation = runner.into_simulation();

    execute!(io::stdout(), Clear(ClearType::All))?;
    print!("{}", simulation.gantt().render(usize::MAX));
    print!("{}", simulation.summary());
    Ok(())
}
