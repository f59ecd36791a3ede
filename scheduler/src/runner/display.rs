use super::{gantt, Simulation};
use crate::{kernel::ProcessState, logger::LOGGER, scheduler::Scheduler};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

pub enum RunnerEvent {
    Quit,
    Pause,
    Resume,
    Step,
    Tick,
    None,
}

/// Ticks of history shown in the Gantt pane.
const GANTT_WIDTH: usize = 24;
const LOG_LINES: usize = 8;

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    pub fn new(tick_rate: Duration) -> Result<Self, io::Error> {
        crossterm::terminal::enable_raw_mode()?;

        // Input thread: forwards key presses and paces the simulation
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                if let Ok(true) = event::poll(timeout) {
                    if let Ok(Event::Key(key)) = event::read() {
                        if input_tx.send(DisplayEvent::Input(key)).is_err() {
                            return;
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, input_rx })
    }

    pub fn draw<S>(&mut self, simulation: &Simulation<S>, paused: bool) -> Result<(), io::Error>
    where
        S: Scheduler,
    {
        let kernel = simulation.kernel();
        let table = kernel.table();
        let tick = simulation.hardware().clock.current_tick();

        let status = match table.running_pcb() {
            Some(pcb) => format!(
                "tick {tick} | PID {} | {} | pc {}",
                pcb.pid(),
                pcb.name(),
                pcb.program_counter()
            ),
            None if simulation.finished() => {
                format!("tick {tick} | all processes terminated, press q to quit")
            }
            None => format!("tick {tick} | CPU idle"),
        };
        let status = if paused {
            format!("{status} | paused")
        } else {
            status
        };

        let rows: Vec<Row> = table
            .iter()
            .map(|pcb| {
                Row::new(vec![
                    Cell::from(pcb.pid().to_string())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(pcb.name().to_owned()),
                    Cell::from(pcb.state().to_string()),
                    Cell::from(pcb.priority().to_string()),
                    Cell::from(pcb.base_address().to_string()),
                    Cell::from(pcb.program_counter().to_string()),
                ])
            })
            .collect();
        let queued = kernel
            .scheduler()
            .queued()
            .iter()
            .map(|pid| pid.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let chart = simulation.gantt().render(GANTT_WIDTH);
        let io_status = kernel.io_controller().to_string();
        let log_lines = LOGGER.recent(LOG_LINES).join("\n");
        let scheduler_name = kernel.scheduler().name();

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(4),
                    Constraint::Min(5),
                    Constraint::Length(8),
                    Constraint::Length(LOG_LINES as u16 + 2),
                ])
                .split(f.size());

            let current = Paragraph::new(format!("{status}\nready: [{queued}] | {io_status}"))
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .fg(Color::LightBlue),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Current Process")
                        .border_type(BorderType::Rounded),
                );
            f.render_widget(current, chunks[0]);

            let processes = Table::new(rows)
                .header(
                    Row::new(vec!["PID", "Name", "State", "Priority", "Base", "PC"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&[
                    Constraint::Length(4),
                    Constraint::Length(16),
                    Constraint::Length(11),
                    Constraint::Length(8),
                    Constraint::Length(5),
                    Constraint::Length(4),
                ])
                .block(Block::default().title(scheduler_name).borders(Borders::ALL))
                .style(Style::default().fg(Color::LightGreen))
                .column_spacing(1);
            f.render_widget(processes, chunks[1]);

            let legend = format!(
                "Gantt ({} R, {} ready, {} W, {} T)",
                gantt::symbol(ProcessState::Running),
                gantt::symbol(ProcessState::Ready),
                gantt::symbol(ProcessState::Waiting),
                gantt::symbol(ProcessState::Terminated),
            );
            let chart = Paragraph::new(chart)
                .block(Block::default().title(legend).borders(Borders::ALL));
            f.render_widget(chart, chunks[2]);

            let log = Paragraph::new(log_lines)
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().title("Kernel Log").borders(Borders::ALL));
            f.render_widget(log, chunks[3]);
        })?;
        Ok(())
    }

    pub fn get_input(&self) -> RunnerEvent {
        // Get the user's input and return a matching event
        match self.input_rx.recv() {
            Ok(DisplayEvent::Input(key)) => {
                if key.modifiers.is_empty() {
                    match key.code {
                        KeyCode::Char('q') => return RunnerEvent::Quit,
                        KeyCode::Char('p') => return RunnerEvent::Pause,
                        KeyCode::Char('r') => return RunnerEvent::Resume,
                        KeyCode::Char('s') => return RunnerEvent::Step,
                        _ => {}
                    };
                }
            }
            Ok(DisplayEvent::Tick) => return RunnerEvent::Tick,
            Err(_) => return RunnerEvent::Quit,
        }
        RunnerEvent::None
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}
