use std::fmt::Write;

use crate::kernel::{Pid, ProcessState, ProcessTable};

/// Per-tick snapshot of every process state, for a Gantt-style chart.
#[derive(Debug, Default)]
pub struct Gantt {
    columns: Vec<Column>,
}

#[derive(Debug)]
struct Column {
    tick: u64,
    states: Vec<(Pid, ProcessState)>,
}

impl Gantt {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn record(&mut self, tick: u64, table: &ProcessTable) {
        self.columns.push(Column {
            tick,
            states: table.iter().map(|pcb| (pcb.pid(), pcb.state())).collect(),
        });
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Pid that was running after each recorded tick.
    pub fn running_per_tick(&self) -> Vec<Option<Pid>> {
        self.columns
            .iter()
            .map(|column| {
                column
                    .states
                    .iter()
                    .find(|(_, state)| *state == ProcessState::Running)
                    .map(|(pid, _)| *pid)
            })
            .collect()
    }

    /// One row of state symbols per pid, in pid order. Ticks before a
    /// process existed are blank.
    pub fn rows(&self) -> Vec<(Pid, String)> {
        let mut pids: Vec<Pid> = self
            .columns
            .iter()
            .flat_map(|column| column.states.iter().map(|(pid, _)| *pid))
            .collect();
        pids.sort_unstable();
        pids.dedup();

        pids.into_iter()
            .map(|pid| {
                let row = self
                    .columns
                    .iter()
                    .map(|column| {
                        column
                            .states
                            .iter()
                            .find(|(candidate, _)| *candidate == pid)
                            .map_or(' ', |(_, state)| symbol(*state))
                    })
                    .collect();
                (pid, row)
            })
            .collect()
    }

    /// Text chart, the last `width` ticks at most.
    pub fn render(&self, width: usize) -> String {
        let skip = self.columns.len().saturating_sub(width);
        let mut chart = String::from("PID |");
        for column in self.columns.iter().skip(skip) {
            let _ = write!(chart, "{:>4}", column.tick);
        }
        chart.push('\n');

        for (pid, row) in self.rows() {
            let _ = write!(chart, "{pid:>3} |");
            for cell in row.chars().skip(skip) {
                let _ = write!(chart, "{cell:>4}");
            }
            chart.push('\n');
        }
        chart
    }
}

pub fn symbol(state: ProcessState) -> char {
    match state {
        ProcessState::New => 'N',
        ProcessState::Ready => '.',
        ProcessState::Running => 'R',
        ProcessState::Waiting => 'W',
        ProcessState::Terminated => 'T',
    }
}
