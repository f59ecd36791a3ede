use std::{
    collections::VecDeque,
    io::Write,
    sync::atomic::{AtomicBool, Ordering},
};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

/// Lines kept for the display's log pane.
const LOG_CAPACITY: usize = 128;

pub static LOGGER: KernelLogger = KernelLogger::new();

/// Keeps the most recent log lines in memory so the terminal display can
/// show them, and optionally echoes everything to stderr.
pub struct KernelLogger {
    lines: Mutex<VecDeque<String>>,
    echo: AtomicBool,
}

impl KernelLogger {
    const fn new() -> Self {
        Self {
            lines: Mutex::new(VecDeque::new()),
            echo: AtomicBool::new(false),
        }
    }

    /// The last `count` lines, oldest first.
    pub fn recent(&self, count: usize) -> Vec<String> {
        let lines = self.lines.lock();
        lines
            .iter()
            .skip(lines.len().saturating_sub(count))
            .cloned()
            .collect()
    }

    fn push(&self, line: String) {
        let mut lines = self.lines.lock();
        if lines.len() == LOG_CAPACITY {
            lines.pop_front();
        }
        lines.push_back(line);
    }
}

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("[{:>5}] {}", record.level(), record.args());
        if self.echo.load(Ordering::Relaxed) {
            let _ = writeln!(std::io::stderr(), "{line}");
        }
        self.push(line);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Installs [`LOGGER`] as the global logger.
pub fn init(level: LevelFilter, echo: bool) -> Result<(), SetLoggerError> {
    LOGGER.echo.store(echo, Ordering::Relaxed);
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_most_recent_lines() {
        let logger = KernelLogger::new();
        for index in 0..LOG_CAPACITY + 5 {
            logger.push(index.to_string());
        }

        let recent = logger.recent(2);
        assert_eq!(
            recent,
            vec![
                (LOG_CAPACITY + 3).to_string(),
                (LOG_CAPACITY + 4).to_string()
            ]
        );
        assert_eq!(logger.recent(usize::MAX).len(), LOG_CAPACITY);
    }
}
