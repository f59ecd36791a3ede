use std::{env, error::Error, fmt, str::FromStr, time::Duration};

use log::LevelFilter;
use tickos_hardware::memory::consts::{DEFAULT_IO_TIME, DEFAULT_MEMORY_SIZE};

use crate::scheduler::{PolicyKind, DEFAULT_QUANTUM};

const DEFAULT_TICK_RATE: Duration = Duration::from_millis(200);
const DEFAULT_MAX_TICKS: u64 = 500;

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    UnknownFlag(String),
    MissingValue(&'static str),
    InvalidValue { flag: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownFlag(flag) => write!(f, "unknown option '{flag}'"),
            ConfigError::MissingValue(flag) => write!(f, "option '{flag}' needs a value"),
            ConfigError::InvalidValue { flag, value } => {
                write!(f, "invalid value '{value}' for '{flag}'")
            }
        }
    }
}

impl Error for ConfigError {}

/// Run settings. Command-line options win over environment variables,
/// which win over the defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub policy: PolicyKind,
    pub quantum: u32,
    pub memory_size: usize,
    pub io_time: u64,
    pub tick_rate: Duration,
    pub max_ticks: u64,
    pub headless: bool,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: PolicyKind::RoundRobin,
            quantum: DEFAULT_QUANTUM,
            memory_size: DEFAULT_MEMORY_SIZE,
            io_time: DEFAULT_IO_TIME,
            tick_rate: DEFAULT_TICK_RATE,
            max_ticks: DEFAULT_MAX_TICKS,
            headless: false,
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn from_env_and_args() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env(|key| env::var(key).ok())?;
        config.apply_args(env::args().skip(1))?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var("TICKOS_POLICY") {
            self.policy = parse("TICKOS_POLICY", &value)?;
        }
        if let Some(value) = var("LOG") {
            self.log_level = parse("LOG", &value)?;
        }
        Ok(())
    }

    fn apply_args<I>(&mut self, args: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--headless" => self.headless = true,
                "--policy" => self.policy = parse("--policy", &value(&mut args, "--policy")?)?,
                "--quantum" => self.quantum = parse("--quantum", &value(&mut args, "--quantum")?)?,
                "--memory" => self.memory_size = parse("--memory", &value(&mut args, "--memory")?)?,
                "--io-time" => self.io_time = parse("--io-time", &value(&mut args, "--io-time")?)?,
                "--max-ticks" => {
                    self.max_ticks = parse("--max-ticks", &value(&mut args, "--max-ticks")?)?
                }
                "--tick-ms" => {
                    let millis = parse("--tick-ms", &value(&mut args, "--tick-ms")?)?;
                    self.tick_rate = Duration::from_millis(millis);
                }
                _ => return Err(ConfigError::UnknownFlag(flag)),
            }
        }
        Ok(())
    }
}

fn value<I>(args: &mut I, flag: &'static str) -> Result<String, ConfigError>
where
    I: Iterator<Item = String>,
{
    args.next().ok_or(ConfigError::MissingValue(flag))
}

fn parse<T: FromStr>(flag: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn defaults_match_the_reference_machine() {
        let config = Config::default();

        assert_eq!(config.memory_size, 40);
        assert_eq!(config.quantum, 3);
        assert_eq!(config.policy, PolicyKind::RoundRobin);
        assert!(!config.headless);
    }

    #[test]
    fn arguments_override_defaults() {
        let mut config = Config::default();
        config
            .apply_args(args(&[
                "--policy", "preemptive", "--quantum", "5", "--memory", "80", "--io-time", "2",
                "--tick-ms", "10", "--max-ticks", "99", "--headless",
            ]))
            .unwrap();

        assert_eq!(config.policy, PolicyKind::PreemptivePriority);
        assert_eq!(config.quantum, 5);
        assert_eq!(config.memory_size, 80);
        assert_eq!(config.io_time, 2);
        assert_eq!(config.tick_rate, Duration::from_millis(10));
        assert_eq!(config.max_ticks, 99);
        assert!(config.headless);
    }

    #[test]
    fn environment_sets_policy_and_log_level() {
        let mut config = Config::default();
        config
            .apply_env(|key| match key {
                "TICKOS_POLICY" => Some("fcfs".to_owned()),
                "LOG" => Some("debug".to_owned()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.policy, PolicyKind::Fcfs);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn bad_input_is_reported() {
        let mut config = Config::default();

        assert_eq!(
            config.apply_args(args(&["--quantum", "many"])),
            Err(ConfigError::InvalidValue {
                flag: "--quantum",
                value: "many".to_owned()
            })
        );
        assert_eq!(
            config.apply_args(args(&["--memory"])),
            Err(ConfigError::MissingValue("--memory"))
        );
        assert_eq!(
            config.apply_args(args(&["--turbo"])),
            Err(ConfigError::UnknownFlag("--turbo".to_owned()))
        );
    }
}
