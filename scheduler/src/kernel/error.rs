use std::{error::Error, fmt};

use tickos_hardware::{HardwareError, InterruptType};

use super::{Pid, ProcessState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KernelError {
    PidNotFound(Pid),
    InvalidTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },
    /// Only terminated processes leave the table.
    StillActive {
        pid: Pid,
        state: ProcessState,
    },
    /// The interrupt needs a running process but the CPU is idle.
    CpuIdle(InterruptType),
    NoCompletedIo,
    UnexpectedPayload(InterruptType),
    Load(HardwareError),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::PidNotFound(pid) => write!(f, "no process with pid {pid}"),
            KernelError::InvalidTransition { pid, from, to } => {
                write!(f, "process {pid} cannot go from {from} to {to}")
            }
            KernelError::StillActive { pid, state } => {
                write!(f, "process {pid} is still {state} and cannot be removed")
            }
            KernelError::CpuIdle(kind) => write!(f, "{kind} raised while no process is running"),
            KernelError::NoCompletedIo => write!(f, "IO_OUT raised with no request in flight"),
            KernelError::UnexpectedPayload(kind) => write!(f, "{kind} carried the wrong payload"),
            KernelError::Load(err) => write!(f, "failed to load program: {err}"),
        }
    }
}

impl Error for KernelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            KernelError::Load(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HardwareError> for KernelError {
    fn from(err: HardwareError) -> Self {
        KernelError::Load(err)
    }
}
