use std::{error::Error, fmt};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HardwareError {
    OutOfBounds { address: usize, size: usize },
    InvalidWord { address: usize },
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareError::OutOfBounds { address, size } => write!(
                f,
                "memory address {address} is out of bounds (memory has {size} cells)"
            ),
            HardwareError::InvalidWord { address } => {
                write!(f, "no instruction stored at memory address {address}")
            }
        }
    }
}

impl Error for HardwareError {}
