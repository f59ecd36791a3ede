/// Cells in a freshly set-up machine.
pub const DEFAULT_MEMORY_SIZE: usize = 40;
/// Ticks the I/O device needs to serve one request.
pub const DEFAULT_IO_TIME: u64 = 3;

pub const OPCODE_EMPTY: u8 = 0b00;
pub const OPCODE_CPU: u8 = 0b01;
pub const OPCODE_IO: u8 = 0b10;
pub const OPCODE_EXIT: u8 = 0b11;
