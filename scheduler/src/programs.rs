use tickos_hardware::{asm, Program};

/// The workload the emulator boots with: five small programs mixing CPU
/// bursts and I/O, each with a priority.
pub fn demo() -> Vec<(Program, u8)> {
    vec![
        (Program::new("prg5.exe", [asm::cpu(3), asm::io(), asm::cpu(1)].concat()), 2),
        (Program::new("prg4.exe", [asm::cpu(3), asm::io(), asm::cpu(1)].concat()), 3),
        (Program::new("prg3.exe", [asm::cpu(4), asm::io(), asm::cpu(1)].concat()), 1),
        (Program::new("prg1.exe", [asm::cpu(2), asm::io()].concat()), 4),
        (Program::new("prg2.exe", asm::cpu(2)), 5),
    ]
}
