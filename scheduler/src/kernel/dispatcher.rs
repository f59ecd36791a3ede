use log::debug;
use tickos_hardware::Hardware;

use super::Pcb;

/// Context switching. `save` and `load` are the only ways a process leaves or
/// takes the CPU.
#[derive(Debug, Default)]
pub struct Dispatcher;

impl Dispatcher {
    /// Stores the CPU's program counter in `pcb` and idles the CPU.
    pub fn save(&self, pcb: &mut Pcb, hardware: &mut Hardware) {
        if let Some(program_counter) = hardware.cpu.program_counter() {
            pcb.set_program_counter(program_counter);
        }
        hardware.cpu.set_idle();
        debug!("saved pid {} at pc {}", pcb.pid(), pcb.program_counter());
    }

    /// Installs `pcb` on the CPU with a fresh quantum.
    pub fn load(&self, pcb: &Pcb, hardware: &mut Hardware) {
        hardware
            .cpu
            .dispatch(pcb.base_address(), pcb.program_counter());
        hardware.timer.reset();
        debug!(
            "loaded pid {} at base {} pc {}",
            pcb.pid(),
            pcb.base_address(),
            pcb.program_counter()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::DEFAULT_PRIORITY;

    #[test]
    fn save_then_load_restores_the_context() {
        let mut hardware = Hardware::new();
        let dispatcher = Dispatcher;
        let mut pcb = Pcb::new(1, "prg", DEFAULT_PRIORITY);
        pcb.set_base_address(10);
        hardware.cpu.dispatch(10, 4);

        dispatcher.save(&mut pcb, &mut hardware);
        assert_eq!(pcb.program_counter(), 4);
        assert!(!hardware.cpu.is_busy());

        dispatcher.load(&pcb, &mut hardware);
        assert_eq!(hardware.cpu.program_counter(), Some(4));
        assert_eq!(hardware.cpu.base_address(), 10);
    }

    #[test]
    fn load_rearms_the_timer() {
        let mut hardware = Hardware::new();
        hardware.set_stats_enabled(false);
        hardware.timer.set_quantum(1);
        let pcb = Pcb::new(1, "prg", DEFAULT_PRIORITY);

        Dispatcher.load(&pcb, &mut hardware);

        assert_eq!(hardware.timer.elapsed(), 0);
    }
}
