//! Interrupt handlers. These are the only code paths that change a PCB's
//! state. Every path that takes a process off the CPU goes through
//! `Dispatcher::save`, and every path that puts one on goes through
//! `install_as_running`.

use log::{debug, info};
use tickos_hardware::{Hardware, Instruction, InterruptType, Irq, IrqPayload, Program};

use super::{InterruptHandler, Kernel, KernelError, Pcb, Pid, ProcessState, DEFAULT_PRIORITY};
use crate::scheduler::Scheduler;

impl<S: Scheduler> Kernel<S> {
    pub(super) fn execute(
        &mut self,
        handler: InterruptHandler,
        hardware: &mut Hardware,
        irq: Irq,
    ) -> Result<(), KernelError> {
        let kind = irq.kind();
        match handler {
            InterruptHandler::New => match irq.into_payload() {
                IrqPayload::New { program, priority } => self.handle_new(hardware, program, priority),
                _ => Err(KernelError::UnexpectedPayload(kind)),
            },
            InterruptHandler::Kill => self.handle_kill(hardware),
            InterruptHandler::IoIn => match irq.into_payload() {
                IrqPayload::Io(instruction) => self.handle_io_in(hardware, instruction),
                _ => Err(KernelError::UnexpectedPayload(kind)),
            },
            InterruptHandler::IoOut => self.handle_io_out(hardware),
            InterruptHandler::Timeout => self.handle_timeout(hardware),
            InterruptHandler::Stat => self.handle_stat(hardware),
        }
    }

    fn handle_new(
        &mut self,
        hardware: &mut Hardware,
        program: Program,
        priority: Option<u8>,
    ) -> Result<(), KernelError> {
        let pid = self.table.new_pid();
        let base_address = self.loader.load(&program, &mut hardware.memory)?;

        let mut pcb = Pcb::new(pid, program.name(), priority.unwrap_or(DEFAULT_PRIORITY));
        pcb.set_base_address(base_address);
        self.table.add(pcb);
        self.table.set_state(pid, ProcessState::Ready)?;

        self.run_or_queue(pid, hardware)?;
        info!("{}", self.table);
        Ok(())
    }

    fn handle_kill(&mut self, hardware: &mut Hardware) -> Result<(), KernelError> {
        let pid = self.running_pid(InterruptType::Kill)?;
        self.dispatcher.save(self.table.get_mut(pid)?, hardware);
        self.table.set_state(pid, ProcessState::Terminated)?;
        self.table.set_running(None);
        info!("program {} finished", self.table.get(pid)?.name());

        self.dispatch_next(hardware)?;
        info!("{}", self.table);
        Ok(())
    }

    fn handle_io_in(
        &mut self,
        hardware: &mut Hardware,
        instruction: Instruction,
    ) -> Result<(), KernelError> {
        let pid = self.running_pid(InterruptType::IoIn)?;
        self.dispatcher.save(self.table.get_mut(pid)?, hardware);
        self.table.set_state(pid, ProcessState::Waiting)?;
        self.table.set_running(None);

        self.io_controller
            .request(pid, instruction, &mut hardware.io_device);
        debug!("{}", self.io_controller);

        self.dispatch_next(hardware)?;
        info!("{}", self.table);
        Ok(())
    }

    fn handle_io_out(&mut self, hardware: &mut Hardware) -> Result<(), KernelError> {
        let pid = self
            .io_controller
            .collect_completed(&mut hardware.io_device)
            .ok_or(KernelError::NoCompletedIo)?;
        self.table.set_state(pid, ProcessState::Ready)?;

        self.run_or_queue(pid, hardware)?;
        info!("{}", self.table);
        Ok(())
    }

    fn handle_timeout(&mut self, hardware: &mut Hardware) -> Result<(), KernelError> {
        if !self.scheduler.has_work() {
            debug!("quantum expired with nothing else ready");
            return Ok(());
        }
        let Some(next) = self.scheduler.next() else {
            return Ok(());
        };

        match self.table.running() {
            Some(running) => self.expropriate(running, next, hardware)?,
            None => self.install_as_running(next, hardware)?,
        }
        info!("{}", self.table);
        Ok(())
    }

    fn handle_stat(&mut self, hardware: &mut Hardware) -> Result<(), KernelError> {
        self.scheduler.on_clock_tick(hardware.clock.current_tick());
        Ok(())
    }

    fn running_pid(&self, kind: InterruptType) -> Result<Pid, KernelError> {
        self.table.running().ok_or(KernelError::CpuIdle(kind))
    }

    /// Gives a freshly ready process the CPU if it is idle or if the policy
    /// says so, and queues it otherwise.
    fn run_or_queue(&mut self, pid: Pid, hardware: &mut Hardware) -> Result<(), KernelError> {
        let Some(running) = self.table.running() else {
            return self.install_as_running(pid, hardware);
        };

        let preempt = self
            .scheduler
            .must_preempt(self.table.get(running)?, self.table.get(pid)?);
        if preempt {
            self.expropriate(running, pid, hardware)
        } else {
            self.admit(pid, hardware)
        }
    }

    /// Takes the CPU from `running`, queues it again and installs `incoming`.
    /// `running` is left untouched unless `incoming` can take the CPU.
    fn expropriate(
        &mut self,
        running: Pid,
        incoming: Pid,
        hardware: &mut Hardware,
    ) -> Result<(), KernelError> {
        let from = self.table.get(incoming)?.state();
        if !from.can_become(ProcessState::Running) {
            return Err(KernelError::InvalidTransition {
                pid: incoming,
                from,
                to: ProcessState::Running,
            });
        }

        debug!("pid {incoming} expropriates pid {running}");
        self.dispatcher.save(self.table.get_mut(running)?, hardware);
        self.table.set_state(running, ProcessState::Ready)?;
        self.admit(running, hardware)?;
        self.install_as_running(incoming, hardware)
    }

    /// Only valid while the CPU is idle.
    fn install_as_running(&mut self, pid: Pid, hardware: &mut Hardware) -> Result<(), KernelError> {
        self.table.set_state(pid, ProcessState::Running)?;
        self.table.set_running(Some(pid));
        self.dispatcher.load(self.table.get(pid)?, hardware);
        Ok(())
    }

    fn admit(&mut self, pid: Pid, hardware: &Hardware) -> Result<(), KernelError> {
        let tick = hardware.clock.current_tick();
        self.scheduler.admit(self.table.get_mut(pid)?, tick);
        Ok(())
    }

    /// Keeps the CPU busy while ready work exists.
    fn dispatch_next(&mut self, hardware: &mut Hardware) -> Result<(), KernelError> {
        if !self.scheduler.has_work() {
            return Ok(());
        }
        match self.scheduler.next() {
            Some(pid) => self.install_as_running(pid, hardware),
            None => Ok(()),
        }
    }
}
