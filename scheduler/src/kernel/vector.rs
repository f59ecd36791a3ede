use std::collections::HashMap;

use tickos_hardware::InterruptType;

/// The handler set. Each variant handles exactly one interrupt type; see
/// `handlers.rs` for what each one does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptHandler {
    New,
    Kill,
    IoIn,
    IoOut,
    Timeout,
    Stat,
}

impl InterruptHandler {
    pub fn for_type(kind: InterruptType) -> Self {
        match kind {
            InterruptType::New => InterruptHandler::New,
            InterruptType::Kill => InterruptHandler::Kill,
            InterruptType::IoIn => InterruptHandler::IoIn,
            InterruptType::IoOut => InterruptHandler::IoOut,
            InterruptType::Timeout => InterruptHandler::Timeout,
            InterruptType::Stat => InterruptHandler::Stat,
        }
    }
}

/// Maps interrupt types to the handler that runs for them.
#[derive(Debug, Default)]
pub struct InterruptVector {
    handlers: HashMap<InterruptType, InterruptHandler>,
}

impl InterruptVector {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Every interrupt type wired to its own handler.
    pub fn with_default_handlers() -> Self {
        let mut vector = InterruptVector::empty();
        for kind in InterruptType::ALL {
            vector.register(kind, InterruptHandler::for_type(kind));
        }
        vector
    }

    /// Returns the handler previously registered for `kind`, if any.
    pub fn register(&mut self, kind: InterruptType, handler: InterruptHandler) -> Option<InterruptHandler> {
        self.handlers.insert(kind, handler)
    }

    #[cfg(test)]
    pub fn unregister(&mut self, kind: InterruptType) -> Option<InterruptHandler> {
        self.handlers.remove(&kind)
    }

    pub fn handler_for(&self, kind: InterruptType) -> Option<InterruptHandler> {
        self.handlers.get(&kind).copied()
    }
}
