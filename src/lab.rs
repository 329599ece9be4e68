//! Deterministic scripted fiber host for exercising the queue.
//!
//! Production deployments drive [`crate::WaitQueue`] with a real coroutine
//! primitive. Tests need a host they can steer, so this module provides a
//! synchronous stand-in: every [`LabFiber`] carries scripts that run when
//! control is transferred or an error is raised into it, and a per-thread
//! log records every handoff in order.
//!
//! The stand-in is honest about one limitation: scripts run to completion on
//! the caller's stack, so a fiber cannot be re-entered while its own script
//! is running. Real suspension is modeled by nesting queue calls inside
//! scripts instead.

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

use crate::events::Events;
use crate::fiber::Fiber;

/// Error payload raised into lab fibers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interrupt(
    /// Reason the fiber was interrupted.
    pub &'static str,
);

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interrupt: {}", self.0)
    }
}

impl std::error::Error for Interrupt {}

/// One observed handoff between fibers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// Control was transferred into the named fiber with a readiness payload.
    Transfer {
        /// Name of the fiber that received control.
        to: &'static str,
        /// Payload handed over.
        value: Events,
    },
    /// An error was raised into the named fiber.
    Raise {
        /// Name of the fiber that received the error.
        to: &'static str,
        /// The injected error.
        error: Interrupt,
    },
}

type TransferScript = Box<dyn FnMut(Events) -> Result<Events, Interrupt>>;
type RaiseScript = Box<dyn FnMut(Interrupt) -> Result<Events, Interrupt>>;

struct Shared {
    name: &'static str,
    alive: Cell<bool>,
    on_transfer: RefCell<TransferScript>,
    on_raise: RefCell<RaiseScript>,
}

/// Scripted fiber handle.
///
/// Freshly built fibers echo transfers back (`Ok(value)`) and let raised
/// errors propagate (`Err(error)`); [`on_transfer`](LabFiber::on_transfer)
/// and [`on_raise`](LabFiber::on_raise) replace those behaviors. Cloning
/// yields another handle to the same fiber.
#[derive(Clone)]
pub struct LabFiber {
    shared: Rc<Shared>,
}

thread_local! {
    static RUNNING: RefCell<Vec<LabFiber>> = const { RefCell::new(Vec::new()) };
    static HANDOFFS: RefCell<Vec<Handoff>> = const { RefCell::new(Vec::new()) };
    static RECORDING: Cell<bool> = const { Cell::new(true) };
    static ROOT: LabFiber = LabFiber::new("root");
}

/// Drains the per-thread handoff log.
#[must_use]
pub fn take_handoffs() -> Vec<Handoff> {
    HANDOFFS.with(|log| core::mem::take(&mut *log.borrow_mut()))
}

/// Turns handoff recording on or off for the current thread.
///
/// Benchmarks disable recording so the log does not grow without bound.
pub fn set_recording(enabled: bool) {
    RECORDING.with(|flag| flag.set(enabled));
}

fn record(handoff: Handoff) {
    if RECORDING.with(|flag| flag.get()) {
        HANDOFFS.with(|log| log.borrow_mut().push(handoff));
    }
}

/// Pops the running-fiber stack when a script finishes, even on unwind.
struct EnterGuard;

impl Drop for EnterGuard {
    fn drop(&mut self) {
        RUNNING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

impl LabFiber {
    /// Creates a live fiber with the default scripts.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            shared: Rc::new(Shared {
                name,
                alive: Cell::new(true),
                on_transfer: RefCell::new(Box::new(|value| Ok(value))),
                on_raise: RefCell::new(Box::new(|error| Err(error))),
            }),
        }
    }

    /// Replaces the script run when control is transferred in.
    #[must_use]
    pub fn on_transfer(
        self,
        script: impl FnMut(Events) -> Result<Events, Interrupt> + 'static,
    ) -> Self {
        *self.shared.on_transfer.borrow_mut() = Box::new(script);
        self
    }

    /// Replaces the script run when an error is raised in.
    #[must_use]
    pub fn on_raise(
        self,
        script: impl FnMut(Interrupt) -> Result<Events, Interrupt> + 'static,
    ) -> Self {
        *self.shared.on_raise.borrow_mut() = Box::new(script);
        self
    }

    /// Marks the fiber terminated.
    pub fn kill(&self) {
        self.shared.alive.set(false);
    }

    /// The fiber's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.shared.name
    }

    fn enter(&self) -> EnterGuard {
        RUNNING.with(|stack| stack.borrow_mut().push(self.clone()));
        EnterGuard
    }
}

impl fmt::Debug for LabFiber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabFiber")
            .field("name", &self.shared.name)
            .field("alive", &self.shared.alive.get())
            .finish()
    }
}

impl Fiber for LabFiber {
    type Value = Events;
    type Error = Interrupt;

    fn current() -> Self {
        RUNNING
            .with(|stack| stack.borrow().last().cloned())
            .unwrap_or_else(|| ROOT.with(Self::clone))
    }

    fn transfer(&self, value: Events) -> Result<Events, Interrupt> {
        record(Handoff::Transfer {
            to: self.shared.name,
            value,
        });
        let _enter = self.enter();
        let mut script = self.shared.on_transfer.borrow_mut();
        (*script)(value)
    }

    fn raise(&self, error: Interrupt) -> Result<Events, Interrupt> {
        record(Handoff::Raise {
            to: self.shared.name,
            error: error.clone(),
        });
        let _enter = self.enter();
        let mut script = self.shared.on_raise.borrow_mut();
        (*script)(error)
    }

    fn is_alive(&self) -> bool {
        self.shared.alive.get()
    }
}
