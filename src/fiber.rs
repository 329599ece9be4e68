//! Host boundary for the task primitive.
//!
//! The queue schedules *fibers*: cooperatively scheduled tasks with
//! symmetric control transfer. It does not implement them. Whatever provides
//! them (a coroutine library, a green-thread runtime, the scripted test
//! double in [`crate::lab`]) exposes this trait, and the queue drives fibers
//! exclusively through it.

/// Handle to a cooperatively scheduled task.
///
/// Handles have reference semantics: cloning yields another handle to the
/// same fiber, and a handle stays valid after the fiber terminates (it just
/// reports `is_alive() == false` from then on).
///
/// [`transfer`](Fiber::transfer) and [`raise`](Fiber::raise) are symmetric:
/// neither returns until some other fiber hands control back to the caller.
/// Both are suspension points, and arbitrary queue operations may run before
/// they return, so callers must not hold any queue borrow across them.
pub trait Fiber: Clone {
    /// Payload carried by a transfer. The `Default` value is the empty
    /// payload used when a fiber is woken without arguments.
    type Value: Default;

    /// Error payload injected by [`raise`](Fiber::raise) and surfaced when
    /// an error is raised into a suspended fiber.
    type Error;

    /// Handle to the fiber that is currently running.
    fn current() -> Self;

    /// Transfers control to this fiber, passing `value`.
    ///
    /// Returns once control comes back to the calling fiber: `Ok` with the
    /// value handed back, or `Err` if an error was raised into the caller
    /// while it was suspended.
    fn transfer(&self, value: Self::Value) -> Result<Self::Value, Self::Error>;

    /// Resumes this fiber by raising `error` at its suspension point.
    ///
    /// Like [`transfer`](Fiber::transfer), returns once control comes back
    /// to the caller. `Ok` means the target handed back a value (it caught
    /// the error); `Err` means an error came back instead.
    fn raise(&self, error: Self::Error) -> Result<Self::Value, Self::Error>;

    /// Whether the fiber can still be resumed.
    fn is_alive(&self) -> bool;
}
