//! Handover: cooperative run queue and control handoff for fiber schedulers.
//!
//! # Overview
//!
//! An event loop built on symmetric coroutines needs one structure at its
//! core: the queue of fibers waiting for control. Handover provides that
//! queue and nothing around it. Fibers park themselves with a suspend call
//! that cleans up on every resume path; wake requests from outside the
//! fiber's own stack ride as detached entries the dispatcher owns; a flush
//! drains exactly the waiters present when it started, so a loop iteration
//! always terminates.
//!
//! The fiber primitive itself stays behind the [`Fiber`] trait. Any host
//! that can transfer control, raise an error into a suspension point, and
//! report liveness can drive the queue; the [`lab`] module ships a scripted
//! host for tests.
//!
//! # Core Guarantees
//!
//! - **FIFO wakeups**: waiters are dispatched strictly in arrival order
//! - **Bounded drains**: a flush wakes only waiters present when it started
//! - **No leaked waiters**: suspension cleans up on normal return, raised
//!   error, and unwind alike
//! - **Stale ids miss**: waiter ids are generation-checked; a recycled slot
//!   never masquerades as an old waiter
//! - **Single-threaded by construction**: interior mutability without locks,
//!   re-entrant under cooperative transfer
//!
//! # Module Structure
//!
//! - [`queue`]: the wait queue, waiter lifecycle, suspend and flush
//! - [`fiber`]: the host boundary trait
//! - [`events`]: readiness sets exchanged through wakeups
//! - [`fd`]: descriptor non-blocking helpers
//! - [`time`]: monotonic timestamps with borrowing subtraction
//! - [`lab`]: deterministic scripted fiber host for tests
//! - [`tracing_compat`]: optional structured logging shim
//! - [`util`]: generation-checked arena backing the queue
//!
//! # Example
//!
//! ```
//! use handover::lab::LabFiber;
//! use handover::WaitQueue;
//!
//! let queue: WaitQueue<LabFiber> = WaitQueue::new();
//! queue.push(LabFiber::new("worker"));
//! let woken = queue.flush()?;
//! assert_eq!(woken, 1);
//! assert!(queue.is_empty());
//! # Ok::<(), handover::lab::Interrupt>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod events;
pub mod fd;
pub mod fiber;
pub mod lab;
pub mod queue;
pub mod time;
pub mod tracing_compat;
pub mod util;

pub use events::Events;
pub use fiber::Fiber;
pub use queue::WaitQueue;
pub use time::Timespec;
