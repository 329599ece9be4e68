//! Intrusive wait queue with symmetric control handoff.
//!
//! The queue is the run queue of a cooperative event loop: fibers park here
//! until the loop, or a peer fiber, hands control back to them. Two waiter
//! kinds share one FIFO:
//!
//! - **Blocking** waiters are pushed by [`WaitQueue::wait_and_transfer`] and
//!   [`WaitQueue::wait_and_raise`] on the suspending fiber's own frame. The
//!   dispatcher wakes them but never unlinks them; an RAII guard tears the
//!   entry down when the suspend call returns, on every path out.
//! - **Detached** waiters are pushed by [`WaitQueue::push`]. The queue owns
//!   the fiber handle; the dispatcher unlinks and consumes it at wake time,
//!   checking liveness only after the entry is gone.
//!
//! # Invariants
//!
//! - If `front.is_none()`, then `back.is_none()` and the arena is empty
//! - Following `behind` links from `front` visits every linked waiter
//!   exactly once and ends at `back`
//! - Every arena occupant is linked; unlink removes from both
//! - No queue borrow is held across a control transfer

use core::cell::RefCell;
use core::fmt;

use crate::fiber::Fiber;
use crate::tracing_compat::{debug, trace};
use crate::util::{Arena, ArenaIndex};

/// Identifier of a linked waiter, valid until that waiter is unlinked.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct WaiterId(ArenaIndex);

impl WaiterId {
    const fn arena_index(self) -> ArenaIndex {
        self.0
    }
}

impl fmt::Debug for WaiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WaiterId({}:{})", self.0.slot(), self.0.generation())
    }
}

impl fmt::Display for WaiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0.slot())
    }
}

/// How a waiter entered the queue, and who tears it down.
enum WaiterKind<F> {
    /// Pushed by a suspend call; the suspending fiber's guard unlinks it.
    Blocking(F),
    /// Pushed by [`WaitQueue::push`]; the dispatcher unlinks and drops it.
    Detached(F),
}

struct Waiter<F> {
    /// Neighbor toward the front; `None` for the front waiter.
    ahead: Option<WaiterId>,
    /// Neighbor toward the back; `None` for the back waiter.
    behind: Option<WaiterId>,
    kind: WaiterKind<F>,
}

struct Inner<F> {
    waiters: Arena<Waiter<F>>,
    front: Option<WaiterId>,
    back: Option<WaiterId>,
}

impl<F> Inner<F> {
    const fn new() -> Self {
        Self {
            waiters: Arena::new(),
            front: None,
            back: None,
        }
    }

    fn waiter_mut(&mut self, id: WaiterId) -> &mut Waiter<F> {
        match self.waiters.get_mut(id.arena_index()) {
            Some(waiter) => waiter,
            None => unreachable!("queue link {id:?} does not resolve"),
        }
    }

    /// Links a new waiter at the back.
    fn link_back(&mut self, kind: WaiterKind<F>) -> WaiterId {
        let previous_back = self.back;
        let id = WaiterId(self.waiters.insert(Waiter {
            ahead: previous_back,
            behind: None,
            kind,
        }));
        match previous_back {
            None => self.front = Some(id),
            Some(back_id) => self.waiter_mut(back_id).behind = Some(id),
        }
        self.back = Some(id);
        id
    }

    /// Splices a waiter out of the chain and releases its slot.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not linked. A waiter is unlinked exactly once, by
    /// exactly one owner; a second unlink means the entry lifecycle is
    /// corrupted and the queue state can no longer be trusted.
    fn unlink(&mut self, id: WaiterId) -> Waiter<F> {
        let Some(waiter) = self.waiters.remove(id.arena_index()) else {
            panic!("waiter {id:?} is not linked; double unlink or stale handle");
        };
        match waiter.ahead {
            None => self.front = waiter.behind,
            Some(ahead_id) => self.waiter_mut(ahead_id).behind = waiter.behind,
        }
        match waiter.behind {
            None => self.back = waiter.ahead,
            Some(behind_id) => self.waiter_mut(behind_id).ahead = waiter.ahead,
        }
        waiter
    }
}

/// FIFO of fibers waiting to be handed control.
///
/// The queue is single-threaded and re-entrant: waiters woken during a
/// [`flush`](WaitQueue::flush) may push new waiters or suspend on the queue
/// again before control returns to the dispatcher.
pub struct WaitQueue<F> {
    inner: RefCell<Inner<F>>,
}

impl<F> WaitQueue<F> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: RefCell::new(Inner::new()),
        }
    }

    /// Number of linked waiters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().waiters.len()
    }

    /// Whether no waiter is linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().waiters.is_empty()
    }
}

impl<F> Default for WaitQueue<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for WaitQueue<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(inner) = self.inner.try_borrow() else {
            return f.write_str("WaitQueue { <borrowed> }");
        };
        f.debug_struct("WaitQueue")
            .field("len", &inner.waiters.len())
            .field("front", &inner.front)
            .field("back", &inner.back)
            .finish()
    }
}

impl<F: Fiber> WaitQueue<F> {
    /// Appends a detached waiter for `fiber`.
    ///
    /// The queue owns the handle from here: the next flush that reaches the
    /// entry unlinks it, drops it, and transfers control to the fiber if it
    /// is still alive.
    pub fn push(&self, fiber: F) {
        let _id = self
            .inner
            .borrow_mut()
            .link_back(WaiterKind::Detached(fiber));
        trace!(waiter = %_id, "queued detached waiter");
    }

    /// Parks the calling fiber at the back of the queue and transfers
    /// control to `target`, passing `value`.
    ///
    /// Returns what [`Fiber::transfer`] returns once control comes back.
    /// The waiter entry is unlinked before this call returns or propagates,
    /// whether the resume was a normal transfer, a raised error, or an
    /// unwind.
    pub fn wait_and_transfer(&self, target: &F, value: F::Value) -> Result<F::Value, F::Error> {
        let id = self
            .inner
            .borrow_mut()
            .link_back(WaiterKind::Blocking(F::current()));
        trace!(waiter = %id, "suspending on transfer");
        let _unlink = UnlinkGuard { queue: self, id };
        target.transfer(value)
    }

    /// Parks the calling fiber and resumes `target` by raising `error` into
    /// it.
    ///
    /// Cleanup behaves exactly as in
    /// [`wait_and_transfer`](WaitQueue::wait_and_transfer).
    pub fn wait_and_raise(&self, target: &F, error: F::Error) -> Result<F::Value, F::Error> {
        let id = self
            .inner
            .borrow_mut()
            .link_back(WaiterKind::Blocking(F::current()));
        trace!(waiter = %id, "suspending on raise");
        let _unlink = UnlinkGuard { queue: self, id };
        target.raise(error)
    }

    /// Wakes, in FIFO order, the waiters that were linked when the call
    /// started, and returns how many were dispatched.
    ///
    /// The back waiter is snapshotted as the drain boundary before any wake
    /// runs; waiters pushed by woken fibers land behind it and wait for the
    /// next flush. An error raised back into the calling fiber during a wake
    /// propagates immediately: waiters already dispatched stay dispatched,
    /// the rest stay linked for a later flush.
    pub fn flush(&self) -> Result<usize, F::Error> {
        let boundary = self.inner.borrow().back;
        let mut count = 0_usize;
        loop {
            let Some(ready) = self.inner.borrow().front else {
                break;
            };
            count += 1;
            self.dispatch(ready)?;
            if Some(ready) == boundary {
                break;
            }
        }
        debug!(count, "flushed wait queue");
        Ok(count)
    }

    /// Wakes the waiter at `id` according to its kind.
    fn dispatch(&self, id: WaiterId) -> Result<(), F::Error> {
        // Clone the handle out of a blocking waiter under a short borrow;
        // the entry stays linked until its own suspend frame resumes.
        let blocking = {
            let mut inner = self.inner.borrow_mut();
            match inner.waiter_mut(id).kind {
                WaiterKind::Blocking(ref fiber) => Some(fiber.clone()),
                WaiterKind::Detached(_) => None,
            }
        };

        if let Some(fiber) = blocking {
            trace!(waiter = %id, "waking blocking waiter");
            fiber.transfer(F::Value::default())?;
            return Ok(());
        }

        // Detached: the unlink is the handle's release. Liveness is checked
        // only after the entry is gone, so a dead fiber still consumes it.
        let fiber = match self.inner.borrow_mut().unlink(id).kind {
            WaiterKind::Detached(fiber) => fiber,
            WaiterKind::Blocking(_) => unreachable!("waiter kind changed while linked"),
        };
        if fiber.is_alive() {
            trace!(waiter = %id, "waking detached waiter");
            fiber.transfer(F::Value::default())?;
        } else {
            trace!(waiter = %id, "discarding waiter for dead fiber");
        }
        Ok(())
    }
}

/// Unlinks a blocking waiter when its suspend frame exits.
struct UnlinkGuard<'a, F> {
    queue: &'a WaitQueue<F>,
    id: WaiterId,
}

impl<F> Drop for UnlinkGuard<'_, F> {
    fn drop(&mut self) {
        // Bind the waiter so the fiber handle drops after the borrow ends.
        let _waiter = self.queue.inner.borrow_mut().unlink(self.id);
        trace!(waiter = %self.id, "resumed; waiter unlinked");
    }
}
