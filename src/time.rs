//! Monotonic timestamps with explicit second and nanosecond parts.
//!
//! The event loop measures elapsed time between two reads of the monotonic
//! clock. Timestamps keep the two-part clock representation instead of a
//! flat nanosecond count, so subtraction borrows across the second boundary
//! the way the clock itself carries.

#![allow(unsafe_code)]

use core::fmt;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// A point on the monotonic clock, or a span between two of them.
///
/// The nanosecond part is always in `0..1_000_000_000`; the second part may
/// be negative for a span measured backwards.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timespec {
    secs: i64,
    nanos: u32,
}

impl Timespec {
    /// The zero timestamp.
    pub const ZERO: Timespec = Timespec { secs: 0, nanos: 0 };

    /// Builds a timestamp from parts. `nanos` must be below one second.
    #[must_use]
    pub const fn new(secs: i64, nanos: u32) -> Self {
        debug_assert!(nanos < NANOS_PER_SEC);
        Self { secs, nanos }
    }

    /// Whole seconds.
    #[must_use]
    pub const fn secs(self) -> i64 {
        self.secs
    }

    /// Nanoseconds within the current second.
    #[must_use]
    pub const fn subsec_nanos(self) -> u32 {
        self.nanos
    }

    /// Reads the monotonic clock.
    ///
    /// # Panics
    ///
    /// Panics if the monotonic clock read fails, which POSIX rules out for
    /// a valid clock id.
    #[must_use]
    pub fn now() -> Self {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        // SAFETY: `ts` is a valid, writable timespec and CLOCK_MONOTONIC is
        // supported on every target this crate builds for.
        let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
        assert_eq!(rc, 0, "clock_gettime(CLOCK_MONOTONIC) failed");
        Self {
            secs: i64::from(ts.tv_sec),
            nanos: ts.tv_nsec as u32,
        }
    }

    /// Span from `earlier` to `self`, borrowing a second when the
    /// nanosecond difference runs negative.
    ///
    /// The nanosecond part of the result stays in range; the second part
    /// goes negative when `earlier` is actually later.
    #[must_use]
    pub const fn duration_since(self, earlier: Self) -> Self {
        let mut secs = self.secs - earlier.secs;
        let nanos = if self.nanos < earlier.nanos {
            secs -= 1;
            self.nanos + NANOS_PER_SEC - earlier.nanos
        } else {
            self.nanos - earlier.nanos
        };
        Self { secs, nanos }
    }
}

impl fmt::Debug for Timespec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timespec({self})")
    }
}

impl fmt::Display for Timespec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nanos)
    }
}
