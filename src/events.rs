//! Readiness event sets exchanged between fibers and the event loop.
//!
//! A wake delivers one of these masks: the empty set for a plain wake, or
//! the conditions observed on a descriptor. Conversions to and from poll(2)
//! flags cover the common demultiplexer interchange.

use core::fmt;

/// Set of readiness conditions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Events(u8);

impl Events {
    /// The empty set.
    pub const NONE: Events = Events(0);
    /// Data available to read.
    pub const READABLE: Events = Events(1 << 0);
    /// Priority data available to read.
    pub const PRIORITY: Events = Events(1 << 1);
    /// Write would not block.
    pub const WRITABLE: Events = Events(1 << 2);
    /// Error condition on the descriptor.
    pub const ERROR: Events = Events(1 << 3);
    /// Peer hung up.
    pub const HANGUP: Events = Events(1 << 4);

    /// Returns the raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if no condition is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every condition in `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Events) -> bool {
        self.0 & other.0 == other.0
    }

    /// Combines two sets.
    #[must_use]
    pub const fn add(self, other: Events) -> Self {
        Events(self.0 | other.0)
    }

    /// Removes the conditions in `other`.
    #[must_use]
    pub const fn remove(self, other: Events) -> Self {
        Events(self.0 & !other.0)
    }

    /// Converts to poll(2) request flags.
    ///
    /// Error and hangup are always requested; poll reports them whether or
    /// not they were asked for, and callers want them surfaced.
    #[must_use]
    pub const fn to_poll(self) -> libc::c_short {
        let mut flags: libc::c_short = 0;
        if self.contains(Self::READABLE) {
            flags |= libc::POLLIN;
        }
        if self.contains(Self::PRIORITY) {
            flags |= libc::POLLPRI;
        }
        if self.contains(Self::WRITABLE) {
            flags |= libc::POLLOUT;
        }
        flags | libc::POLLERR | libc::POLLHUP
    }

    /// Converts poll(2) result flags back to a readiness set.
    ///
    /// Only the requestable conditions map back; error and hangup reports
    /// stay with the poller.
    #[must_use]
    pub const fn from_poll(flags: libc::c_short) -> Self {
        let mut events = Self::NONE;
        if flags & libc::POLLIN != 0 {
            events = events.add(Self::READABLE);
        }
        if flags & libc::POLLPRI != 0 {
            events = events.add(Self::PRIORITY);
        }
        if flags & libc::POLLOUT != 0 {
            events = events.add(Self::WRITABLE);
        }
        events
    }
}

impl fmt::Debug for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Events(none)");
        }
        f.write_str("Events(")?;
        let mut first = true;
        for (bit, name) in [
            (Self::READABLE, "READABLE"),
            (Self::PRIORITY, "PRIORITY"),
            (Self::WRITABLE, "WRITABLE"),
            (Self::ERROR, "ERROR"),
            (Self::HANGUP, "HANGUP"),
        ] {
            if self.contains(bit) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        f.write_str(")")
    }
}
