//! Non-blocking mode helpers for raw descriptors.
//!
//! An event loop flips descriptors into non-blocking mode while it multiplexes
//! them and puts them back afterwards. [`set_nonblocking`] returns the flags
//! as they were before the change so the caller can hand them straight to
//! [`restore_blocking`].

#![allow(unsafe_code)]

use core::fmt;
use std::io;
use std::os::unix::io::RawFd;

/// Descriptor status flags as read by `fcntl(F_GETFL)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FdFlags(libc::c_int);

impl FdFlags {
    /// Raw flag bits.
    #[must_use]
    pub const fn bits(self) -> libc::c_int {
        self.0
    }

    /// Whether `O_NONBLOCK` is set.
    #[must_use]
    pub const fn is_nonblocking(self) -> bool {
        self.0 & libc::O_NONBLOCK != 0
    }
}

impl fmt::Debug for FdFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FdFlags({:#o})", self.0)
    }
}

/// Reads the current status flags of `fd`.
pub fn flags(fd: RawFd) -> io::Result<FdFlags> {
    // SAFETY: F_GETFL reads descriptor state and touches no memory.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(FdFlags(flags))
}

/// Puts `fd` into non-blocking mode and returns the flags it had before.
///
/// Descriptors already in non-blocking mode are left untouched; the returned
/// flags then show `O_NONBLOCK` set, which makes a later
/// [`restore_blocking`] with them a no-op.
pub fn set_nonblocking(fd: RawFd) -> io::Result<FdFlags> {
    let previous = flags(fd)?;
    if !previous.is_nonblocking() {
        // SAFETY: F_SETFL takes flag bits only; no pointers involved.
        let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, previous.bits() | libc::O_NONBLOCK) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(previous)
}

/// Takes `fd` back out of non-blocking mode if `previous` says it was
/// blocking before.
///
/// Only the `O_NONBLOCK` bit is cleared, and it is cleared from the flags as
/// they are now. Status flags changed since the save survive.
pub fn restore_blocking(fd: RawFd, previous: FdFlags) -> io::Result<()> {
    if !previous.is_nonblocking() {
        let current = flags(fd)?;
        // SAFETY: F_SETFL takes flag bits only; no pointers involved.
        let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, current.bits() & !libc::O_NONBLOCK) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}
