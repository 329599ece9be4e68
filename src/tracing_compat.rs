//! Logging shim over the optional `tracing` dependency.
//!
//! Queue internals log through this module so the default build carries no
//! logging dependency at all:
//!
//! - **With `tracing-integration`**: re-exports the real `tracing` macros.
//! - **Without it**: the macros expand to nothing.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::tracing_compat::{debug, trace};
//!
//! trace!(waiter = %id, "queued detached waiter");
//! debug!(count, "flushed wait queue");
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, trace};

// When tracing is disabled, provide no-op macros with the same names.
#[cfg(not(feature = "tracing-integration"))]
mod noop {
    //! No-op implementations when tracing is disabled.

    /// No-op trace-level logging macro.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op debug-level logging macro.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    pub use crate::{debug, trace};
}

#[cfg(not(feature = "tracing-integration"))]
pub use noop::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_accept_fields_and_messages() {
        trace!("plain message");
        trace!(waiter = 3, "with field");
        debug!(count = 0usize, "drained");
        debug!("plain");
    }
}
