//! Timer contract for the fallback race and the probe bounds.

use std::{future::Future, pin::Pin};

/// Object-safe boxed future used by [`Timer`].
pub type TimerFuture = Pin<Box<dyn Future<Output = ()>>>;

/// Host timer service.
pub trait Timer {
    /// Resolves after roughly `duration_ms` milliseconds.
    fn sleep(&self, duration_ms: u32) -> TimerFuture;
}
