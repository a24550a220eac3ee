//! Processing context: cooperative cancellation and status messages.
//!
//! Long-running operations never get interrupted from outside.  Instead they
//! poll [`ProcessingContext::is_cancelled`] at coarse checkpoints and return
//! early, and report progress through [`ProcessingContext::post_status`].

use std::sync::atomic::{AtomicBool, Ordering};

/// Callbacks a long-running computation uses to talk to its caller.
///
/// Both methods have default no-op implementations, so implementors only
/// override what they care about.
///
/// # Thread safety
///
/// Implementations must be `Sync`: the road-network backend may poll
/// cancellation from Rayon worker threads.
pub trait ProcessingContext: Sync {
    /// `true` once the caller has asked for the computation to stop.
    fn is_cancelled(&self) -> bool {
        false
    }

    /// Receive a human-readable progress message.
    fn post_status(&self, _message: &str) {}
}

/// A [`ProcessingContext`] that never cancels and drops all messages.
pub struct NoopContext;

impl ProcessingContext for NoopContext {}

/// A context backed by an atomic flag that any thread may raise.
///
/// ```
/// use rc_core::{CancelFlag, ProcessingContext};
///
/// let flag = CancelFlag::new();
/// assert!(!flag.is_cancelled());
/// flag.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Default)]
pub struct CancelFlag {
    cancelled: AtomicBool,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl ProcessingContext for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Wraps another context and puts a fixed header above every status message.
///
/// Used to keep an engine-level message ("Calculating 40x40 matrix …")
/// visible while a backend reports its own progress lines.
pub struct PrefixedContext<'a> {
    inner:  &'a dyn ProcessingContext,
    prefix: String,
}

impl<'a> PrefixedContext<'a> {
    pub fn new(inner: &'a dyn ProcessingContext, prefix: impl Into<String>) -> Self {
        Self { inner, prefix: prefix.into() }
    }
}

impl ProcessingContext for PrefixedContext<'_> {
    fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    fn post_status(&self, message: &str) {
        self.inner.post_status(&format!("{}\n{}", self.prefix, message));
    }
}
