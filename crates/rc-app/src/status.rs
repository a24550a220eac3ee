//! A processing context that reports progress through `tracing`.

use rc_core::{CancelFlag, ProcessingContext};

/// Forwards every status message to `tracing` at `info` level and cancels
/// when its flag is raised.
///
/// Multi-line messages are logged one line per event so a header posted
/// above backend progress stays readable in plain log output.
///
/// # Example
///
/// ```rust,ignore
/// let ctx = LoggingContext::new("matrix");
/// let matrix = app.distance().calculate(&config, &[&points], &ctx)?;
/// ```
#[derive(Debug, Default)]
pub struct LoggingContext {
    task:   String,
    cancel: CancelFlag,
}

impl LoggingContext {
    pub fn new(task: impl Into<String>) -> Self {
        Self { task: task.into(), cancel: CancelFlag::new() }
    }

    /// Ask the running computation to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl ProcessingContext for LoggingContext {
    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn post_status(&self, message: &str) {
        for line in message.lines().filter(|l| !l.trim().is_empty()) {
            tracing::info!(task = %self.task, "{line}");
        }
    }
}
