//! Cancellation handle checked by the dealer between bar passes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared cancellation flag with an optional deadline.
///
/// Clones observe the same flag, so a driver can hand one clone to a signal
/// handler and keep feeding bars with another.
#[derive(Debug, Clone, Default)]
pub struct Cancel {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle nothing will ever cancel
    pub fn never() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.map_or(false, |d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clone_shares_flag() {
        let cancel = Cancel::new();
        let handle = cancel.clone();
        assert!(!cancel.is_cancelled());
        handle.cancel();
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_deadline_elapsed() {
        let past = Instant::now() - Duration::from_millis(1);
        assert!(Cancel::with_deadline(past).is_cancelled());
        let future = Instant::now() + Duration::from_secs(3600);
        assert!(!Cancel::with_deadline(future).is_cancelled());
    }

    #[test]
    fn test_never() {
        assert!(!Cancel::never().is_cancelled());
    }
}
