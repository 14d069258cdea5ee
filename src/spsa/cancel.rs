use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Zdieľaný príznak na zrušenie behu. Kontroluje sa len na hranici iterácií.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Vonkajšie obmedzenia behu (nezávislé od konfigurácie algoritmu).
#[derive(Debug, Clone, Default)]
pub struct RunBudget {
    cancel: Option<CancelToken>,
    deadline: Option<Duration>,
    max_iterations: Option<usize>,
}

impl RunBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// `completed` je počet dokončených iterácií.
    pub fn exhausted(&self, completed: usize, started: Instant) -> bool {
        if self.cancel.as_ref().map_or(false, CancelToken::is_cancelled) {
            return true;
        }
        if self.max_iterations.map_or(false, |limit| completed >= limit) {
            return true;
        }
        self.deadline.map_or(false, |d| started.elapsed() >= d)
    }
}
