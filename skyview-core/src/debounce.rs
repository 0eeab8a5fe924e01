//! Generation counters for "only the latest one counts" scheduling.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::task::JoinHandle;

/// Monotonic ticket dispenser. A ticket is current until a newer one is issued.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    latest: Arc<AtomicU64>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    /// Invalidate every ticket handed out so far.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// Runs a scheduled job after `delay`, unless another job was scheduled (or
/// the debouncer cancelled) in the meantime.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Sequence,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Sequence::new(),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, job: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.generation.next();
        let generation = self.generation.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.is_current(ticket) {
                job.await;
            }
        })
    }

    pub fn cancel(&self) {
        self.generation.invalidate();
    }
}
