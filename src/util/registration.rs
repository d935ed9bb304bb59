use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Adds 1 to the counter on creation and subtracts 1 on drop
pub(crate) struct Registration<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> Registration<'a> {
    pub(crate) fn new(counter: &'a AtomicUsize) -> Self {
        let _ = counter.fetch_add(1, Ordering::Release);
        Self { counter }
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let _ = self.counter.fetch_sub(1, Ordering::Release);
    }
}

/// Owned variant of [`Registration`] for counters shared across threads
pub(crate) struct OwnedRegistration {
    counter: Arc<AtomicUsize>,
}

impl OwnedRegistration {
    pub(crate) fn new(counter: Arc<AtomicUsize>) -> Self {
        let _ = counter.fetch_add(1, Ordering::Release);
        Self { counter }
    }
}

impl Drop for OwnedRegistration {
    fn drop(&mut self) {
        let _ = self.counter.fetch_sub(1, Ordering::Release);
    }
}
