//! Counting semaphore.

use parking_lot::{Condvar, Mutex};

/// Counting semaphore.
#[derive(Debug, Default)]
pub struct Semaphore {
    count: Mutex<u32>,
    available: Condvar,
}

impl Semaphore {
    #[must_use]
    pub const fn new(initial: u32) -> Self {
        Self {
            count: Mutex::new(initial),
            available: Condvar::new(),
        }
    }

    /// Release one unit, waking one waiter.
    pub fn post(&self) {
        self.post_n(1);
    }

    /// Release `n` units.
    pub fn post_n(&self, n: u32) {
        if n == 0 {
            return;
        }
        let mut count = self.count.lock();
        *count = count.saturating_add(n);
        if n == 1 {
            self.available.notify_one();
        } else {
            self.available.notify_all();
        }
    }

    /// Block until a unit is available, then take it.
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.available.wait(&mut count);
        }
        *count -= 1;
    }

    /// Take a unit if one is available without blocking.
    pub fn try_wait(&self) -> bool {
        let mut count = self.count.lock();
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Current count. Only a snapshot under concurrency.
    #[must_use]
    pub fn value(&self) -> u32 {
        *self.count.lock()
    }
}
