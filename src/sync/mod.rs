//! Synchronization primitives.
//!
//! - [`Semaphore`]: counting semaphore on a mutex and condition variable.
//! - [`RwLock`]: reader/writer lock built from an atomic reader count and two
//!   semaphores. Readers never touch a mutex when no writer is active.
//! - [`ThreadPool`]: fixed worker set draining a LIFO task stack.

mod rwlock;
mod semaphore;
mod thread_pool;

pub use rwlock::{ReadGuard, RwLock, WriteGuard};
pub use semaphore::Semaphore;
pub use thread_pool::{DEFAULT_TASK_CAPACITY, ThreadPool};

/// Number of hardware threads available, at least 1.
#[must_use]
pub fn core_count() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_count_positive() {
        assert!(core_count() >= 1);
    }
}
