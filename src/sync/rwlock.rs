//! Reader/writer lock on an atomic reader count.
//!
//! Readers increment `readers`. A writer first serializes against other
//! writers, then subtracts [`MAX_READERS`] so the count goes negative and new
//! readers park on `read_sem`. Readers that were already inside are counted
//! into `departing`; the last one out posts `write_sem`. On unlock the writer
//! adds the bias back and posts `read_sem` once per parked reader.
//!
//! # Safety
//! The protected value lives in an `UnsafeCell`. Access is only handed out
//! through [`ReadGuard`] (shared) and [`WriteGuard`] (exclusive), whose
//! lifetimes are bounded by the lock protocol above.

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicI32, Ordering};

use parking_lot::{Mutex, MutexGuard};

use super::Semaphore;

/// Bias a writer subtracts from the reader count. Bounds concurrent readers.
const MAX_READERS: i32 = 1 << 30;

/// Reader/writer lock.
pub struct RwLock<T: ?Sized> {
    readers: AtomicI32,
    departing: AtomicI32,
    read_sem: Semaphore,
    write_sem: Semaphore,
    writer: Mutex<()>,
    data: UnsafeCell<T>,
}

// SAFETY: the lock owns its `T`; moving it to another thread moves the value.
unsafe impl<T: ?Sized + Send> Send for RwLock<T> {}
// SAFETY: shared access hands out `&T` to many threads (needs `Sync`) and
// `&mut T` to one thread at a time (needs `Send`).
unsafe impl<T: ?Sized + Send + Sync> Sync for RwLock<T> {}

impl<T> RwLock<T> {
    pub const fn new(value: T) -> Self {
        Self {
            readers: AtomicI32::new(0),
            departing: AtomicI32::new(0),
            read_sem: Semaphore::new(0),
            write_sem: Semaphore::new(0),
            writer: Mutex::new(()),
            data: UnsafeCell::new(value),
        }
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> RwLock<T> {
    /// Acquire shared access, blocking while a writer holds the lock.
    pub fn read(&self) -> ReadGuard<'_, T> {
        if self.readers.fetch_add(1, Ordering::Acquire) < 0 {
            self.read_sem.wait();
        }
        ReadGuard { lock: self }
    }

    /// Acquire exclusive access, blocking until current readers leave.
    pub fn write(&self) -> WriteGuard<'_, T> {
        let writer = self.writer.lock();
        let active = self.readers.fetch_sub(MAX_READERS, Ordering::Acquire);
        if active != 0 && self.departing.fetch_add(active, Ordering::Acquire) + active != 0 {
            self.write_sem.wait();
        }
        WriteGuard {
            lock: self,
            _writer: writer,
        }
    }

    /// Mutable access without locking; the borrow proves exclusivity.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    fn read_unlock(&self) {
        if self.readers.fetch_sub(1, Ordering::Release) - 1 < 0
            && self.departing.fetch_sub(1, Ordering::Release) - 1 == 0
        {
            self.write_sem.post();
        }
    }

    fn write_unlock(&self) {
        let parked = self.readers.fetch_add(MAX_READERS, Ordering::Release) + MAX_READERS;
        // `parked` readers arrived while the writer held the lock.
        if parked > 0 {
            self.read_sem.post_n(parked.unsigned_abs());
        }
    }
}

impl<T: Default> Default for RwLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ?Sized> fmt::Debug for RwLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RwLock")
            .field("readers", &self.readers.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Shared access to the value of an [`RwLock`].
pub struct ReadGuard<'a, T: ?Sized> {
    lock: &'a RwLock<T>,
}

impl<T: ?Sized> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: a live read guard means no writer passed `write()`, so no
        // `&mut T` exists.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.read_unlock();
    }
}

/// Exclusive access to the value of an [`RwLock`].
pub struct WriteGuard<'a, T: ?Sized> {
    lock: &'a RwLock<T>,
    // Dropped after `write_unlock` runs so the next writer sees restored counts.
    _writer: MutexGuard<'a, ()>,
}

impl<T: ?Sized> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the write guard is the only accessor while it lives.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the write guard is the only accessor while it lives, and
        // `&mut self` prevents aliasing through the guard itself.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.write_unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_read_then_write() {
        let lock = RwLock::new(1);
        {
            let a = lock.read();
            let b = lock.read();
            assert_eq!(*a + *b, 2);
        }
        *lock.write() += 41;
        assert_eq!(*lock.read(), 42);
        assert_eq!(lock.into_inner(), 42);
    }

    #[test]
    fn test_counts_restored_after_write() {
        let lock = RwLock::new(());
        drop(lock.write());
        drop(lock.read());
        assert_eq!(lock.readers.load(Ordering::SeqCst), 0);
        assert_eq!(lock.departing.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let lock = Arc::new(RwLock::new(0u64));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let lock = Arc::clone(&lock);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    *lock.write() += 1;
                }
            }));
        }
        for _ in 0..4 {
            let lock = Arc::clone(&lock);
            handles.push(thread::spawn(move || {
                let mut last = 0;
                for _ in 0..1000 {
                    let now = *lock.read();
                    assert!(now >= last);
                    last = now;
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*lock.read(), 4000);
    }

    #[test]
    fn test_writer_waits_for_reader() {
        let lock = Arc::new(RwLock::new(Vec::<u32>::new()));
        let guard = lock.read();
        let writer = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || lock.write().push(7))
        };
        thread::sleep(std::time::Duration::from_millis(20));
        assert!(guard.is_empty());
        drop(guard);
        writer.join().unwrap();
        assert_eq!(*lock.read(), vec![7]);
    }
}
