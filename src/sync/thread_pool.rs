//! Fixed-size worker pool draining a LIFO task stack.
//!
//! Tasks are queued with [`ThreadPool::add_task`] and sit idle until
//! [`ThreadPool::kick`] wakes the workers. [`ThreadPool::kick_and_wait`] also
//! lets the calling thread run tasks, then blocks until the stack is empty and
//! no worker is mid-task.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};

/// Task stack capacity used by [`ThreadPool::new`].
pub const DEFAULT_TASK_CAPACITY: usize = 1024;

type Task = Box<dyn FnOnce() + Send + 'static>;

struct State {
    tasks: Vec<Task>,
    capacity: usize,
    running: usize,
    kicked: bool,
    shutdown: bool,
}

impl State {
    fn idle(&self) -> bool {
        self.tasks.is_empty() && self.running == 0
    }
}

struct Shared {
    state: Mutex<State>,
    work_ready: Condvar,
    all_done: Condvar,
}

impl Shared {
    /// Run `task` with the state lock released, then update bookkeeping.
    fn run(&self, state: &mut MutexGuard<'_, State>, task: Task) {
        state.running += 1;
        let outcome = MutexGuard::unlocked(state, || catch_unwind(AssertUnwindSafe(task)));
        state.running -= 1;
        if outcome.is_err() {
            emit_log(LogLevel::Warn, "thread pool task panicked");
        }
        if state.idle() {
            state.kicked = false;
            self.all_done.notify_all();
        }
    }
}

/// Worker pool.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawn `threads` workers with the default task capacity.
    ///
    /// Zero threads is allowed: tasks then only run on the caller inside
    /// [`kick_and_wait`](Self::kick_and_wait).
    pub fn new(threads: usize) -> Result<Self> {
        Self::with_capacity(threads, DEFAULT_TASK_CAPACITY)
    }

    pub fn with_capacity(threads: usize, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidConfig(
                "thread pool task capacity must be at least 1".to_string(),
            ));
        }
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                tasks: Vec::with_capacity(capacity),
                capacity,
                running: 0,
                kicked: false,
                shutdown: false,
            }),
            work_ready: Condvar::new(),
            all_done: Condvar::new(),
        });

        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(threads),
        };
        for i in 0..threads {
            let shared = Arc::clone(&pool.shared);
            // On failure `pool` drops here and joins the workers already spawned.
            let handle = thread::Builder::new()
                .name(format!("cutekit-worker-{i}"))
                .spawn(move || worker_main(&shared))?;
            pool.workers.push(handle);
        }
        emit_log(
            LogLevel::Debug,
            &format!("thread pool started with {threads} workers"),
        );
        Ok(pool)
    }

    /// Push a task. It runs after the next kick.
    pub fn add_task<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.state.lock();
        if state.tasks.len() >= state.capacity {
            return Err(Error::QueueFull {
                capacity: state.capacity,
            });
        }
        state.tasks.push(Box::new(task));
        Ok(())
    }

    /// Wake workers to drain the stack. Returns immediately.
    pub fn kick(&self) {
        let mut state = self.shared.state.lock();
        if state.tasks.is_empty() {
            return;
        }
        state.kicked = true;
        self.shared.work_ready.notify_all();
    }

    /// Kick, help drain the stack on this thread, then wait for every task.
    pub fn kick_and_wait(&self) {
        self.kick();
        let mut state = self.shared.state.lock();
        while let Some(task) = state.tasks.pop() {
            self.shared.run(&mut state, task);
        }
        while !state.idle() {
            self.shared.all_done.wait(&mut state);
        }
    }

    /// Tasks queued and not yet started.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.state.lock().tasks.len()
    }

    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("threads", &self.workers.len())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        let dropped = {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
            let dropped = state.tasks.len();
            state.tasks.clear();
            self.shared.work_ready.notify_all();
            dropped
        };
        if dropped > 0 {
            emit_log(
                LogLevel::Warn,
                &format!("thread pool dropped {dropped} tasks that were never run"),
            );
        }
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_main(shared: &Shared) {
    let mut state = shared.state.lock();
    loop {
        if state.shutdown {
            return;
        }
        let task = if state.kicked { state.tasks.pop() } else { None };
        match task {
            Some(task) => shared.run(&mut state, task),
            None => shared.work_ready.wait(&mut state),
        }
    }
}
