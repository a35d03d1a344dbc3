//! Bounded execution harness.
//!
//! Parsing jobs run on a pool of plain OS threads so the caller can enforce a
//! wall-clock deadline per parse. The pool mirrors the executor the parser
//! has always promised:
//!
//! - workers are spawned on demand up to `max_size`,
//! - an idle worker terminates after `idle_timeout` (twice the parse
//!   timeout) unless it is one of the `core_size` resident workers,
//! - when the pool is saturated a submission blocks the caller up to its
//!   admission timeout before being rejected,
//! - shutdown stops admissions, discards queued jobs and waits briefly for
//!   in-flight jobs to finish.
//!
//! Cancellation is cooperative: each job carries a [`CancelFlag`] which the
//! parsing code checks between pipeline steps and pattern applications.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Cooperative cancellation flag shared between a caller and its job.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

/// Raised at a cancellation checkpoint once the flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cancelled;

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Checkpoint; jobs call this between pipeline steps and before every
    /// pattern application.
    pub(crate) fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubmitError {
    /// The pool is shut down.
    Terminated,
    /// No worker became free within the admission timeout.
    Saturated,
}

#[derive(Default)]
struct PoolState {
    queue: VecDeque<Job>,
    idle: usize,
    workers: usize,
    shutdown: bool,
}

struct PoolInner {
    state: Mutex<PoolState>,
    work_available: Condvar,
    worker_free: Condvar,
    idle_timeout: Duration,
    core_size: usize,
    max_size: usize,
}

pub(crate) struct WorkerPool {
    inner: Arc<PoolInner>,
}

static WORKER_SEQ: AtomicUsize = AtomicUsize::new(0);

impl WorkerPool {
    pub fn new(core_size: usize, max_size: usize, idle_timeout: Duration) -> Self {
        let max_size = max_size.max(1);
        WorkerPool {
            inner: Arc::new(PoolInner {
                state: Mutex::new(PoolState::default()),
                work_available: Condvar::new(),
                worker_free: Condvar::new(),
                idle_timeout,
                core_size: core_size.min(max_size),
                max_size,
            }),
        }
    }

    /// Hand a job to a worker, blocking up to `admission_timeout` for a free
    /// slot when all workers are busy.
    pub fn submit(&self, job: Job, admission_timeout: Duration) -> Result<(), SubmitError> {
        let deadline = Instant::now() + admission_timeout;
        let mut state = self.inner.state.lock().unwrap();
        loop {
            if state.shutdown {
                return Err(SubmitError::Terminated);
            }
            if state.idle > state.queue.len() {
                state.queue.push_back(job);
                self.inner.work_available.notify_one();
                return Ok(());
            }
            if state.workers < self.inner.max_size {
                state.workers += 1;
                let inner = Arc::clone(&self.inner);
                let id = WORKER_SEQ.fetch_add(1, Ordering::Relaxed);
                let spawned = thread::Builder::new()
                    .name(format!("nameparser-worker-{id}"))
                    .spawn(move || run_worker(inner));
                match spawned {
                    Ok(_) => {
                        state.queue.push_back(job);
                        self.inner.work_available.notify_one();
                        return Ok(());
                    }
                    Err(err) => {
                        state.workers -= 1;
                        warn!(error = %err, "failed to spawn parser worker");
                        return Err(SubmitError::Saturated);
                    }
                }
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(SubmitError::Saturated);
            }
            let (guard, _) = self.inner.worker_free.wait_timeout(state, remaining).unwrap();
            state = guard;
        }
    }

    /// Stop admissions, drop queued jobs and wait up to `grace` for in-flight
    /// jobs. Idempotent.
    pub fn shutdown(&self, grace: Duration) {
        let mut state = self.inner.state.lock().unwrap();
        if state.shutdown {
            return;
        }
        state.shutdown = true;
        let discarded = state.queue.len();
        state.queue.clear();
        if discarded > 0 {
            warn!(discarded, "discarding queued parsing tasks on shutdown");
        }
        self.inner.work_available.notify_all();
        self.inner.worker_free.notify_all();

        let deadline = Instant::now() + grace;
        while state.workers > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(workers = state.workers, "forced shutdown with busy parser workers");
                return;
            }
            let (guard, _) = self.inner.worker_free.wait_timeout(state, remaining).unwrap();
            state = guard;
        }
        debug!("parser worker pool shut down orderly");
    }

    #[cfg(test)]
    fn worker_count(&self) -> usize {
        self.inner.state.lock().unwrap().workers
    }
}

fn run_worker(inner: Arc<PoolInner>) {
    loop {
        let mut state = inner.state.lock().unwrap();
        let job = 'find: loop {
            if let Some(job) = state.queue.pop_front() {
                break 'find Some(job);
            }
            if state.shutdown {
                break 'find None;
            }

            state.idle += 1;
            inner.worker_free.notify_one();
            let deadline = Instant::now() + inner.idle_timeout;
            let found = loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break None;
                }
                let (guard, _) = inner.work_available.wait_timeout(state, remaining).unwrap();
                state = guard;
                if let Some(job) = state.queue.pop_front() {
                    break Some(job);
                }
                if state.shutdown {
                    break None;
                }
            };
            state.idle -= 1;

            match found {
                Some(job) => break 'find Some(job),
                None => {
                    if state.shutdown || state.workers > inner.core_size {
                        break 'find None;
                    }
                    // Resident core worker: keep waiting.
                }
            }
        };

        match job {
            Some(job) => {
                drop(state);
                job();
            }
            None => {
                state.workers -= 1;
                inner.worker_free.notify_all();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn runs_submitted_jobs() {
        let pool = WorkerPool::new(0, 4, Duration::from_millis(200));
        let (tx, rx) = mpsc::channel();
        pool.submit(Box::new(move || tx.send(42).unwrap()), Duration::from_millis(100)).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 42);
        pool.shutdown(Duration::from_millis(200));
    }

    #[test]
    fn saturated_pool_rejects_after_admission_timeout() {
        let pool = WorkerPool::new(0, 1, Duration::from_millis(500));
        let (block_tx, block_rx) = mpsc::channel::<()>();
        pool.submit(
            Box::new(move || {
                let _ = block_rx.recv_timeout(Duration::from_secs(2));
            }),
            Duration::from_millis(100),
        )
        .unwrap();
        // Give the worker a moment to pick the job up.
        thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        let res = pool.submit(Box::new(|| {}), Duration::from_millis(100));
        assert_eq!(res, Err(SubmitError::Saturated));
        assert!(started.elapsed() >= Duration::from_millis(90));

        block_tx.send(()).unwrap();
        pool.shutdown(Duration::from_millis(500));
    }

    #[test]
    fn idle_workers_are_reaped() {
        let pool = WorkerPool::new(0, 4, Duration::from_millis(50));
        let (tx, rx) = mpsc::channel();
        pool.submit(Box::new(move || tx.send(()).unwrap()), Duration::from_millis(100)).unwrap();
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(pool.worker_count(), 1);

        thread::sleep(Duration::from_millis(400));
        assert_eq!(pool.worker_count(), 0);
    }

    #[test]
    fn shutdown_rejects_new_work() {
        let pool = WorkerPool::new(0, 2, Duration::from_millis(100));
        pool.shutdown(Duration::from_millis(100));
        let res = pool.submit(Box::new(|| {}), Duration::from_millis(10));
        assert_eq!(res, Err(SubmitError::Terminated));
        // Idempotent.
        pool.shutdown(Duration::from_millis(100));
    }

    #[test]
    fn cancel_flag_checkpoints() {
        let flag = CancelFlag::new();
        assert!(flag.check().is_ok());
        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled());
        assert_eq!(flag.check(), Err(Cancelled));
    }
}
