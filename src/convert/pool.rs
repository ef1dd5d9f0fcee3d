//! Fixed-size worker pool.
//!
//! Tasks are queued on one channel shared by every worker. Shutting the
//! pool down closes the queue: queued and running tasks still finish, new
//! submissions are rejected.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error};

/// Number of conversions allowed to run at once.
pub const DEFAULT_POOL_DEPTH: usize = 2;

type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("worker pool is shut down")]
    ShutDown,
    #[error("task ended without producing a result")]
    Disconnected,
}

pub struct WorkerPool {
    tx: Mutex<Option<Sender<Task>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        let (tx, rx) = mpsc::channel::<Task>();
        let rx = Arc::new(Mutex::new(rx));

        let workers: Vec<JoinHandle<()>> = (0..depth)
            .map(|id| spawn_worker(id, rx.clone()))
            .collect();

        Self {
            tx: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
        }
    }

    /// Queue `f` and get a handle to its result.
    pub fn submit<T, F>(&self, f: F) -> Result<JobHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = mpsc::channel();
        let task: Task = Box::new(move || {
            // The caller may have dropped its handle.
            let _ = result_tx.send(f());
        });

        let guard = self.tx.lock().map_err(|_| PoolError::ShutDown)?;
        let tx = guard.as_ref().ok_or(PoolError::ShutDown)?;
        tx.send(task).map_err(|_| PoolError::ShutDown)?;
        Ok(JobHandle { rx: result_rx })
    }

    /// Stop accepting work and wait for everything already queued.
    pub fn shutdown(&self) {
        if let Ok(mut tx) = self.tx.lock() {
            tx.take();
        }

        let handles: Vec<JoinHandle<()>> = match self.workers.lock() {
            Ok(mut w) => w.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for h in handles {
            let _ = h.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_worker(id: usize, rx: Arc<Mutex<Receiver<Task>>>) -> JoinHandle<()> {
    thread::spawn(move || {
        loop {
            // Hold the lock only while waiting for the next task.
            let next = match rx.lock() {
                Ok(guard) => guard.recv(),
                Err(_) => break,
            };
            let Ok(task) = next else {
                break;
            };
            if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                error!(worker = id, "conversion task panicked");
            }
        }
        debug!(worker = id, "worker exiting");
    })
}

/// Pending result of a submitted task.
pub struct JobHandle<T> {
    rx: Receiver<T>,
}

impl<T> JobHandle<T> {
    /// Block until the task has finished.
    pub fn wait(self) -> Result<T, PoolError> {
        self.rx.recv().map_err(|_| PoolError::Disconnected)
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`, returning
    /// `Ok(None)` if the task is still running.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Option<T>, PoolError> {
        match self.rx.recv_timeout(timeout) {
            Ok(v) => Ok(Some(v)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(PoolError::Disconnected),
        }
    }
}
