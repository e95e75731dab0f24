//! # Post-Commit Persistence
//!
//! The store calls a `PersistHook` with a full snapshot after every
//! successful mutation. The hook decides when the snapshot reaches disk:
//!
//! - `SyncPersist` writes before the mutation returns
//! - `BackgroundPersist` hands the snapshot to a tokio task and returns
//! - `NoPersist` drops it (in-memory stores, tests)
//!
//! Hook failures are logged, never returned to the caller of the mutation.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::persistence::{save_students, WriteMode};
use super::record::Student;

/// Called by the store after each committed mutation
///
/// Invoked while the store's write lock is held, so snapshots arrive in
/// commit order. Implementations must not block for long.
pub trait PersistHook: Send + Sync {
    fn after_commit(&self, snapshot: Vec<Student>);
}

/// Discards snapshots
pub struct NoPersist;

impl PersistHook for NoPersist {
    fn after_commit(&self, _: Vec<Student>) {}
}

/// Writes each snapshot inline
///
/// The write is blocking file I/O on the calling runtime thread while the
/// store's write lock is held. Every acknowledged mutation is on disk, at
/// the cost of serialising all requests behind the write.
pub struct SyncPersist {
    path: PathBuf,
    mode: WriteMode,
}

impl SyncPersist {
    pub fn new(path: impl Into<PathBuf>, mode: WriteMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }
}

impl PersistHook for SyncPersist {
    fn after_commit(&self, snapshot: Vec<Student>) {
        if let Err(e) = save_students(&self.path, &snapshot, self.mode) {
            tracing::error!(path = %self.path.display(), error = %e, "persist after commit failed");
        }
    }
}

/// Queues snapshots for a background writer task
///
/// Snapshots are full copies of the collection, so when several are queued
/// the writer skips straight to the newest one.
pub struct BackgroundPersist {
    tx: Mutex<Option<mpsc::UnboundedSender<Vec<Student>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BackgroundPersist {
    /// Spawn the writer task on the current tokio runtime
    pub fn spawn(path: impl Into<PathBuf>, mode: WriteMode) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_writer(path, mode, rx));

        Self {
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Stop accepting snapshots and wait until every queued one is written
    pub async fn shutdown(&self) {
        drop(self.tx.lock().take());

        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "background persist task panicked");
            }
        }
    }
}

impl PersistHook for BackgroundPersist {
    fn after_commit(&self, snapshot: Vec<Student>) {
        match self.tx.lock().as_ref() {
            Some(tx) => {
                if tx.send(snapshot).is_err() {
                    tracing::error!("background persist task is gone, snapshot dropped");
                }
            }
            None => tracing::warn!("persist hook already shut down, snapshot dropped"),
        }
    }
}

async fn run_writer(
    path: PathBuf,
    mode: WriteMode,
    mut rx: mpsc::UnboundedReceiver<Vec<Student>>,
) {
    while let Some(mut snapshot) = rx.recv().await {
        while let Ok(newer) = rx.try_recv() {
            snapshot = newer;
        }

        let target = path.clone();
        let written =
            tokio::task::spawn_blocking(move || write_snapshot(&target, &snapshot, mode)).await;
        if let Err(e) = written {
            tracing::error!(error = %e, "persist worker failed to join");
        }
    }
    tracing::debug!(path = %path.display(), "background persist drained");
}

fn write_snapshot(path: &Path, snapshot: &[Student], mode: WriteMode) {
    match save_students(path, snapshot, mode) {
        Ok(()) => tracing::debug!(path = %path.display(), records = snapshot.len(), "persisted"),
        Err(e) => tracing::error!(path = %path.display(), error = %e, "background persist failed"),
    }
}
