//! Background task that writes the snapshots of a store
//!
//! Every change of the store publishes a new snapshot on a `watch` channel. The writer task saves snapshots one at a time:
//! snapshots that are published while a write is in progress collapse into the latest one, which is written next.
//! A stale snapshot can therefore never overwrite a newer one.
//!
//! A write that fails (or times out) is retried a few times, then abandoned. The next change will trigger a new write anyway.

use std::fmt::{Display, Error, Formatter};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::WriterConfig;
use crate::state::TaskState;
use crate::store::{SubscriptionId, TaskStore};
use crate::traits::StorageSlot;
use super::PersistenceAdapter;

/// A state of the store, tagged with how many changes led to it
#[derive(Clone, Debug)]
struct Snapshot {
    generation: u64,
    state: Arc<TaskState>,
}

/// What the writer is currently doing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriterPhase {
    /// Waiting for the next change
    Idle,
    /// A snapshot is being written
    Writing,
    /// The last snapshot could not be written, even after retrying
    Failed { attempts: u32 },
}

/// Progress report of the writer task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterStatus {
    /// The latest snapshot that has been handled, either written or abandoned
    pub handled_generation: u64,
    pub phase: WriterPhase,
}

impl Display for WriterStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self.phase {
            WriterPhase::Idle => write!(f, "Up to date (change #{})", self.handled_generation),
            WriterPhase::Writing => write!(f, "Saving..."),
            WriterPhase::Failed { attempts } => write!(f, "Unable to save change #{} after {} attempts", self.handled_generation, attempts),
        }
    }
}


/// Keeps track of a writer task
#[derive(Debug)]
pub struct WriterHandle {
    subscription: SubscriptionId,
    snapshots: watch::Receiver<Snapshot>,
    status: watch::Receiver<WriterStatus>,
    task: JoinHandle<()>,
}

impl WriterHandle {
    /// Returns a receiver that tracks the progress of the writer
    pub fn status(&self) -> watch::Receiver<WriterStatus> {
        self.status.clone()
    }

    /// Wait until the latest change has been written (or abandoned)
    pub async fn flush(&self) {
        let target = self.snapshots.borrow().generation;
        let mut status = self.status.clone();
        loop {
            let handled = status.borrow_and_update().handled_generation;
            if handled >= target {
                return;
            }
            if status.changed().await.is_err() {
                // The writer has stopped, there is nothing to wait for anymore
                return;
            }
        }
    }

    /// Stop saving the changes of `store`, and wait until the pending write (if any) is done.
    ///
    /// In case this writer was not attached to `store`, the writer is stopped right away, and pending writes are lost.
    pub async fn shutdown(self, store: &mut TaskStore) {
        // Dropping the observer closes the snapshot channel, which lets the writer terminate
        if store.unsubscribe(self.subscription) == false {
            log::warn!("This snapshot writer does not save this store. Stopping it without waiting for pending writes");
            self.task.abort();
            return;
        }
        if let Err(err) = self.task.await {
            log::error!("The snapshot writer has terminated abnormally: {}", err);
        }
        log::info!("Snapshot writer stopped");
    }
}


pub(super) fn spawn<S>(adapter: PersistenceAdapter<S>, store: &mut TaskStore, config: WriterConfig) -> WriterHandle
where
    S: StorageSlot + 'static,
{
    let (snapshot_sender, snapshots) = watch::channel(Snapshot {
        generation: 0,
        state: Arc::new(store.snapshot()),
    });
    let (status_sender, status) = watch::channel(WriterStatus {
        handled_generation: 0,
        phase: WriterPhase::Idle,
    });

    let mut generation = 0;
    let subscription = store.subscribe(move |_change, state| {
        generation += 1;
        let _ = snapshot_sender.send(Snapshot {
            generation,
            state: Arc::new(state.clone()),
        });
    });

    let task = tokio::spawn(run(adapter, snapshots.clone(), status_sender, config));

    WriterHandle { subscription, snapshots, status, task }
}


async fn run<S: StorageSlot>(
    adapter: PersistenceAdapter<S>,
    mut snapshots: watch::Receiver<Snapshot>,
    status: watch::Sender<WriterStatus>,
    config: WriterConfig,
) {
    // Changes may have been published before this task first runs: they have not been seen by `snapshots` yet
    let mut handled = 0;

    loop {
        let open = snapshots.changed().await.is_ok();
        if open && config.debounce().is_zero() == false {
            tokio::time::sleep(config.debounce()).await;
        }

        let snapshot = snapshots.borrow_and_update().clone();
        if snapshot.generation > handled {
            let _ = status.send(WriterStatus { handled_generation: handled, phase: WriterPhase::Writing });

            let phase = match write_with_retries(&adapter, &snapshot, &config).await {
                Ok(()) => WriterPhase::Idle,
                Err(attempts) => WriterPhase::Failed { attempts },
            };
            handled = snapshot.generation;
            let _ = status.send(WriterStatus { handled_generation: handled, phase });
        }

        if open == false {
            log::debug!("Snapshot channel closed, last handled change is #{}", handled);
            break;
        }
    }
}

/// Returns the number of attempts in case the snapshot could not be written
async fn write_with_retries<S: StorageSlot>(
    adapter: &PersistenceAdapter<S>,
    snapshot: &Snapshot,
    config: &WriterConfig,
) -> Result<(), u32> {
    let attempts = config.max_retries.saturating_add(1);

    for attempt in 1..=attempts {
        let failure = match tokio::time::timeout(config.write_timeout(), adapter.try_save(&snapshot.state)).await {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(_elapsed) => Some(format!("timed out after {:?}", config.write_timeout())),
        };

        match failure {
            None => {
                log::debug!("Saved change #{} ({} tasks)", snapshot.generation, snapshot.state.task_count());
                return Ok(());
            },
            Some(reason) => {
                log::warn!("Unable to save change #{} (attempt {}/{}): {}", snapshot.generation, attempt, attempts, reason);
                if attempt < attempts {
                    tokio::time::sleep(config.retry_delay()).await;
                }
            },
        }
    }

    log::error!("Giving up saving change #{} after {} attempts", snapshot.generation, attempts);
    Err(attempts)
}
