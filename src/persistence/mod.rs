//! This module persists the state of a [`TaskStore`] to a [`StorageSlot`]
//!
//! The whole state is written as a single JSON document, after every change. \
//! Persistence is best-effort: unreadable documents are replaced by an empty state, failed writes are logged and dropped.

use std::error::Error;

use crate::config::WriterConfig;
use crate::state::TaskState;
use crate::store::TaskStore;
use crate::traits::StorageSlot;

pub mod writer;
use writer::WriterHandle;

/// Serialize a state into its persisted form
pub fn serialize(state: &TaskState) -> Result<String, Box<dyn Error>> {
    Ok(serde_json::to_string(state)?)
}

/// Rebuild a state from its persisted form
pub fn deserialize(content: &str) -> Result<TaskState, Box<dyn Error>> {
    Ok(serde_json::from_str(content)?)
}


/// Bridges a [`TaskStore`] and the slot its state is saved to
#[derive(Debug)]
pub struct PersistenceAdapter<S: StorageSlot> {
    slot: S,
}

impl<S: StorageSlot> PersistenceAdapter<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Read the saved state.
    ///
    /// Returns `Ok(None)` if nothing has been saved yet, and an error in case the slot cannot be read or contains garbage
    pub async fn try_load(&self) -> Result<Option<TaskState>, Box<dyn Error>> {
        let content = match self.slot.read().await? {
            None => return Ok(None),
            Some(content) => content,
        };
        let state = deserialize(&content)
            .map_err(|err| format!("Invalid saved state: {}", err))?;
        Ok(Some(state))
    }

    /// Read the saved state, or fall back to an empty state in case there is none, or it cannot be read
    pub async fn load(&self) -> TaskState {
        match self.try_load().await {
            Ok(Some(state)) => {
                log::info!("Loaded {} tasks over {} dates", state.task_count(), state.len());
                state
            },
            Ok(None) => {
                log::info!("No saved state yet, starting with no task");
                TaskState::default()
            },
            Err(err) => {
                log::warn!("Unable to load the saved state: {}. Starting with no task", err);
                TaskState::default()
            },
        }
    }

    /// Write the whole state to the slot
    pub async fn try_save(&self, state: &TaskState) -> Result<(), Box<dyn Error>> {
        let content = serialize(state)?;
        self.slot.write(content).await
    }

    /// Write the whole state to the slot. Errors are logged, and otherwise ignored
    pub async fn save(&self, state: &TaskState) {
        if let Err(err) = self.try_save(state).await {
            log::warn!("Unable to save the state: {}", err);
        }
    }
}

impl<S: StorageSlot + 'static> PersistenceAdapter<S> {
    /// Load the saved state into a new store, and keep saving it whenever it changes.
    ///
    /// This must be called from within a tokio runtime.
    pub async fn open_store(self, config: &WriterConfig) -> (TaskStore, WriterHandle) {
        let mut store = TaskStore::with_state(self.load().await);
        let handle = self.attach(&mut store, config);
        (store, handle)
    }

    /// Save the state of `store` after each of its changes, from a background task.
    ///
    /// This must be called from within a tokio runtime. See [`writer`] for details on how writes are scheduled.
    pub fn attach(self, store: &mut TaskStore, config: &WriterConfig) -> WriterHandle {
        writer::spawn(self, store, config.clone())
    }
}
