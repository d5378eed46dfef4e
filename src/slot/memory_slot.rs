use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::traits::StorageSlot;
use super::behaviour::SlotBehaviour;

/// A storage slot that lives in memory.
///
/// Clones share the same content, so that a test can keep a handle on the slot it gave away.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    content: Option<String>,
    writes: usize,
    behaviour: SlotBehaviour,
}

impl MemorySlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already stores a document
    pub fn with_content(content: impl Into<String>) -> Self {
        let slot = Self::new();
        slot.lock().content = Some(content.into());
        slot
    }

    /// The stored document, if any
    pub fn content(&self) -> Option<String> {
        self.lock().content.clone()
    }

    /// How many writes have succeeded so far
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Change how this slot will behave from now on
    pub fn set_behaviour(&self, behaviour: SlotBehaviour) {
        self.lock().behaviour = behaviour;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StorageSlot for MemorySlot {
    async fn read(&self) -> Result<Option<String>, Box<dyn Error>> {
        let mut inner = self.lock();
        inner.behaviour.can_read()?;
        Ok(inner.content.clone())
    }

    async fn write(&self, content: String) -> Result<(), Box<dyn Error>> {
        let mut inner = self.lock();
        inner.behaviour.can_write()?;
        inner.content = Some(content);
        inner.writes += 1;
        Ok(())
    }
}
