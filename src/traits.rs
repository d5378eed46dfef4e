use std::error::Error;

use async_trait::async_trait;

/// A durable place where a single serialized document can be stored
#[async_trait]
pub trait StorageSlot: Send + Sync {
    /// Returns the stored document, or `None` if nothing has ever been stored
    async fn read(&self) -> Result<Option<String>, Box<dyn Error>>;

    /// Replace the stored document
    async fn write(&self, content: String) -> Result<(), Box<dyn Error>>;
}
