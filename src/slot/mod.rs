//! Storage slots the state of a store can be persisted to

mod behaviour;
mod file_slot;
mod memory_slot;

pub use behaviour::SlotBehaviour;
pub use file_slot::FileSlot;
pub use memory_slot::MemorySlot;
