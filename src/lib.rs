//! This crate manages to-do tasks grouped by calendar date.
//!
//! Tasks are owned by a [`TaskStore`](store::TaskStore), that maps date keys (`YYYY-MM-DD` strings, see [`date_key`]) to ordered lists of tasks.
//! The store lets you add, toggle and remove tasks, and notifies its observers after each change.
//!
//! The state of a store can be saved to a [`StorageSlot`](traits::StorageSlot) (e.g. a [`FileSlot`](slot::FileSlot)) using a
//! [`PersistenceAdapter`](persistence::PersistenceAdapter). \
//! Once attached to a store, the adapter writes a snapshot of the whole state after every change, from a background task.

pub mod traits;

mod task;
pub use task::{Task, TaskId};
pub mod date_key;
pub use date_key::DateKey;
pub mod state;
pub use state::TaskState;
pub mod store;
pub use store::TaskStore;

pub mod slot;
pub mod persistence;
pub use persistence::PersistenceAdapter;

pub mod calendar;
pub mod config;
pub mod utils;
