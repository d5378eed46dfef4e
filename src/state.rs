//! The tasks of every date, as owned by a [`TaskStore`](crate::store::TaskStore)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::task::{Task, TaskId};

/// Maps each date key to the ordered sequence of its tasks.
///
/// Keys keep the order in which they first appeared, and tasks keep their creation order. \
/// A key that once held tasks stays present even after its last task has been removed.
///
/// This serializes into a JSON object such as `{"2025-02-14": [{"id": 1, "text": "Workout", "completed": false}]}`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskState {
    buckets: IndexMap<DateKey, Vec<Task>>,
}

impl TaskState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tasks of a date, or an empty slice if this date has no history
    pub fn tasks_for(&self, date_key: &str) -> &[Task] {
        self.buckets
            .get(date_key)
            .map(|tasks| tasks.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the task with the given id, if any
    pub fn task(&self, date_key: &str, id: TaskId) -> Option<&Task> {
        self.tasks_for(date_key).iter().find(|task| task.id() == id)
    }

    /// Whether this date key is known, even if it has no task left
    pub fn contains_date_key(&self, date_key: &str) -> bool {
        self.buckets.contains_key(date_key)
    }

    /// Every known date key, in the order they first appeared
    pub fn date_keys(&self) -> impl Iterator<Item = &DateKey> {
        self.buckets.keys()
    }

    /// Every date key and its tasks
    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &[Task])> {
        self.buckets.iter().map(|(key, tasks)| (key, tasks.as_slice()))
    }

    /// The number of known date keys
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// The number of tasks, all dates included
    pub fn task_count(&self) -> usize {
        self.buckets.values().map(|tasks| tasks.len()).sum()
    }

    /// The greatest task id, all dates included
    pub fn max_id(&self) -> Option<TaskId> {
        self.buckets
            .values()
            .flat_map(|tasks| tasks.iter().map(|task| task.id()))
            .max()
    }

    /// Returns the tasks of a date, creating an empty sequence if needed
    pub(crate) fn bucket_mut(&mut self, date_key: &str) -> &mut Vec<Task> {
        self.buckets.entry(date_key.to_string()).or_default()
    }

    pub(crate) fn existing_bucket_mut(&mut self, date_key: &str) -> Option<&mut Vec<Task>> {
        self.buckets.get_mut(date_key)
    }
}

/// Two states are equal when they have the same keys, in the same order, holding the same tasks, in the same order
impl PartialEq for TaskState {
    fn eq(&self, other: &Self) -> bool {
        self.buckets.len() == other.buckets.len()
            && self.buckets.iter().eq(other.buckets.iter())
    }
}
impl Eq for TaskState {}
