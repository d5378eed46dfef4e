//! The task store, that owns every task and notifies its observers whenever they change

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::date_key::DateKey;
use crate::state::TaskState;
use crate::task::{Task, TaskId};

/// Describes a change that has just been applied to a [`TaskStore`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    /// A task has been appended to a date
    Added { date_key: DateKey, id: TaskId },
    /// A task has been marked as completed or uncompleted
    Toggled { date_key: DateKey, id: TaskId, completed: bool },
    /// A task has been removed from a date
    Removed { date_key: DateKey, id: TaskId },
    /// A removal targeted an unknown date, which now exists with no task
    BucketCreated { date_key: DateKey },
}

impl Change {
    pub fn date_key(&self) -> &str {
        match self {
            Change::Added { date_key, .. } => date_key,
            Change::Toggled { date_key, .. } => date_key,
            Change::Removed { date_key, .. } => date_key,
            Change::BucketCreated { date_key } => date_key,
        }
    }
}

/// A callback run after every change of a store
pub type Observer = Box<dyn FnMut(&Change, &TaskState) + Send>;

/// Returned by [`TaskStore::subscribe`], so that observers can be removed later.
///
/// Subscription ids are unique across every store of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(0);


/// Generates task ids.
///
/// Ids are strictly increasing. They start at the current timestamp (in milliseconds),
/// or right after the greatest id already known if that is greater. \
/// Once the greatest possible id has been handed out, ids are picked among the ones that are still free in the target date.
#[derive(Clone, Debug)]
struct IdGenerator {
    next: Option<TaskId>,
}

impl IdGenerator {
    fn seeded_from(state: &TaskState) -> Self {
        let now = now_millis();
        let next = match state.max_id() {
            Some(max) if max >= now => max.checked_next(),
            _ => Some(now),
        };
        Self { next }
    }

    /// Returns an id that is not used by any of `siblings`
    fn next_id(&mut self, siblings: &[Task]) -> TaskId {
        if let Some(id) = self.next {
            self.next = id.checked_next();
            return id;
        }

        log::warn!("Task ids are exhausted, looking for a free one");
        let mut candidate = now_millis().as_u64();
        while siblings.iter().any(|task| task.id().as_u64() == candidate) {
            candidate = candidate.wrapping_add(1);
        }
        TaskId::from(candidate)
    }
}

fn now_millis() -> TaskId {
    TaskId::from(Utc::now().timestamp_millis().max(0) as u64)
}


/// Owns the tasks of every date.
///
/// Mutations are applied synchronously. Every mutation that actually changes the state
/// calls each observer (in subscription order) before returning. Lookup misses are no-ops, and notify nobody.
pub struct TaskStore {
    state: TaskState,
    ids: IdGenerator,

    observers: Vec<(SubscriptionId, Observer)>,
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_state(TaskState::default())
    }

    /// Create a store from a previously saved state
    pub fn with_state(state: TaskState) -> Self {
        let ids = IdGenerator::seeded_from(&state);
        Self {
            state,
            ids,
            observers: Vec::new(),
        }
    }

    /// Append a new, uncompleted task to a date, and return its id.
    ///
    /// This always succeeds. In particular, the text is not validated.
    pub fn add_task(&mut self, date_key: &str, text: impl Into<String>) -> TaskId {
        let tasks = self.state.bucket_mut(date_key);
        let id = self.ids.next_id(tasks);
        tasks.push(Task::new(id, text.into()));
        log::debug!("Added task {} to {}", id, date_key);

        self.notify(Change::Added { date_key: date_key.to_string(), id });
        id
    }

    /// Flip the completion status of a task.
    ///
    /// Returns `false` (and does nothing) in case there is no such task
    pub fn toggle_task(&mut self, date_key: &str, id: TaskId) -> bool {
        let task = self.state
            .existing_bucket_mut(date_key)
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id() == id));

        let completed = match task {
            None => {
                log::debug!("No task {} in {}, nothing to toggle", id, date_key);
                return false;
            },
            Some(task) => task.toggle(),
        };
        log::debug!("Task {} of {} is now {}", id, date_key, if completed { "completed" } else { "uncompleted" });

        self.notify(Change::Toggled { date_key: date_key.to_string(), id, completed });
        true
    }

    /// Remove a task from a date.
    ///
    /// Returns whether a task has been removed. \
    /// Removing the last task of a date keeps the date, with no task. \
    /// Removing from an unknown date creates this date, with no task.
    pub fn remove_task(&mut self, date_key: &str, id: TaskId) -> bool {
        let tasks = match self.state.existing_bucket_mut(date_key) {
            Some(tasks) => tasks,
            None => {
                self.state.bucket_mut(date_key);
                log::debug!("No task {} in unknown date {}, created an empty date", id, date_key);
                self.notify(Change::BucketCreated { date_key: date_key.to_string() });
                return false;
            },
        };
        let position = match tasks.iter().position(|task| task.id() == id) {
            Some(position) => position,
            None => {
                log::debug!("No task {} in {}, nothing to remove", id, date_key);
                return false;
            },
        };
        tasks.remove(position);
        log::debug!("Removed task {} from {}", id, date_key);

        self.notify(Change::Removed { date_key: date_key.to_string(), id });
        true
    }

    /// Returns the tasks of a date (in creation order), or an empty slice if there are none
    pub fn tasks_for(&self, date_key: &str) -> &[Task] {
        self.state.tasks_for(date_key)
    }

    /// Returns every date that has had tasks, including dates whose tasks have all been removed since
    pub fn date_keys(&self) -> impl Iterator<Item = &DateKey> {
        self.state.date_keys()
    }

    pub fn has_date_key(&self, date_key: &str) -> bool {
        self.state.contains_date_key(date_key)
    }

    /// Returns the current state
    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// Returns a copy of the current state
    pub fn snapshot(&self) -> TaskState {
        self.state.clone()
    }

    /// Register a callback that will be called after every change of this store
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Change, &TaskState) + Send + 'static,
    {
        let id = SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed));
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered (anymore)
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let count_before = self.observers.len();
        self.observers.retain(|(sub_id, _)| *sub_id != id);
        self.observers.len() != count_before
    }

    fn notify(&mut self, change: Change) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&change, &self.state);
        }
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for TaskStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}
