//! To-do tasks

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies a task within the sequence of its date.
///
/// Ids are only guaranteed to be unique for a given date key, because lookups are always scoped by date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The id that immediately follows this one, or `None` if this is the greatest possible id
    pub fn checked_next(&self) -> Option<TaskId> {
        self.0.checked_add(1).map(TaskId)
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}


/// A to-do task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// The task id, unique within its date
    id: TaskId,
    /// The display text of the task.
    /// This is not validated: rejecting empty input is up to the caller
    text: String,
    /// Whether this task has been done
    completed: bool,
}

impl Task {
    /// Create a brand new, uncompleted task
    pub fn new(id: TaskId, text: String) -> Self {
        Self::new_with_parameters(id, text, false)
    }

    /// Create a task with every field set, e.g. when restoring a saved state
    pub fn new_with_parameters(id: TaskId, text: String, completed: bool) -> Self {
        Self { id, text, completed }
    }

    pub fn id(&self) -> TaskId      { self.id        }
    pub fn text(&self) -> &str      { &self.text     }
    pub fn completed(&self) -> bool { self.completed }

    /// Flip the completion flag, and return its new value
    pub(crate) fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_as_a_flat_record() {
        let task = Task::new_with_parameters(TaskId::from(1739491200000), "Workout".to_string(), true);
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(json, r#"{"id":1739491200000,"text":"Workout","completed":true}"#);

        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn toggle_flips_the_flag() {
        let mut task = Task::new(TaskId::from(3), "Buy milk".to_string());
        assert_eq!(task.completed(), false);
        assert_eq!(task.toggle(), true);
        assert_eq!(task.toggle(), false);
    }

    #[test]
    fn parse_task_id() {
        assert_eq!(" 42 ".parse::<TaskId>().unwrap(), TaskId::from(42));
        assert!("forty-two".parse::<TaskId>().is_err());
        assert_eq!(TaskId::from(41).checked_next(), Some(TaskId::from(42)));
        assert_eq!(TaskId::from(u64::MAX).checked_next(), None);
    }
}
