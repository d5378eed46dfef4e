//! Some utility functions

use crate::calendar::DayMarks;
use crate::date_key::DateKey;
use crate::state::TaskState;
use crate::task::Task;

/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    println!("    {} {}\t{}", completion, task.text(), task.id());
}

/// Pretty-prints the tasks of a single date
pub fn print_tasks_for(date_key: &str, tasks: &[Task]) {
    println!("Tasks for {}", date_key);
    if tasks.is_empty() {
        println!("    (no task)");
    }
    for task in tasks {
        print_task(task);
    }
}

/// A debug utility that pretty-prints every date of a state
pub fn print_state(state: &TaskState) {
    for (date_key, tasks) in state.iter() {
        print_tasks_for(date_key, tasks);
    }
}

/// Pretty-prints the marks of a month, one day per line
pub fn print_month(marks: &[(DateKey, DayMarks)]) {
    for (date_key, day) in marks {
        let tasks = if day.contains(DayMarks::ALL_COMPLETED) {
            "✓"
        } else if day.contains(DayMarks::HAS_TASKS) {
            "•"
        } else if day.contains(DayMarks::HAS_HISTORY) {
            "·"
        } else {
            " "
        };
        let selected = if day.contains(DayMarks::SELECTED) { ">" } else { " " };
        println!("{}{} {}", selected, tasks, date_key);
    }
}
