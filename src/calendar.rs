//! Month view of a store, telling which days have tasks

use std::error::Error;

use bitflags::bitflags;
use chrono::{Datelike, NaiveDate};

use crate::date_key::{self, DateKey};
use crate::store::TaskStore;

bitflags! {
    /// How a day should be shown in a calendar
    pub struct DayMarks: u8 {
        /// This day has had tasks, even if they have all been removed since
        const HAS_HISTORY = 1;
        /// This day currently has tasks
        const HAS_TASKS = 2;
        /// This day has tasks, and they are all completed
        const ALL_COMPLETED = 4;
        /// This is the day the user is looking at
        const SELECTED = 8;
    }
}

/// Returns every day of a month, in order
pub fn days_in_month(year: i32, month: u32) -> Result<Vec<NaiveDate>, Box<dyn Error>> {
    let mut day = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| format!("Invalid month {}-{:02}", year, month))?;

    let mut days = Vec::new();
    while day.month() == month {
        days.push(day);
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    Ok(days)
}

/// Returns the marks of every day of a month, in order
pub fn month_marks(store: &TaskStore, year: i32, month: u32, selected: Option<&str>) -> Result<Vec<(DateKey, DayMarks)>, Box<dyn Error>> {
    let marks = days_in_month(year, month)?
        .into_iter()
        .map(date_key::from_date)
        .map(|key| {
            let marks = day_marks(store, &key, selected);
            (key, marks)
        })
        .collect();
    Ok(marks)
}

/// Returns the marks of a single day
pub fn day_marks(store: &TaskStore, date_key: &str, selected: Option<&str>) -> DayMarks {
    let mut marks = DayMarks::empty();

    if store.has_date_key(date_key) {
        marks.insert(DayMarks::HAS_HISTORY);
    }
    let tasks = store.tasks_for(date_key);
    if tasks.is_empty() == false {
        marks.insert(DayMarks::HAS_TASKS);
        if tasks.iter().all(|task| task.completed()) {
            marks.insert(DayMarks::ALL_COMPLETED);
        }
    }
    if selected == Some(date_key) {
        marks.insert(DayMarks::SELECTED);
    }
    marks
}
