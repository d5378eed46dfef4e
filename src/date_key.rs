//! Date keys, i.e. canonical `YYYY-MM-DD` strings used to group tasks
//!
//! The store does not validate the keys it is given. Callers are expected to build them with the helpers of this module.

use std::error::Error;

use chrono::{Datelike, Local, NaiveDate};

/// A canonical `YYYY-MM-DD` date string
pub type DateKey = String;

/// The `chrono` format of a [`DateKey`]
pub const FORMAT: &str = "%Y-%m-%d";

/// Build the date key of a given day
pub fn from_date(date: NaiveDate) -> DateKey {
    date.format(FORMAT).to_string()
}

/// The date key of the current (local) day
pub fn today() -> DateKey {
    from_date(Local::now().naive_local().date())
}

/// Parse a date key.
///
/// Only the canonical form is accepted: `2025-3-1` is refused, `2025-03-01` is not.
pub fn parse(key: &str) -> Result<NaiveDate, Box<dyn Error>> {
    let date = NaiveDate::parse_from_str(key, FORMAT)
        .map_err(|err| format!("Invalid date {:?}: {}", key, err))?;

    if from_date(date) != key {
        return Err(format!("Date {:?} is not in the canonical YYYY-MM-DD form", key).into());
    }
    Ok(date)
}

/// Whether `key` is a valid, canonical date key
pub fn is_canonical(key: &str) -> bool {
    parse(key).is_ok()
}

/// Parse a `YYYY-MM` month, and return its year and month number
pub fn parse_month(month: &str) -> Result<(i32, u32), Box<dyn Error>> {
    let first_day = parse(&format!("{}-01", month))
        .map_err(|_| format!("Invalid month {:?}, expected YYYY-MM", month))?;
    Ok((first_day.year(), first_day.month()))
}
