use std::fmt;

use chrono::{Local, NaiveDate};

/// The current local calendar date.
///
/// Everything deadline-related takes `today` as a parameter; this is the one
/// place that reads the clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// How a deadline relates to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    /// Passed this many days ago (always at least 1).
    Overdue(u64),
    DueToday,
    /// Due in this many days (always at least 1).
    Upcoming(u64),
}

/// Display emphasis for a deadline, independent of any colour palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Alert,
    Warning,
    Calm,
}

impl DeadlineStatus {
    pub fn from_days(days: i64) -> DeadlineStatus {
        if days < 0 {
            DeadlineStatus::Overdue(days.unsigned_abs())
        } else if days == 0 {
            DeadlineStatus::DueToday
        } else {
            DeadlineStatus::Upcoming(days.unsigned_abs())
        }
    }

    pub fn emphasis(self) -> Emphasis {
        match self {
            DeadlineStatus::Overdue(_) => Emphasis::Alert,
            DeadlineStatus::DueToday => Emphasis::Warning,
            DeadlineStatus::Upcoming(_) => Emphasis::Calm,
        }
    }

    pub fn is_overdue(self) -> bool {
        matches!(self, DeadlineStatus::Overdue(_))
    }
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineStatus::Overdue(days) => write!(f, "{}d overdue", days),
            DeadlineStatus::DueToday => f.write_str("Today"),
            DeadlineStatus::Upcoming(days) => write!(f, "{}d left", days),
        }
    }
}
