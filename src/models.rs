use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::deadline::{days_between, DeadlineStatus};
use crate::error::ValidationError;

/// Which view a task lives in and which actions apply to it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Habits checked in once per day.
    #[serde(rename = "daily")]
    Daily,
    /// Milestones counted down to.
    #[serde(rename = "future")]
    Future,
    /// One-shot to-dos, hidden once completed.
    #[serde(rename = "temp", alias = "temporary")]
    Temporary,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Daily, Category::Future, Category::Temporary];

    /// Next category in view order, wrapping around.
    pub fn next(self) -> Category {
        match self {
            Category::Daily => Category::Future,
            Category::Future => Category::Temporary,
            Category::Temporary => Category::Daily,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Daily => "Daily",
            Category::Future => "Future",
            Category::Temporary => "Temporary",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Daily => "daily",
            Category::Future => "future",
            Category::Temporary => "temporary",
        };
        f.write_str(s)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "d" => Ok(Category::Daily),
            "future" | "f" => Ok(Category::Future),
            "temp" | "temporary" | "t" => Ok(Category::Temporary),
            other => Err(format!(
                "unknown category '{}'. Supported: daily, future, temp.",
                other
            )),
        }
    }
}

/// Anything a deadline can be taken from. Timestamps lose their time of day.
pub trait IntoDeadline {
    fn into_deadline(self) -> Result<NaiveDate, ValidationError>;
}

impl IntoDeadline for NaiveDate {
    fn into_deadline(self) -> Result<NaiveDate, ValidationError> {
        Ok(self)
    }
}

impl IntoDeadline for NaiveDateTime {
    fn into_deadline(self) -> Result<NaiveDate, ValidationError> {
        Ok(self.date())
    }
}

impl<Tz: TimeZone> IntoDeadline for DateTime<Tz> {
    fn into_deadline(self) -> Result<NaiveDate, ValidationError> {
        Ok(self.date_naive())
    }
}

impl IntoDeadline for &str {
    fn into_deadline(self) -> Result<NaiveDate, ValidationError> {
        NaiveDate::parse_from_str(self.trim(), "%Y-%m-%d").map_err(|_| {
            ValidationError::InvalidDate {
                input: self.to_string(),
            }
        })
    }
}

impl IntoDeadline for String {
    fn into_deadline(self) -> Result<NaiveDate, ValidationError> {
        self.as_str().into_deadline()
    }
}

/// A single tracked task.
///
/// Fields are private so that the category stays fixed and the streak only
/// moves through [`Task::check_in`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: u64,
    name: String,
    category: Category,
    deadline: NaiveDate,
    #[serde(default)]
    streak: u32,
    #[serde(default)]
    last_check_in: Option<NaiveDate>,
    #[serde(default)]
    completed: bool,
}

impl Task {
    /// Creates a task with no streak. The id is assigned by the repository.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        deadline: impl IntoDeadline,
    ) -> Result<Task, ValidationError> {
        Task::with_streak(name, category, deadline, 0)
    }

    /// Creates a task starting from an existing streak, as seed data does.
    pub fn with_streak(
        name: impl Into<String>,
        category: Category,
        deadline: impl IntoDeadline,
        streak: u32,
    ) -> Result<Task, ValidationError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Task {
            id: 0,
            name: name.to_string(),
            category,
            deadline: deadline.into_deadline()?,
            streak,
            last_check_in: None,
            completed: false,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn last_check_in(&self) -> Option<NaiveDate> {
        self.last_check_in
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whole days from `today` until the deadline; negative once passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        days_between(today, self.deadline)
    }

    pub fn deadline_status(&self, today: NaiveDate) -> DeadlineStatus {
        DeadlineStatus::from_days(self.days_remaining(today))
    }

    /// Records a check-in for `today`.
    ///
    /// Returns `true` when the streak advanced. A second check-in on the same
    /// date, one dated before the last recorded check-in, or one on a streak
    /// already at `u32::MAX` changes nothing.
    pub fn check_in(&mut self, today: NaiveDate) -> bool {
        match self.last_check_in {
            Some(last) if last >= today => false,
            _ => match self.streak.checked_add(1) {
                Some(streak) => {
                    self.streak = streak;
                    self.last_check_in = Some(today);
                    true
                }
                None => false,
            },
        }
    }

    pub fn checked_in_on(&self, today: NaiveDate) -> bool {
        self.last_check_in == Some(today)
    }

    /// Latches the task as completed. Calling it again is a no-op.
    pub fn complete(&mut self) {
        self.completed = true;
    }
}
