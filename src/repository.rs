use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{Category, IntoDeadline, Task};

/// Whether the future list keeps milestones whose date has already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FuturePolicy {
    /// Passed milestones stay listed and render as overdue.
    #[default]
    ShowOverdue,
    /// Milestones before today are dropped from the list.
    HidePassed,
}

impl FromStr for FuturePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "show-overdue" | "show" => Ok(FuturePolicy::ShowOverdue),
            "hide-passed" | "hide" => Ok(FuturePolicy::HidePassed),
            other => Err(format!(
                "unknown future policy '{}'. Supported: show-overdue, hide-passed.",
                other
            )),
        }
    }
}

impl fmt::Display for FuturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuturePolicy::ShowOverdue => f.write_str("show-overdue"),
            FuturePolicy::HidePassed => f.write_str("hide-passed"),
        }
    }
}

/// Ordered, append-only collection of tasks. Tasks are addressed by id.
#[derive(Debug, Clone, Default)]
pub struct TaskRepository {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskRepository {
    pub fn new() -> TaskRepository {
        TaskRepository {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// The starter data used when nothing has been stored yet.
    pub fn seeded() -> TaskRepository {
        let mut repo = TaskRepository::new();
        let seeds = [
            Task::with_streak("Vocabulary", Category::Daily, "2025-12-31", 5),
            Task::new("Mom's birthday", Category::Future, "2025-05-20"),
        ];
        for seed in seeds.into_iter().flatten() {
            // ids 1 and 2 on a fresh repository
            let _ = repo.push(seed);
        }
        repo
    }

    /// Rebuilds a repository from stored records, keeping their ids.
    ///
    /// Records are checked the way new tasks are: names must be non-empty and
    /// ids must be non-zero and unique.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<TaskRepository> {
        let mut seen = HashSet::new();
        for t in &tasks {
            let id = t.id();
            if id == 0 {
                return Err(Error::InvalidRecord { id, reason: "id must be non-zero" });
            }
            if !seen.insert(id) {
                return Err(Error::InvalidRecord { id, reason: "duplicate id" });
            }
            if t.name().trim().is_empty() {
                return Err(Error::InvalidRecord { id, reason: "name is empty" });
            }
        }
        let max_id = tasks.iter().map(|t| t.id()).max().unwrap_or(0);
        let next_id = max_id.checked_add(1).ok_or(Error::IdsExhausted)?;
        Ok(TaskRepository { tasks, next_id })
    }

    /// Validates and appends a new task, returning its id.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        category: Category,
        deadline: impl IntoDeadline,
    ) -> Result<u64> {
        self.add_with_streak(name, category, deadline, 0)
    }

    pub fn add_with_streak(
        &mut self,
        name: impl Into<String>,
        category: Category,
        deadline: impl IntoDeadline,
        streak: u32,
    ) -> Result<u64> {
        let task = Task::with_streak(name, category, deadline, streak)?;
        self.push(task)
    }

    fn push(&mut self, mut task: Task) -> Result<u64> {
        let id = self.next_id.max(1);
        let next_id = id.checked_add(1).ok_or(Error::IdsExhausted)?;
        task.set_id(id);
        self.tasks.push(task);
        self.next_id = next_id;
        Ok(id)
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(Error::NotFound { id })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Checks in the task with `id`. Returns whether its streak advanced.
    pub fn check_in(&mut self, id: u64, today: NaiveDate) -> Result<bool> {
        Ok(self.get_mut(id)?.check_in(today))
    }

    pub fn complete(&mut self, id: u64) -> Result<()> {
        self.get_mut(id)?.complete();
        Ok(())
    }

    /// Tasks shown in the view for `category`.
    ///
    /// Temporary tasks drop out once completed. Future tasks come soonest
    /// first; ties keep insertion order.
    pub fn list_by_category(
        &self,
        category: Category,
        today: NaiveDate,
        policy: FuturePolicy,
    ) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.category() == category)
            .collect();
        match category {
            Category::Daily => {}
            Category::Temporary => tasks.retain(|t| !t.is_completed()),
            Category::Future => {
                if policy == FuturePolicy::HidePassed {
                    tasks.retain(|t| t.days_remaining(today) >= 0);
                }
                tasks.sort_by_key(|t| t.days_remaining(today));
            }
        }
        tasks
    }
}
