use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{Category, IntoDeadline, Task};
use crate::repository::{FuturePolicy, TaskRepository};
use crate::storage::TaskStore;

/// Owns the task repository and the store it is flushed to.
///
/// Every mutation goes through here; a change the store fails to save is
/// dropped, so memory and store never disagree.
pub struct Planner {
    repo: TaskRepository,
    store: Box<dyn TaskStore>,
    policy: FuturePolicy,
}

impl Planner {
    /// Loads tasks from `store`, seeding the repository if it has none.
    pub fn open(store: Box<dyn TaskStore>, policy: FuturePolicy) -> Result<Planner> {
        let repo = match store.load()? {
            Some(tasks) => TaskRepository::from_tasks(tasks)?,
            None => {
                tracing::info!("no stored tasks, starting from seed data");
                TaskRepository::seeded()
            }
        };
        Ok(Planner { repo, store, policy })
    }

    pub fn repository(&self) -> &TaskRepository {
        &self.repo
    }

    pub fn policy(&self) -> FuturePolicy {
        self.policy
    }

    pub fn get(&self, id: u64) -> Result<&Task> {
        self.repo.get(id).ok_or(Error::NotFound { id })
    }

    pub fn list(&self, category: Category, today: NaiveDate) -> Vec<&Task> {
        self.repo.list_by_category(category, today, self.policy)
    }

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
        let id = self.commit(|repo| repo.add_with_streak(name, category, deadline, streak))?;
        tracing::info!(id, %category, "task added");
        Ok(id)
    }

    /// Checks in a daily task. Returns whether its streak advanced.
    pub fn check_in(&mut self, id: u64, today: NaiveDate) -> Result<bool> {
        self.expect_category(id, Category::Daily)?;
        let advanced = self.commit(|repo| repo.check_in(id, today))?;
        if advanced {
            tracing::info!(id, %today, "checked in");
        } else {
            tracing::debug!(id, %today, "already checked in");
        }
        Ok(advanced)
    }

    /// Completes a temporary task.
    pub fn complete(&mut self, id: u64) -> Result<()> {
        self.expect_category(id, Category::Temporary)?;
        self.commit(|repo| repo.complete(id))?;
        tracing::info!(id, "task completed");
        Ok(())
    }

    /// Whether changes outlive the process.
    pub fn is_persistent(&self) -> bool {
        self.store.is_persistent()
    }

    fn expect_category(&self, id: u64, expected: Category) -> Result<()> {
        let task = self.get(id)?;
        if task.category() != expected {
            tracing::warn!(id, actual = %task.category(), %expected, "action rejected");
            return Err(Error::WrongCategory { id, expected });
        }
        Ok(())
    }

    /// Applies `change` to a copy of the repository and keeps the copy only
    /// once the store has saved it.
    fn commit<T>(&mut self, change: impl FnOnce(&mut TaskRepository) -> Result<T>) -> Result<T> {
        let mut next = self.repo.clone();
        let out = change(&mut next)?;
        if let Err(e) = self.store.save(next.tasks()) {
            tracing::warn!(error = %e, "save failed, change discarded");
            return Err(e);
        }
        self.repo = next;
        Ok(out)
    }
}
