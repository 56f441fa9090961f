use chrono::{Duration, Months, NaiveDate};
use ratatui::widgets::TableState;

use crate::error::Error;
use crate::models::{Category, IntoDeadline};
use crate::planner::Planner;

#[derive(Debug, PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
}

/// Field of the add dialog that currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Category,
    Deadline,
}

/// Range the add dialog lets a deadline be picked from.
pub fn deadline_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let earliest = NaiveDate::from_ymd_opt(2023, 10, 1).unwrap_or(NaiveDate::MIN);
    let latest = NaiveDate::from_ymd_opt(2030, 10, 1).unwrap_or(NaiveDate::MAX);
    (earliest.min(today), latest.max(today))
}

/// In-progress values of the add dialog. Dropped on submit or cancel.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub name: String,
    pub category: Category,
    pub deadline: NaiveDate,
    /// What the deadline field shows; may be a partly typed date.
    pub deadline_text: String,
    pub field: DraftField,
    pub error: Option<String>,
    earliest: NaiveDate,
    latest: NaiveDate,
}

impl TaskDraft {
    pub fn new(category: Category, today: NaiveDate) -> TaskDraft {
        let (earliest, latest) = deadline_bounds(today);
        TaskDraft {
            name: String::new(),
            category,
            deadline: today,
            deadline_text: today.to_string(),
            field: DraftField::Name,
            error: None,
            earliest,
            latest,
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            DraftField::Name => DraftField::Category,
            DraftField::Category => DraftField::Deadline,
            DraftField::Deadline => DraftField::Name,
        };
    }

    fn set_deadline(&mut self, date: NaiveDate) {
        let date = date.clamp(self.earliest, self.latest);
        self.deadline = date;
        self.deadline_text = date.to_string();
        self.error = None;
    }

    /// Moves the deadline by whole days, staying inside the pickable range.
    pub fn shift_deadline(&mut self, days: i64) {
        let moved = self.deadline.checked_add_signed(Duration::days(days));
        let edge = if days < 0 { self.earliest } else { self.latest };
        self.set_deadline(moved.unwrap_or(edge));
    }

    /// Moves the deadline by calendar months, staying inside the pickable range.
    pub fn shift_months(&mut self, months: i32) {
        let step = Months::new(months.unsigned_abs());
        let moved = if months < 0 {
            self.deadline.checked_sub_months(step)
        } else {
            self.deadline.checked_add_months(step)
        };
        let edge = if months < 0 { self.earliest } else { self.latest };
        self.set_deadline(moved.unwrap_or(edge));
    }

    /// Types into the deadline field. A complete date is applied at once.
    pub fn push_deadline_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || c == '-') || self.deadline_text.len() >= 10 {
            return;
        }
        self.deadline_text.push(c);
        self.error = None;
        if let Ok(date) = self.deadline_text.as_str().into_deadline() {
            if (self.earliest..=self.latest).contains(&date) {
                self.deadline = date;
            }
        }
    }

    pub fn pop_deadline_char(&mut self) {
        self.deadline_text.pop();
    }

    /// The deadline as typed, checked against the pickable range.
    pub fn resolve_deadline(&self) -> Result<NaiveDate, String> {
        let date = self
            .deadline_text
            .as_str()
            .into_deadline()
            .map_err(|e| e.to_string())?;
        if !(self.earliest..=self.latest).contains(&date) {
            return Err(format!(
                "Deadline must be between {} and {}",
                self.earliest, self.latest
            ));
        }
        Ok(date)
    }
}

pub struct App {
    pub planner: Planner,
    pub view: Category,
    pub state: TableState,
    /// Task ids of the rendered rows, in display order.
    pub rows: Vec<u64>,
    pub input_mode: InputMode,
    pub draft: Option<TaskDraft>,
    /// Transient status line, cleared on the next key press.
    pub message: Option<String>,
    pub today: NaiveDate,
}

impl App {
    pub fn new(planner: Planner, today: NaiveDate) -> App {
        let mut app = App {
            planner,
            view: Category::Daily,
            state: TableState::default(),
            rows: Vec::new(),
            input_mode: InputMode::Normal,
            draft: None,
            message: None,
            today,
        };
        app.reload();
        app
    }

    /// Moves to a new date if the day rolled over while the UI was open.
    pub fn set_today(&mut self, today: NaiveDate) {
        if today != self.today {
            self.today = today;
            self.reload();
        }
    }

    /// Recomputes the rows of the current view and keeps the selection in range.
    pub fn reload(&mut self) {
        self.rows = self
            .planner
            .list(self.view, self.today)
            .iter()
            .map(|t| t.id())
            .collect();

        if self.rows.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.rows.len() {
                self.state.select(Some(self.rows.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.rows.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.rows.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn switch_view(&mut self, view: Category) {
        if self.view != view {
            self.view = view;
            self.state.select(None);
            self.reload();
        }
    }

    pub fn next_view(&mut self) {
        self.switch_view(self.view.next());
    }

    pub fn previous_view(&mut self) {
        self.switch_view(self.view.next().next());
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.state.selected().and_then(|i| self.rows.get(i).copied())
    }

    /// Runs the view's action on the selected row.
    pub fn activate_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.act_on(id);
        }
    }

    /// Single handler for row actions: check-in on daily rows, completion on
    /// temporary rows. Future rows have no action.
    pub fn act_on(&mut self, id: u64) {
        let result = match self.view {
            Category::Daily => self.planner.check_in(id, self.today).map(|advanced| {
                if advanced {
                    "Checked in".to_string()
                } else {
                    "Already checked in today".to_string()
                }
            }),
            Category::Temporary => self
                .planner
                .complete(id)
                .map(|()| "Task completed".to_string()),
            Category::Future => return,
        };
        self.message = Some(match result {
            Ok(msg) => msg,
            Err(e) => e.to_string(),
        });
        self.reload();
    }

    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.draft = Some(TaskDraft::new(self.view, self.today));
    }

    pub fn cancel_add(&mut self) {
        self.input_mode = InputMode::Normal;
        self.draft = None;
    }

    pub fn draft_mut(&mut self) -> Option<&mut TaskDraft> {
        self.draft.as_mut()
    }

    /// Validates and adds the drafted task.
    ///
    /// On a validation error the dialog stays open with the error shown.
    pub fn submit_add(&mut self) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        let deadline = match draft.resolve_deadline() {
            Ok(d) => d,
            Err(msg) => {
                draft.error = Some(msg);
                draft.field = DraftField::Deadline;
                return;
            }
        };
        match self.planner.add(draft.name.clone(), draft.category, deadline) {
            Ok(_) => {
                let category = draft.category;
                self.draft = None;
                self.input_mode = InputMode::Normal;
                self.message = Some("Task added".to_string());
                self.switch_view(category);
                self.reload();
            }
            Err(Error::Validation(e)) => {
                draft.error = Some(e.to_string());
                draft.field = DraftField::Name;
            }
            Err(e) => {
                self.message = Some(e.to_string());
                self.cancel_add();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::FuturePolicy;
    use crate::storage::MemoryStore;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn app_on(today: &str) -> App {
        let planner = Planner::open(Box::new(MemoryStore), FuturePolicy::default()).unwrap();
        App::new(planner, date(today))
    }

    #[test]
    fn empty_name_keeps_dialog_open() {
        let mut app = app_on("2025-06-01");
        app.start_add();
        app.draft_mut().unwrap().name = "   ".into();
        app.submit_add();

        assert_eq!(app.input_mode, InputMode::Adding);
        let draft = app.draft.as_ref().unwrap();
        assert_eq!(draft.error.as_deref(), Some("Name cannot be empty"));
        assert_eq!(app.planner.repository().len(), 2);
    }

    #[test]
    fn submit_adds_task_and_switches_view() {
        let mut app = app_on("2025-06-01");
        app.start_add();
        {
            let draft = app.draft_mut().unwrap();
            draft.name = "Buy milk".into();
            draft.category = Category::Temporary;
            draft.shift_deadline(2);
        }
        app.submit_add();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.draft.is_none());
        assert_eq!(app.view, Category::Temporary);
        let id = app.selected_id().unwrap();
        let task = app.planner.get(id).unwrap();
        assert_eq!(task.name(), "Buy milk");
        assert_eq!(task.deadline(), date("2025-06-03"));
    }

    #[test]
    fn cancel_discards_draft() {
        let mut app = app_on("2025-06-01");
        app.start_add();
        app.draft_mut().unwrap().name = "Half typed".into();
        app.cancel_add();
        app.start_add();
        assert_eq!(app.draft.as_ref().unwrap().name, "");
    }

    #[test]
    fn space_on_daily_row_checks_in_once() {
        let mut app = app_on("2025-06-01");
        assert_eq!(app.view, Category::Daily);
        let id = app.selected_id().unwrap();

        app.activate_selected();
        assert_eq!(app.message.as_deref(), Some("Checked in"));
        assert_eq!(app.planner.get(id).unwrap().streak(), 6);

        app.activate_selected();
        assert_eq!(app.message.as_deref(), Some("Already checked in today"));
        assert_eq!(app.planner.get(id).unwrap().streak(), 6);
    }

    #[test]
    fn completed_temporary_row_disappears() {
        let mut app = app_on("2025-06-01");
        app.switch_view(Category::Temporary);
        assert!(app.rows.is_empty());

        let id = app.planner.add("Call plumber", Category::Temporary, date("2025-06-02")).unwrap();
        app.reload();
        assert_eq!(app.rows, vec![id]);

        app.activate_selected();
        assert!(app.rows.is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn views_cycle_both_ways() {
        let mut app = app_on("2025-06-01");
        app.next_view();
        assert_eq!(app.view, Category::Future);
        app.previous_view();
        app.previous_view();
        assert_eq!(app.view, Category::Temporary);
    }

    #[test]
    fn typed_deadline_is_used_on_submit() {
        let mut app = app_on("2025-06-01");
        app.start_add();
        {
            let draft = app.draft_mut().unwrap();
            draft.name = "Graduation".into();
            draft.category = Category::Future;
            draft.deadline_text.clear();
            for c in "2027-07-01".chars() {
                draft.push_deadline_char(c);
            }
            assert_eq!(draft.deadline, date("2027-07-01"));
        }
        app.submit_add();

        let id = app.selected_id().unwrap();
        assert_eq!(app.planner.get(id).unwrap().deadline(), date("2027-07-01"));
    }

    #[test]
    fn bad_or_out_of_range_deadline_keeps_dialog_open() {
        let mut app = app_on("2025-06-01");
        app.start_add();
        {
            let draft = app.draft_mut().unwrap();
            draft.name = "Trip".into();
            draft.deadline_text = "2025-13".into();
        }
        app.submit_add();
        let draft = app.draft.as_ref().unwrap();
        assert_eq!(draft.field, DraftField::Deadline);
        assert!(draft.error.as_deref().unwrap().starts_with("Invalid date"));

        app.draft_mut().unwrap().deadline_text = "2040-01-01".into();
        app.submit_add();
        assert_eq!(app.input_mode, InputMode::Adding);
        assert_eq!(
            app.draft.as_ref().unwrap().error.as_deref(),
            Some("Deadline must be between 2023-10-01 and 2030-10-01")
        );
        assert_eq!(app.planner.repository().len(), 2);
    }

    #[test]
    fn month_steps_stay_in_range() {
        let mut draft = TaskDraft::new(Category::Future, date("2025-06-01"));
        draft.shift_months(24);
        assert_eq!(draft.deadline, date("2027-06-01"));
        assert_eq!(draft.deadline_text, "2027-06-01");

        draft.shift_months(120);
        assert_eq!(draft.deadline, date("2030-10-01"));
        draft.shift_deadline(1);
        assert_eq!(draft.deadline, date("2030-10-01"));

        draft.shift_deadline(-i64::from(i32::MAX));
        assert_eq!(draft.deadline, date("2023-10-01"));
    }

    #[test]
    fn rollover_checks_in_for_the_new_day() {
        let mut app = app_on("2025-06-01");
        let id = app.selected_id().unwrap();
        app.activate_selected();
        assert_eq!(app.planner.get(id).unwrap().streak(), 6);

        app.set_today(date("2025-06-02"));
        app.activate_selected();
        assert_eq!(app.message.as_deref(), Some("Checked in"));
        let task = app.planner.get(id).unwrap();
        assert_eq!(task.streak(), 7);
        assert_eq!(task.last_check_in(), Some(date("2025-06-02")));
    }
}
