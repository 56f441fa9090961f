use chrono::NaiveDate;
use planpass::commands::*;
use planpass::config::Config;
use planpass::error::Error;
use planpass::models::{Category, Task};
use planpass::planner::Planner;
use planpass::repository::FuturePolicy;
use planpass::storage::{JsonFileStore, MemoryStore, TaskStore};
use std::cell::Cell;
use std::rc::Rc;
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn with_test_db<F>(f: F)
where
    F: FnOnce(&TempDir, JsonFileStore),
{
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("data").join("tasks.json"));
    f(&dir, store);
}

fn open(store: &JsonFileStore) -> Planner {
    Planner::open(Box::new(store.clone()), FuturePolicy::default()).unwrap()
}

#[test]
fn test_memory_planner_starts_from_seed() {
    let planner = Planner::open(Box::new(MemoryStore), FuturePolicy::default()).unwrap();
    assert_eq!(planner.repository().len(), 2);
}

#[test]
fn test_missing_file_loads_as_none() {
    with_test_db(|_dir, store| {
        assert!(store.load().unwrap().is_none());
    });
}

#[test]
fn test_add_and_reload() {
    with_test_db(|_dir, store| {
        let today = date("2025-06-01");
        let mut planner = open(&store);
        let id = cmd_add(&mut planner, "Water plants".into(), Category::Temporary, Some("2025-06-03".into()), None, today, true).unwrap();
        assert_eq!(id, 3);

        let planner = open(&store);
        let task = planner.get(id).unwrap();
        assert_eq!(task.name(), "Water plants");
        assert_eq!(task.deadline(), date("2025-06-03"));
        assert_eq!(planner.repository().len(), 3);
    });
}

#[test]
fn test_add_defaults_due_to_today() {
    with_test_db(|_dir, store| {
        let today = date("2025-06-01");
        let mut planner = open(&store);
        let id = cmd_add(&mut planner, "Meditate".into(), Category::Daily, None, Some(2), today, true).unwrap();
        let task = planner.get(id).unwrap();
        assert_eq!(task.deadline(), today);
        assert_eq!(task.streak(), 2);
    });
}

#[test]
fn test_add_rejects_empty_name_and_bad_date() {
    with_test_db(|_dir, store| {
        let today = date("2025-06-01");
        let mut planner = open(&store);
        assert!(matches!(
            cmd_add(&mut planner, "".into(), Category::Daily, None, None, today, true),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            cmd_add(&mut planner, "Trip".into(), Category::Future, Some("2025/13/01".into()), None, today, true),
            Err(Error::Validation(_))
        ));
        assert_eq!(planner.repository().len(), 2);
    });
}

#[test]
fn test_check_in_persists_streak() {
    with_test_db(|_dir, store| {
        let today = date("2025-06-01");
        let mut planner = open(&store);
        assert!(cmd_check_in(&mut planner, 1, today, true).unwrap());
        assert!(!cmd_check_in(&mut planner, 1, today, true).unwrap());

        let planner = open(&store);
        let vocab = planner.get(1).unwrap();
        assert_eq!(vocab.streak(), 6);
        assert_eq!(vocab.last_check_in(), Some(today));
    });
}

#[test]
fn test_complete_hides_temporary_task() {
    with_test_db(|_dir, store| {
        let today = date("2025-06-01");
        let mut planner = open(&store);
        let id = planner.add("Pick up parcel", Category::Temporary, today).unwrap();
        cmd_complete(&mut planner, id, true).unwrap();
        cmd_complete(&mut planner, id, true).unwrap();

        let planner = open(&store);
        assert!(planner.get(id).unwrap().is_completed());
        assert!(planner.list(Category::Temporary, today).is_empty());
    });
}

#[test]
fn test_actions_check_category() {
    with_test_db(|_dir, store| {
        let today = date("2025-06-01");
        let mut planner = open(&store);
        assert!(matches!(
            cmd_check_in(&mut planner, 2, today, true),
            Err(Error::WrongCategory { id: 2, expected: Category::Daily })
        ));
        assert!(matches!(
            cmd_complete(&mut planner, 1, true),
            Err(Error::WrongCategory { id: 1, expected: Category::Temporary })
        ));
        assert!(matches!(
            cmd_check_in(&mut planner, 42, today, true),
            Err(Error::NotFound { id: 42 })
        ));
    });
}

#[test]
fn test_corrupt_file_is_an_error() {
    with_test_db(|dir, store| {
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(store.path(), "not json").unwrap();
        let res = Planner::open(Box::new(store.clone()), FuturePolicy::default());
        assert!(matches!(res, Err(Error::Json(_))));
    });
}

#[test]
fn test_config_overrides() {
    let config = Config::default().with_overrides(Some("a.json".into()), false, Some(FuturePolicy::HidePassed));
    assert_eq!(config.db_path.as_deref(), Some(std::path::Path::new("a.json")));
    assert_eq!(config.future_policy, FuturePolicy::HidePassed);

    let config = config.with_overrides(None, true, None);
    assert!(config.db_path.is_none());
    assert_eq!(config.future_policy, FuturePolicy::HidePassed);
}

#[test]
fn test_planner_uses_future_policy() {
    let today = date("2025-06-01");
    let planner = Planner::open(Box::new(MemoryStore), FuturePolicy::HidePassed).unwrap();
    // seeded birthday (2025-05-20) has passed
    assert!(planner.list(Category::Future, today).is_empty());

    let planner = Planner::open(Box::new(MemoryStore), FuturePolicy::ShowOverdue).unwrap();
    let future = planner.list(Category::Future, today);
    assert_eq!(future.len(), 1);
    assert!(future[0].deadline_status(today).is_overdue());
}

/// Fails the first `failures` saves, then records how many succeed.
struct FlakyStore {
    failures: Rc<Cell<u32>>,
    saved: Rc<Cell<u32>>,
}

impl TaskStore for FlakyStore {
    fn load(&self) -> planpass::error::Result<Option<Vec<Task>>> {
        Ok(None)
    }

    fn save(&mut self, _tasks: &[Task]) -> planpass::error::Result<()> {
        if self.failures.get() > 0 {
            self.failures.set(self.failures.get() - 1);
            return Err(Error::Io(std::io::Error::other("disk full")));
        }
        self.saved.set(self.saved.get() + 1);
        Ok(())
    }
}

fn flaky_planner(failures: u32) -> (Planner, Rc<Cell<u32>>, Rc<Cell<u32>>) {
    let failures = Rc::new(Cell::new(failures));
    let saved = Rc::new(Cell::new(0));
    let store = FlakyStore { failures: failures.clone(), saved: saved.clone() };
    (Planner::open(Box::new(store), FuturePolicy::default()).unwrap(), failures, saved)
}

#[test]
fn test_failed_save_discards_check_in() {
    let today = date("2025-06-01");
    let (mut planner, _failures, saved) = flaky_planner(1);

    assert!(matches!(planner.check_in(1, today), Err(Error::Io(_))));
    assert_eq!(planner.get(1).unwrap().streak(), 5);
    assert_eq!(planner.get(1).unwrap().last_check_in(), None);

    assert!(planner.check_in(1, today).unwrap());
    assert_eq!(planner.get(1).unwrap().streak(), 6);
    assert_eq!(saved.get(), 1);
}

#[test]
fn test_failed_save_discards_add_and_complete() {
    let today = date("2025-06-01");
    let (mut planner, failures, saved) = flaky_planner(1);

    assert!(planner.add("Groceries", Category::Temporary, today).is_err());
    assert_eq!(planner.repository().len(), 2);

    let id = planner.add("Groceries", Category::Temporary, today).unwrap();
    assert_eq!(id, 3);
    assert_eq!(saved.get(), 1);

    failures.set(1);
    assert!(planner.complete(id).is_err());
    assert!(!planner.get(id).unwrap().is_completed());

    planner.complete(id).unwrap();
    assert!(planner.get(id).unwrap().is_completed());
    assert_eq!(saved.get(), 2);
}

#[test]
fn test_invalid_stored_records_are_rejected() {
    with_test_db(|_dir, store| {
        let write = |json: &str| {
            std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            std::fs::write(store.path(), json).unwrap();
        };
        let open_err = || Planner::open(Box::new(store.clone()), FuturePolicy::default()).err();

        write(r#"[{"id":1,"name":"","category":"daily","deadline":"2025-12-31"}]"#);
        assert!(matches!(open_err(), Some(Error::InvalidRecord { id: 1, .. })));

        write(r#"[{"id":1,"name":"a","category":"daily","deadline":"2025-12-31"},
                  {"id":1,"name":"dup","category":"temp","deadline":"2025-12-31"}]"#);
        assert!(matches!(open_err(), Some(Error::InvalidRecord { id: 1, .. })));

        write(r#"[{"id":0,"name":"a","category":"daily","deadline":"2025-12-31"}]"#);
        assert!(matches!(open_err(), Some(Error::InvalidRecord { id: 0, .. })));

        write(r#"[{"id":18446744073709551615,"name":"a","category":"future","deadline":"2025-12-31"}]"#);
        assert!(matches!(open_err(), Some(Error::IdsExhausted)));
    });
}

#[test]
fn test_stored_full_streak_does_not_wrap() {
    with_test_db(|_dir, store| {
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"[{"id":1,"name":"Run","category":"daily","deadline":"2025-12-31","streak":4294967295}]"#,
        )
        .unwrap();
        let mut planner = open(&store);
        assert!(!planner.check_in(1, date("2025-06-01")).unwrap());
        assert_eq!(planner.get(1).unwrap().streak(), u32::MAX);
    });
}

#[test]
fn test_only_file_store_is_persistent() {
    let planner = Planner::open(Box::new(MemoryStore), FuturePolicy::default()).unwrap();
    assert!(!planner.is_persistent());
    with_test_db(|_dir, store| {
        assert!(open(&store).is_persistent());
    });
}

