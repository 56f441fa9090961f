use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::deadline::Emphasis;
use crate::error::Result;
use crate::models::{Category, Task};
use crate::planner::Planner;

fn emphasis_color(emphasis: Emphasis) -> Color {
    match emphasis {
        Emphasis::Alert => Color::Red,
        Emphasis::Warning => Color::Yellow,
        Emphasis::Calm => Color::Green,
    }
}

/// Warns that a change will not outlive this process.
fn note_if_memory(planner: &Planner) {
    if !planner.is_persistent() {
        eprintln!("Note: tasks are kept in memory only. Use --db <path> or --persist to keep changes.");
    }
}

/// Adds a new task. `due` defaults to today when omitted.
pub fn cmd_add(
    planner: &mut Planner,
    name: String,
    category: Category,
    due: Option<String>,
    streak: Option<u32>,
    today: NaiveDate,
    silent: bool,
) -> Result<u64> {
    let id = match due {
        Some(d) => planner.add_with_streak(name, category, d, streak.unwrap_or(0))?,
        None => planner.add_with_streak(name, category, today, streak.unwrap_or(0))?,
    };
    if !silent {
        println!("Task added (id = {})", id);
        note_if_memory(planner);
    }
    Ok(id)
}

/// Checks in a daily task for `today`. Returns whether the streak advanced.
pub fn cmd_check_in(planner: &mut Planner, id: u64, today: NaiveDate, silent: bool) -> Result<bool> {
    let advanced = planner.check_in(id, today)?;
    if !silent {
        let streak = planner.get(id)?.streak();
        if advanced {
            println!("Checked in. Streak: {} day(s).", streak);
        } else {
            println!("Already checked in today. Streak: {} day(s).", streak);
        }
        note_if_memory(planner);
    }
    Ok(advanced)
}

/// Marks a temporary task as complete.
pub fn cmd_complete(planner: &mut Planner, id: u64, silent: bool) -> Result<()> {
    planner.complete(id)?;
    if !silent {
        println!("Task {} marked as complete.", id);
        note_if_memory(planner);
    }
    Ok(())
}

/// Prints the view for one category, or all three in order.
pub fn cmd_list(planner: &Planner, category: Option<Category>, today: NaiveDate) {
    let categories: Vec<Category> = match category {
        Some(c) => vec![c],
        None => Category::ALL.to_vec(),
    };
    for c in categories {
        let tasks = planner.list(c, today);
        println!("{}", c.label());
        if tasks.is_empty() {
            println!("No tasks found.");
            continue;
        }
        println!("{}", category_table(c, &tasks, today));
    }
}

fn category_table(category: Category, tasks: &[&Task], today: NaiveDate) -> Table {
    let last_header = match category {
        Category::Daily => "Streak",
        Category::Future => "Days To Go",
        Category::Temporary => "Status",
    };
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Deadline").add_attribute(Attribute::Bold),
            Cell::new("Time Left").add_attribute(Attribute::Bold),
            Cell::new(last_header).add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let status = t.deadline_status(today);
        let last = match category {
            Category::Daily => {
                let mark = if t.checked_in_on(today) { " ✓" } else { "" };
                format!("{}{}", t.streak(), mark)
            }
            Category::Future => t.days_remaining(today).to_string(),
            Category::Temporary => "Pending".to_string(),
        };
        table.add_row(vec![
            Cell::new(t.id()),
            Cell::new(t.name()),
            Cell::new(t.deadline()),
            Cell::new(status.to_string()).fg(emphasis_color(status.emphasis())),
            Cell::new(last),
        ]);
    }
    table
}

/// Prints the details of a single task.
pub fn cmd_show(planner: &Planner, id: u64, today: NaiveDate) -> Result<()> {
    let t = planner.get(id)?;
    let status = t.deadline_status(today);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Field", "Value"]);
    table.add_row(vec![Cell::new("ID"), Cell::new(t.id())]);
    table.add_row(vec![Cell::new("Name"), Cell::new(t.name())]);
    table.add_row(vec![Cell::new("Category"), Cell::new(t.category())]);
    table.add_row(vec![Cell::new("Deadline"), Cell::new(t.deadline())]);
    table.add_row(vec![
        Cell::new("Time Left"),
        Cell::new(status.to_string()).fg(emphasis_color(status.emphasis())),
    ]);
    match t.category() {
        Category::Daily => {
            table.add_row(vec![Cell::new("Streak"), Cell::new(t.streak())]);
            table.add_row(vec![
                Cell::new("Last Check-in"),
                Cell::new(
                    t.last_check_in()
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".into()),
                ),
            ]);
        }
        Category::Temporary => {
            let done = if t.is_completed() { "Done" } else { "Pending" };
            table.add_row(vec![Cell::new("Status"), Cell::new(done)]);
        }
        Category::Future => {}
    }
    println!("{table}");
    Ok(())
}
