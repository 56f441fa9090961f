pub mod app;
pub mod ui;

use std::io;

use chrono::NaiveDate;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::deadline;
use crate::models::Category;
use crate::planner::Planner;
use app::{App, DraftField, InputMode};
use ui::ui;

pub fn run_tui(planner: Planner) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(planner, deadline::today());
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.set_today(deadline::today());
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // the read may have blocked across midnight
            if handle_key(app, key, deadline::today()) {
                return Ok(());
            }
        }
    }
}

/// Applies one key press as of `today`. Returns `true` when the user quits.
fn handle_key(app: &mut App, key: KeyEvent, today: NaiveDate) -> bool {
    app.set_today(today);
    match app.input_mode {
        InputMode::Normal => {
            app.message = None;
            match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_view(),
                KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_view(),
                KeyCode::Char('1') => app.switch_view(Category::Daily),
                KeyCode::Char('2') => app.switch_view(Category::Future),
                KeyCode::Char('3') => app.switch_view(Category::Temporary),
                KeyCode::Char(' ') | KeyCode::Enter => app.activate_selected(),
                KeyCode::Char('a') => app.start_add(),
                _ => {}
            }
        }
        InputMode::Adding => handle_dialog_key(app, key),
    }
    false
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => return app.submit_add(),
        KeyCode::Esc => return app.cancel_add(),
        _ => {}
    }
    let Some(draft) = app.draft_mut() else {
        return;
    };
    match (draft.field, key.code) {
        (_, KeyCode::Tab) => draft.next_field(),
        (DraftField::Name, KeyCode::Char(c)) => {
            draft.name.push(c);
            draft.error = None;
        }
        (DraftField::Name, KeyCode::Backspace) => {
            draft.name.pop();
        }
        (DraftField::Category, KeyCode::Right | KeyCode::Char(' ')) => {
            draft.category = draft.category.next();
        }
        (DraftField::Category, KeyCode::Left) => {
            draft.category = draft.category.next().next();
        }
        (DraftField::Deadline, KeyCode::Char('+') | KeyCode::Up | KeyCode::Right) => {
            draft.shift_deadline(1)
        }
        (DraftField::Deadline, KeyCode::Down | KeyCode::Left) => draft.shift_deadline(-1),
        (DraftField::Deadline, KeyCode::PageUp) => draft.shift_months(1),
        (DraftField::Deadline, KeyCode::PageDown) => draft.shift_months(-1),
        (DraftField::Deadline, KeyCode::Char(c)) => draft.push_deadline_char(c),
        (DraftField::Deadline, KeyCode::Backspace) => draft.pop_deadline_char(),
        _ => {}
    }
}
