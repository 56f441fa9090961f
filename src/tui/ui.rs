use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
    Frame,
};

use super::app::{App, DraftField, InputMode, TaskDraft};
use crate::deadline::Emphasis;
use crate::models::Category;

fn emphasis_style(emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Alert => Style::default().fg(Color::Red),
        Emphasis::Warning => Style::default().fg(Color::Yellow),
        Emphasis::Calm => Style::default().fg(Color::Green),
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navigation
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Help / status
        ])
        .split(f.area());

    let titles: Vec<Line> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| Line::from(format!("{} {}", i + 1, c.label())))
        .collect();
    let selected = Category::ALL.iter().position(|c| *c == app.view).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Planpass"))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    let today = app.today;
    let tasks = app.planner.list(app.view, today);
    let (header, widths, rows): (Vec<&str>, Vec<Constraint>, Vec<Row>) = match app.view {
        Category::Daily => (
            vec!["Name", "Deadline", "Streak", ""],
            vec![
                Constraint::Min(20),
                Constraint::Length(26),
                Constraint::Length(8),
                Constraint::Length(3),
            ],
            tasks
                .iter()
                .map(|t| {
                    let status = t.deadline_status(today);
                    let mark = if t.checked_in_on(today) { "✓" } else { "○" };
                    Row::new(vec![
                        Cell::from(t.name().to_string()),
                        Cell::from(format!("{} ({})", t.deadline(), status))
                            .style(emphasis_style(status.emphasis())),
                        Cell::from(format!("{}d", t.streak())),
                        Cell::from(mark),
                    ])
                })
                .collect(),
        ),
        Category::Future => (
            vec!["Days", "Name", "Target"],
            vec![
                Constraint::Length(8),
                Constraint::Min(20),
                Constraint::Length(12),
            ],
            tasks
                .iter()
                .map(|t| {
                    let status = t.deadline_status(today);
                    Row::new(vec![
                        Cell::from(t.days_remaining(today).to_string())
                            .style(emphasis_style(status.emphasis()).add_modifier(Modifier::BOLD)),
                        Cell::from(t.name().to_string()),
                        Cell::from(t.deadline().to_string()),
                    ])
                })
                .collect(),
        ),
        Category::Temporary => (
            vec!["", "Name", "Time Left"],
            vec![
                Constraint::Length(3),
                Constraint::Min(20),
                Constraint::Length(14),
            ],
            tasks
                .iter()
                .map(|t| {
                    let status = t.deadline_status(today);
                    Row::new(vec![
                        Cell::from("[ ]"),
                        Cell::from(t.name().to_string()),
                        Cell::from(status.to_string()).style(emphasis_style(status.emphasis())),
                    ])
                })
                .collect(),
        ),
    };

    let table = Table::new(rows, widths)
        .header(
            Row::new(header)
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title(app.view.label()))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");
    f.render_stateful_widget(table, chunks[1], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view {
            Category::Daily => "q: Quit | Tab/1-3: View | a: Add | Space: Check in".to_string(),
            Category::Future => format!(
                "q: Quit | Tab/1-3: View | a: Add | Passed milestones: {}",
                app.planner.policy()
            ),
            Category::Temporary => "q: Quit | Tab/1-3: View | a: Add | Space: Done".to_string(),
        },
        InputMode::Adding => {
            "Tab: Next field | ←/→: Category | Date: type YYYY-MM-DD, ↑/↓ day, PgUp/PgDn month | Enter: Add | Esc: Cancel"
                .to_string()
        }
    };
    let footer = match &app.message {
        Some(msg) => Line::from(vec![
            Span::styled(msg.clone(), Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            Span::styled(help_text, Style::default().fg(Color::Gray)),
        ]),
        None => Line::from(Span::styled(help_text, Style::default().fg(Color::Gray))),
    };
    let help = Paragraph::new(footer).block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    if let (InputMode::Adding, Some(draft)) = (&app.input_mode, &app.draft) {
        render_dialog(f, draft);
    }
}

fn render_dialog(f: &mut Frame, draft: &TaskDraft) {
    let area = centered_rect(60, 8, f.area());
    f.render_widget(Clear, area);

    let focus = |field: DraftField| {
        if draft.field == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let mut lines = vec![
        Line::from(vec![
            Span::raw("Name:     "),
            Span::styled(draft.name.clone(), focus(DraftField::Name)),
        ]),
        Line::from(vec![
            Span::raw("Category: "),
            Span::styled(draft.category.label(), focus(DraftField::Category)),
        ]),
        Line::from(vec![
            Span::raw("Deadline: "),
            Span::styled(draft.deadline_text.clone(), focus(DraftField::Deadline)),
        ]),
    ];
    if let Some(err) = &draft.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let dialog = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Add Task"));
    f.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
