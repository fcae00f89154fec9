use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use super::open_database;
use crate::config::Config;
use crate::db::Database;
use crate::ui::app::{App, ExplorerView, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_to_bottom, scroll_to_top};

pub(crate) fn as_tui(config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let mut app = App::new(config.database.display().to_string());
    app.refresh_all(&db);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    db.close()?;
    info!("session closed");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // Tab, status and command bars
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db),
                InputMode::Command => handle_command_input(key, app, db),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &Database) {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                app.move_down(db);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                app.move_up(db);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_down(db),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(db),
        KeyCode::Char('g') => handle_goto_top(app, db),
        KeyCode::Char('G') => handle_goto_bottom(app, db),
        KeyCode::Char('1') => switch_screen(app, Screen::Dashboard),
        KeyCode::Char('2') => switch_screen(app, Screen::Details),
        KeyCode::Char('3') => switch_screen(app, Screen::Explorer),
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            switch_screen(app, screens[(idx + 1) % screens.len()]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, screens[prev]);
        }
        KeyCode::Char('t') if app.screen == Screen::Explorer => {
            app.explorer_view = ExplorerView::Accounts;
            match app.cycle_type_filter() {
                Ok(()) => app.set_status(format!(
                    "{} of {} accounts",
                    app.filtered.len(),
                    app.accounts.len()
                )),
                Err(e) => app.set_error(format!("Error: {e}")),
            }
        }
        KeyCode::Char('c') if app.screen == Screen::Explorer => run_shortcut("clear", app, db),
        KeyCode::Char('v') if app.screen == Screen::Explorer => {
            app.explorer_view = app.explorer_view.next();
            if app.explorer_view == ExplorerView::Tables && app.tables.is_empty() {
                app.refresh_tables(db);
            }
            app.explorer_index = 0;
            app.explorer_scroll = 0;
        }
        KeyCode::Char('r') => run_shortcut("refresh", app, db),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Enter => handle_enter(app, db),
        KeyCode::Esc => handle_escape(app),
        _ => {}
    }
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &Database) {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            run_shortcut(&input, app, db);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

/// Run a `:` command line, reporting any failure in the status bar.
fn run_shortcut(input: &str, app: &mut App, db: &Database) {
    if let Err(e) = commands::handle_command(input, app, db) {
        app.set_error(format!("Error: {e}"));
    }
}

fn switch_screen(app: &mut App, screen: Screen) {
    app.screen = screen;
    app.set_status(format!("{screen}"));
}

fn handle_enter(app: &mut App, db: &Database) {
    if app.screen != Screen::Explorer {
        return;
    }
    let number = match app.explorer_view {
        ExplorerView::Accounts => app.filtered.get(app.explorer_index).map(|a| a.number.clone()),
        ExplorerView::Query => app.query_account_number(),
        ExplorerView::Tables => None,
    };
    let Some(number) = number else {
        return;
    };
    match app.select_account_number(db, &number) {
        Ok(()) => switch_screen(app, Screen::Details),
        Err(e) => app.set_error(format!("Error: {e}")),
    }
}

fn handle_escape(app: &mut App) {
    match app.screen {
        Screen::Explorer if app.explorer_view != ExplorerView::Accounts => {
            app.explorer_view = ExplorerView::Accounts;
            app.explorer_index = 0;
            app.explorer_scroll = 0;
        }
        _ => app.set_status(""),
    }
}

fn handle_goto_top(app: &mut App, db: &Database) {
    match app.screen {
        Screen::Details => {
            scroll_to_top(&mut app.details_index, &mut app.details_scroll);
            app.select_account(db);
        }
        Screen::Explorer => scroll_to_top(&mut app.explorer_index, &mut app.explorer_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_goto_bottom(app: &mut App, db: &Database) {
    match app.screen {
        Screen::Details => {
            let page = app.details_page();
            scroll_to_bottom(
                &mut app.details_index,
                &mut app.details_scroll,
                app.account_numbers.len(),
                page,
            );
            app.select_account(db);
        }
        Screen::Explorer => {
            let page = app.explorer_page();
            let len = app.explorer_len();
            scroll_to_bottom(&mut app.explorer_index, &mut app.explorer_scroll, len, page);
        }
        Screen::Dashboard => {}
    }
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
