//! Main loop and key handling.

use crate::{App, AppMode, Event, EventHandler, TuiBackend};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lullaby_error::{TuiError, TuiErrorKind, TuiResult};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

/// Maximum stories loaded into the list.
pub const LIST_LIMIT: i64 = 100;

/// Run the dashboard until the user quits.
///
/// The terminal is restored even when the loop fails.
pub fn run_tui(backend: &mut dyn TuiBackend) -> TuiResult<()> {
    enable_raw_mode().map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalSetup(format!(
            "Failed to enable raw mode: {}",
            e
        )))
    })?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalSetup(format!(
            "Failed to enter alternate screen: {}",
            e
        )))
    })?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalSetup(format!(
            "Failed to create terminal: {}",
            e
        )))
    })?;

    let result = main_loop(&mut terminal, backend);

    disable_raw_mode().map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalRestore(format!(
            "Failed to disable raw mode: {}",
            e
        )))
    })?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalRestore(format!(
            "Failed to leave alternate screen: {}",
            e
        )))
    })?;
    terminal.show_cursor().map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalRestore(format!(
            "Failed to show cursor: {}",
            e
        )))
    })?;

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    backend: &mut dyn TuiBackend,
) -> TuiResult<()> {
    let mut app = App::new();
    let events = EventHandler::new(250);

    reload(&mut app, backend)?;
    app.status_message = format!("Loaded {} stories", app.stories.len());

    while !app.should_quit {
        terminal
            .draw(|f| crate::ui::draw(f, &app))
            .map_err(|e| TuiError::new(TuiErrorKind::Rendering(e.to_string())))?;

        if let Some(event) = events.next()? {
            if let Err(e) = handle_event(&mut app, backend, event) {
                tracing::warn!(error = %e, "Dashboard action failed");
                app.status_message = format!("Error: {}", e.kind);
            }
        }
    }

    Ok(())
}

/// Reload the list for the app's current query.
pub fn reload(app: &mut App, backend: &mut dyn TuiBackend) -> TuiResult<()> {
    let stories = backend.load_stories(&app.query, LIST_LIMIT)?;
    app.set_stories(stories);
    Ok(())
}

/// Apply one event to the app, calling the backend as needed.
pub fn handle_event(app: &mut App, backend: &mut dyn TuiBackend, event: Event) -> TuiResult<()> {
    match event {
        Event::Key(key) if app.mode == AppMode::Search => handle_search_key(app, backend, key),
        Event::Key(key) => handle_key(app, backend, key),
        Event::Tick => Ok(()),
    }
}

fn handle_search_key(app: &mut App, backend: &mut dyn TuiBackend, key: KeyEvent) -> TuiResult<()> {
    match key.code {
        KeyCode::Enter => {
            app.apply_search();
            reload(app, backend)?;
            app.status_message = format!("{} ({} found)", app.query.label(), app.stories.len());
        }
        KeyCode::Esc => {
            app.cancel_search();
            app.status_message = "Search cancelled".to_string();
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => app.search_input.push(c),
        _ => {}
    }
    Ok(())
}

fn handle_key(app: &mut App, backend: &mut dyn TuiBackend, key: KeyEvent) -> TuiResult<()> {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Esc | KeyCode::Backspace => app.return_to_list(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter => app.enter_detail(),
        KeyCode::Char('/') => app.begin_search(),
        KeyCode::Char('s') => {
            let statistics = backend.statistics()?;
            app.show_statistics(statistics);
        }
        KeyCode::Char('c') => {
            app.cycle_category_filter();
            reload(app, backend)?;
            app.return_to_list();
            app.status_message = format!("{} ({} shown)", app.query.label(), app.stories.len());
        }
        KeyCode::Char('r') => {
            reload(app, backend)?;
            app.status_message = format!("Reloaded {} stories", app.stories.len());
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_story().map(|story| story.id) {
                let deleted = backend.delete_story(id)?;
                reload(app, backend)?;
                app.return_to_list();
                app.status_message = if deleted {
                    format!("Deleted story #{}", id)
                } else {
                    format!("Story #{} was already gone", id)
                };
            }
        }
        KeyCode::Char('x') => {
            if app.stories.is_empty() {
                app.status_message = "Nothing to export".to_string();
            } else {
                let path = backend.export_stories(&app.stories)?;
                app.status_message =
                    format!("Exported {} stories to {}", app.stories.len(), path.display());
            }
        }
        _ => {}
    }
    Ok(())
}
