use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use super::{dispatch, EventResult};
use crate::app::{App, Mode};
use crate::async_task::Task;
use crate::error::Error;
use crate::finder::Finder;
use crate::launcher::LaunchOutcome;

pub fn handle_finder_event(
    key: KeyEvent,
    app: &mut App,
    task_sender: &mpsc::Sender<Task>,
) -> EventResult {
    let Some(finder) = app.finder.as_mut() else {
        app.mode = Mode::Explorer;
        return Ok(true);
    };

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Up => finder.move_selection(-1),
        KeyCode::Down => finder.move_selection(1),
        KeyCode::Char('p') if ctrl => finder.move_selection(-1),
        KeyCode::Char('n') if ctrl => finder.move_selection(1),
        KeyCode::Backspace => dispatch(finder.pop_char(), task_sender),
        KeyCode::Char(c) if !ctrl => dispatch(finder.push_char(c), task_sender),
        KeyCode::Enter => return open_selection(app),
        _ => return Ok(false),
    }
    Ok(true)
}

/// A directory hands control back to the explorer; a file goes to the
/// launcher and the overlay stays up.
fn open_selection(app: &mut App) -> EventResult {
    let Some(path) = app.finder.as_ref().and_then(Finder::selected_path) else {
        return Ok(false);
    };

    if path.is_dir() {
        app.close_finder();
        let result = match app.explorer.enter_directory(&path) {
            Err(Error::EmptyDirectory(_)) => app.explorer.reveal(&path),
            other => other,
        };
        app.report("open", result);
        return Ok(true);
    }

    let result = app.explorer.open_file(&path);
    match app.report("open", result) {
        Some(LaunchOutcome::Chosen) => app.should_quit = true,
        Some(LaunchOutcome::Resumed) => app.force_redraw = true,
        None => {}
    }
    Ok(true)
}
