use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::path::Path;

use crate::app::App;
use crate::config::{SidePaths, DEFAULT_HISTORY_LEN};
use crate::error::Result;
use crate::explorer::NavigationController;
use crate::launcher::EditorLauncher;
use crate::ui;

/// Render the explorer opened at `path` once and return the screen as text.
///
/// Side files go to a scratch directory so a screenshot never touches the
/// user's history or anchors.
pub fn render_to_string(path: &Path, width: u16, height: u16) -> Result<String> {
    let scratch = tempfile::tempdir()?;
    let explorer = NavigationController::new(
        path,
        &SidePaths::in_dir(scratch.path()),
        DEFAULT_HISTORY_LEN,
        Box::new(EditorLauncher::from_env(None)),
    )?;
    let app = App::new(explorer);
    render_app(&app, width, height)
}

pub fn render_app(app: &App, width: u16, height: u16) -> Result<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)?;

    terminal.draw(|frame| {
        ui::draw(frame, app);
    })?;

    Ok(buffer_to_string(terminal.backend().buffer()))
}

pub fn buffer_to_string(buffer: &Buffer) -> String {
    let mut result = String::new();

    for y in 0..buffer.area().height {
        for x in 0..buffer.area().width {
            let sym = buffer[(x, y)].symbol();
            if sym.is_empty() {
                result.push(' ');
            } else {
                result.push_str(sym);
            }
        }
        result.push('\n');
    }

    result
}
