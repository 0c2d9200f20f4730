use crossterm::event::{KeyCode, KeyEvent};

use super::EventResult;
use crate::app::{App, Prompt};

/// Keys while the `/` or `:` footer line is open.
pub fn handle_prompt_event(key: KeyEvent, app: &mut App) -> EventResult {
    let Some(prompt) = app.prompt.as_mut() else {
        return Ok(false);
    };

    match key.code {
        KeyCode::Char(c) => prompt.text_mut().push(c),
        KeyCode::Backspace => {
            prompt.text_mut().pop();
        }
        KeyCode::Esc => app.prompt = None,
        KeyCode::Enter => {
            if let Some(prompt) = app.prompt.take() {
                submit(prompt, app);
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn submit(prompt: Prompt, app: &mut App) {
    match prompt {
        Prompt::Search(term) => {
            app.explorer.search(&term);
            app.status_message = match app.explorer.matches().len() {
                0 if !term.is_empty() => format!("No match for '{}'", term),
                0 => "Ready".to_string(),
                n => format!("{} matches", n),
            };
        }
        Prompt::Command(line) => run_command(&line, app),
    }
}

fn run_command(line: &str, app: &mut App) {
    let line = line.trim();
    let (name, arg) = match line.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };
    log::debug!("command: {:?} {:?}", name, arg);

    match (name, arg) {
        ("", _) => {}
        ("q", _) => app.should_quit = true,
        ("mkdir" | "touch" | "rename", "") => {
            app.status_message = format!("{} needs a name", name);
        }
        ("mkdir", arg) => {
            let result = app.explorer.make_directory(arg);
            app.report("mkdir", result);
        }
        ("touch", arg) => {
            let result = app.explorer.touch(arg);
            app.report("touch", result);
        }
        ("rename", arg) => {
            let result = app.explorer.rename_selected(arg);
            app.report("rename", result);
        }
        ("mrename", _) => {
            let result = app.explorer.rename_marked();
            app.force_redraw = true;
            if let Some(report) = app.report("mrename", result) {
                app.status_message = if report.is_aligned() {
                    format!("Renamed {} of {}", report.renamed, report.marked)
                } else {
                    format!(
                        "Renamed {}; got {} lines for {} marked entries",
                        report.renamed, report.lines, report.marked
                    )
                };
            }
        }
        (other, _) => app.status_message = format!("Unknown command: {}", other),
    }
}
