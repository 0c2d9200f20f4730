use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::EventResult;
use crate::app::{App, Prompt};
use crate::chord::Chord;
use crate::launcher::LaunchOutcome;

pub fn handle_explorer_event(key: KeyEvent, app: &mut App) -> EventResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return handle_control_key(key.code, app);
    }

    match key.code {
        KeyCode::Char(c) => handle_char(c, app),
        // Some terminals deliver Ctrl-H as a plain backspace
        KeyCode::Backspace => toggle_hidden(app),
        KeyCode::Down => {
            app.explorer.move_selection(1);
            Ok(true)
        }
        KeyCode::Up => {
            app.explorer.move_selection(-1);
            Ok(true)
        }
        KeyCode::Left => go_to_parent(app),
        KeyCode::Right | KeyCode::Enter => open_selected(app),
        KeyCode::Home => {
            app.explorer.goto_top();
            Ok(true)
        }
        KeyCode::End => {
            app.explorer.goto_bottom();
            Ok(true)
        }
        KeyCode::Esc => {
            app.chord.clear();
            Ok(false)
        }
        _ => Ok(false),
    }
}

fn handle_control_key(code: KeyCode, app: &mut App) -> EventResult {
    match code {
        KeyCode::Char('h') => toggle_hidden(app),
        KeyCode::Char('d') => {
            app.explorer.scroll_half_page(true);
            Ok(true)
        }
        KeyCode::Char('u') => {
            app.explorer.scroll_half_page(false);
            Ok(true)
        }
        KeyCode::Char('c') => {
            app.should_quit = true;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn handle_char(c: char, app: &mut App) -> EventResult {
    if let Some(chord) = app.chord.push(c) {
        run_chord(chord, app);
        return Ok(true);
    }

    match c {
        'j' => app.explorer.move_selection(1),
        'k' => app.explorer.move_selection(-1),
        'h' => return go_to_parent(app),
        'l' => return open_selected(app),
        'G' => app.explorer.goto_bottom(),
        'M' => {
            let result = app.explorer.toggle_mark();
            app.report("mark", result);
        }
        'r' | 'R' => {
            let result = app.explorer.cycle_recent(c == 'R');
            if app.report("recent", result).is_some() {
                app.status_message = format!("Recent #{}", app.explorer.recent_cursor());
            }
        }
        'n' => app.explorer.next_match(),
        'N' => app.explorer.previous_match(),
        'S' => {
            let result = app.explorer.write_last_dir();
            app.report("save", result);
            app.should_quit = true;
        }
        'q' => app.should_quit = true,
        '/' => open_prompt(app, Prompt::Search(String::new())),
        ':' => open_prompt(app, Prompt::Command(String::new())),
        _ => return Ok(app.chord.is_pending()),
    }
    Ok(true)
}

fn open_prompt(app: &mut App, prompt: Prompt) {
    app.chord.clear();
    app.prompt = Some(prompt);
}

fn run_chord(chord: Chord, app: &mut App) {
    match chord {
        Chord::GotoTop => app.explorer.goto_top(),
        Chord::Delete { forced } => {
            let result = app.explorer.delete_selected(forced);
            if app.report("delete", result).is_some() {
                app.status_message = "Deleted".to_string();
            }
        }
        Chord::Yank => {
            let result = app.explorer.yank_selected();
            if app.report("yank", result).is_some() {
                app.status_message = "Yanked".to_string();
            }
        }
        Chord::Paste => {
            let result = app.explorer.paste();
            if let Some(written) = app.report("paste", result) {
                app.status_message = format!("Pasted {}", written.display());
            }
        }
        Chord::ToggleMark => {
            let result = app.explorer.toggle_mark();
            app.report("mark", result);
        }
        Chord::UnmarkAll => {
            let result = app.explorer.unmark_all();
            app.report("unmark", result);
        }
        Chord::DeleteMarked { forced } => {
            let result = app.explorer.delete_marked(forced);
            if let Some(count) = app.report("delete marked", result) {
                app.status_message = format!("Deleted {} entries", count);
            }
        }
        Chord::YankMarked => {
            app.explorer.yank_marked();
            app.status_message = format!("Yanked {} marked", app.explorer.yanked_marked().len());
        }
        Chord::PasteMarked => {
            let result = app.explorer.paste_marked();
            if let Some(count) = app.report("paste marked", result) {
                app.status_message = format!("Pasted {} entries", count);
            }
        }
        Chord::SetAnchor(key) => {
            let result = app.explorer.set_anchor(key);
            if app.report("anchor", result).is_some() {
                app.status_message = format!("Anchor '{}' set", key);
            }
        }
        Chord::JumpToAnchor(key) => {
            let result = app.explorer.jump_to_anchor(key);
            if let Some(false) = app.report("anchor", result) {
                app.status_message = format!("No anchor '{}'", key);
            }
        }
    }
}

fn toggle_hidden(app: &mut App) -> EventResult {
    let result = app.explorer.toggle_hidden();
    app.report("hidden", result);
    Ok(true)
}

fn go_to_parent(app: &mut App) -> EventResult {
    let result = app.explorer.go_to_parent();
    app.report("parent", result);
    Ok(true)
}

fn open_selected(app: &mut App) -> EventResult {
    let result = app.explorer.open_selected();
    match app.report("open", result) {
        Some(Some(LaunchOutcome::Chosen)) => app.should_quit = true,
        Some(Some(LaunchOutcome::Resumed)) => app.force_redraw = true,
        _ => {}
    }
    Ok(true)
}
