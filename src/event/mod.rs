use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::{App, Mode};
use crate::async_task::Task;
use crate::error::Result;

pub mod explorer;
pub mod finder;
pub mod prompt;

pub use explorer::*;
pub use finder::*;
pub use prompt::*;

/// `Ok(true)` when the event changed something on screen.
pub type EventResult = Result<bool>;

pub fn handle_event(event: Event, app: &mut App, task_sender: &mpsc::Sender<Task>) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(key, app, task_sender),
        Event::Resize(_, _) => Ok(true),
        _ => Ok(false),
    }
}

fn handle_key(key: KeyEvent, app: &mut App, task_sender: &mpsc::Sender<Task>) -> EventResult {
    // Mode switches
    match (app.mode, key.code) {
        (Mode::Explorer, KeyCode::Char('f'))
            if key.modifiers.contains(KeyModifiers::CONTROL) && app.prompt.is_none() =>
        {
            let result = app.open_finder();
            app.report("finder", result);
            return Ok(true);
        }
        (Mode::Finder, KeyCode::Esc) => {
            app.close_finder();
            return Ok(true);
        }
        _ => {}
    }

    match app.mode {
        Mode::Finder => handle_finder_event(key, app, task_sender),
        Mode::Explorer if app.prompt.is_some() => handle_prompt_event(key, app),
        Mode::Explorer => handle_explorer_event(key, app),
    }
}

/// Queue a search for the worker.
pub(crate) fn dispatch(task: Option<Task>, task_sender: &mpsc::Sender<Task>) {
    if let Some(task) = task {
        let generation = task.generation();
        if let Err(e) = task_sender.try_send(task) {
            log::error!("Failed to send FuzzySearch task {}: {}", generation, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Prompt;
    use crate::config::SidePaths;
    use crate::explorer::NavigationController;
    use crate::launcher::{LaunchOutcome, Launcher};
    use std::cell::RefCell;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct RecordingLauncher {
        opened: Rc<RefCell<Vec<PathBuf>>>,
        outcome: Option<LaunchOutcome>,
    }

    impl Launcher for RecordingLauncher {
        fn open(&mut self, path: &Path) -> Result<LaunchOutcome> {
            self.opened.borrow_mut().push(path.to_path_buf());
            Ok(self.outcome.unwrap_or(LaunchOutcome::Resumed))
        }

        fn edit(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    struct TestApp {
        side: TempDir,
        root: TempDir,
        app: App,
        opened: Rc<RefCell<Vec<PathBuf>>>,
    }

    fn create_test_app_with(outcome: Option<LaunchOutcome>) -> TestApp {
        let side = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("docs")).unwrap();
        fs::write(root.path().join("docs/guide.md"), "# guide").unwrap();
        fs::write(root.path().join("main.rs"), "fn main() {}").unwrap();
        fs::write(root.path().join("notes.txt"), "notes").unwrap();

        let launcher = RecordingLauncher {
            outcome,
            ..Default::default()
        };
        let opened = Rc::clone(&launcher.opened);
        let explorer = NavigationController::new(
            root.path(),
            &SidePaths::in_dir(side.path()),
            10,
            Box::new(launcher),
        )
        .unwrap();
        TestApp {
            side,
            root,
            app: App::new(explorer),
            opened,
        }
    }

    fn create_test_app() -> TestApp {
        create_test_app_with(None)
    }

    fn create_key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn create_ctrl_event(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn create_test_channel() -> (mpsc::Sender<Task>, mpsc::Receiver<Task>) {
        mpsc::channel(100)
    }

    fn type_keys(app: &mut App, sender: &mpsc::Sender<Task>, keys: &str) {
        for c in keys.chars() {
            handle_event(create_key_event(KeyCode::Char(c)), app, sender).unwrap();
        }
    }

    fn selected_name(app: &App) -> String {
        app.explorer.selected_entry().unwrap().rel_path.clone()
    }

    mod explorer_keys {
        use super::*;

        #[test]
        fn test_quit_on_q() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "q");
            assert!(t.app.should_quit);
        }

        #[test]
        fn test_j_k_and_arrows_move() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "jj");
            assert_eq!(selected_name(&t.app), "notes.txt");
            handle_event(create_key_event(KeyCode::Up), &mut t.app, &sender).unwrap();
            assert_eq!(selected_name(&t.app), "main.rs");
            type_keys(&mut t.app, &sender, "gg");
            assert_eq!(selected_name(&t.app), "docs");
            type_keys(&mut t.app, &sender, "G");
            assert_eq!(selected_name(&t.app), "notes.txt");
        }

        #[test]
        fn test_enter_directory_and_back() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "l");
            assert!(t.app.explorer.current_path().ends_with("docs"));
            handle_event(create_key_event(KeyCode::Left), &mut t.app, &sender).unwrap();
            assert_eq!(
                t.app.explorer.current_path(),
                fs::canonicalize(t.root.path()).unwrap()
            );
        }

        #[test]
        fn test_open_file_records_history() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "j");
            handle_event(create_key_event(KeyCode::Enter), &mut t.app, &sender).unwrap();

            let expected = fs::canonicalize(t.root.path()).unwrap().join("main.rs");
            assert_eq!(*t.opened.borrow(), vec![expected.clone()]);
            assert!(t.app.force_redraw);
            assert_eq!(t.app.explorer.history().get_nth(0).unwrap(), expected);
        }

        #[test]
        fn test_chooser_outcome_quits() {
            let mut t = create_test_app_with(Some(LaunchOutcome::Chosen));
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "jl");
            assert!(t.app.should_quit);
        }

        #[test]
        fn test_dd_deletes_selected_file() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "Gdd");
            assert!(!t.root.path().join("notes.txt").exists());
            assert_eq!(t.app.explorer.current().len(), 2);
        }

        #[test]
        fn test_dd_on_non_empty_directory_reports_error() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "dd");
            assert!(t.root.path().join("docs").exists());
            assert!(t.app.status_message.starts_with("delete"));
        }

        #[test]
        fn test_yank_and_paste_duplicates() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "jyypp");
            assert!(t.root.path().join("main.rs_0").exists());
        }

        #[test]
        fn test_mark_chords() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "jmmM");
            assert_eq!(t.app.explorer.marked().len(), 2);
            type_keys(&mut t.app, &sender, "mu");
            assert!(t.app.explorer.marked().is_empty());
        }

        #[test]
        fn test_anchor_round_trip() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "jjAx");
            type_keys(&mut t.app, &sender, "gg");
            assert_eq!(selected_name(&t.app), "docs");
            type_keys(&mut t.app, &sender, "ax");
            assert_eq!(selected_name(&t.app), "notes.txt");
        }

        #[test]
        fn test_missing_anchor_sets_status() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "aq");
            assert!(!t.app.should_quit);
            assert_eq!(t.app.status_message, "No anchor 'q'");
        }

        #[test]
        fn test_ctrl_h_toggles_hidden() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            fs::write(t.root.path().join(".env"), "X=1").unwrap();
            handle_event(create_ctrl_event('h'), &mut t.app, &sender).unwrap();
            assert!(t.app.explorer.show_hidden());
            assert_eq!(t.app.explorer.current().len(), 4);
        }

        #[test]
        fn test_ctrl_d_scrolls_half_page() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            handle_event(create_ctrl_event('d'), &mut t.app, &sender).unwrap();
            assert_eq!(t.app.explorer.current().selected(), 1);
            handle_event(create_ctrl_event('u'), &mut t.app, &sender).unwrap();
            assert_eq!(t.app.explorer.current().selected(), 0);
        }

        #[test]
        fn test_shift_s_writes_last_dir_and_quits() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "l");
            type_keys(&mut t.app, &sender, "S");
            assert!(t.app.should_quit);
            let last_dir = fs::read_to_string(t.side.path().join(".gofileyourself_lastdir")).unwrap();
            assert!(last_dir.ends_with("docs"));
        }
    }

    mod prompt_keys {
        use super::*;

        #[test]
        fn test_slash_search_then_cycle() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "/");
            assert_eq!(t.app.prompt, Some(Prompt::Search(String::new())));
            type_keys(&mut t.app, &sender, "n");
            assert_eq!(t.app.highlight_term(), Some("n"));
            handle_event(create_key_event(KeyCode::Enter), &mut t.app, &sender).unwrap();

            assert!(t.app.prompt.is_none());
            assert_eq!(t.app.explorer.matches(), &[1, 2]);
            assert_eq!(selected_name(&t.app), "main.rs");
            type_keys(&mut t.app, &sender, "n");
            assert_eq!(selected_name(&t.app), "notes.txt");
            type_keys(&mut t.app, &sender, "N");
            assert_eq!(selected_name(&t.app), "main.rs");
        }

        #[test]
        fn test_escape_cancels_prompt() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, ":mkd");
            handle_event(create_key_event(KeyCode::Esc), &mut t.app, &sender).unwrap();
            assert!(t.app.prompt.is_none());
            assert!(!t.app.should_quit);
        }

        #[test]
        fn test_mkdir_touch_and_rename_commands() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();

            type_keys(&mut t.app, &sender, ":mkdir build/out");
            handle_event(create_key_event(KeyCode::Enter), &mut t.app, &sender).unwrap();
            assert!(t.root.path().join("build/out").is_dir());

            type_keys(&mut t.app, &sender, ":touch todo.txt");
            handle_event(create_key_event(KeyCode::Enter), &mut t.app, &sender).unwrap();
            assert!(t.root.path().join("todo.txt").is_file());
            assert_eq!(selected_name(&t.app), "todo.txt");

            type_keys(&mut t.app, &sender, ":rename done.txt");
            handle_event(create_key_event(KeyCode::Enter), &mut t.app, &sender).unwrap();
            assert!(t.root.path().join("done.txt").is_file());
            assert!(!t.root.path().join("todo.txt").exists());
        }

        #[test]
        fn test_quit_command() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, ":q");
            handle_event(create_key_event(KeyCode::Enter), &mut t.app, &sender).unwrap();
            assert!(t.app.should_quit);
        }

        #[test]
        fn test_backspace_edits_prompt() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            type_keys(&mut t.app, &sender, "/ab");
            handle_event(create_key_event(KeyCode::Backspace), &mut t.app, &sender).unwrap();
            assert_eq!(t.app.prompt, Some(Prompt::Search("a".to_string())));
        }
    }

    mod finder_keys {
        use super::*;

        #[test]
        fn test_ctrl_f_opens_and_esc_closes() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            handle_event(create_ctrl_event('f'), &mut t.app, &sender).unwrap();
            assert_eq!(t.app.mode, Mode::Finder);
            assert_eq!(t.app.finder.as_ref().unwrap().results().len(), 4);

            handle_event(create_key_event(KeyCode::Esc), &mut t.app, &sender).unwrap();
            assert_eq!(t.app.mode, Mode::Explorer);
            assert!(t.app.finder.is_none());
        }

        #[test]
        fn test_typing_dispatches_one_task_per_edit() {
            let mut t = create_test_app();
            let (sender, mut receiver) = create_test_channel();
            handle_event(create_ctrl_event('f'), &mut t.app, &sender).unwrap();
            type_keys(&mut t.app, &sender, "gd");

            let first = receiver.try_recv().unwrap();
            let second = receiver.try_recv().unwrap();
            assert_eq!(first.generation(), 1);
            assert_eq!(second.generation(), 2);
            assert!(receiver.try_recv().is_err());
        }

        #[test]
        fn test_enter_on_directory_returns_to_explorer() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            handle_event(create_ctrl_event('f'), &mut t.app, &sender).unwrap();
            handle_event(create_key_event(KeyCode::Enter), &mut t.app, &sender).unwrap();
            assert_eq!(t.app.mode, Mode::Explorer);
            assert!(t.app.explorer.current_path().ends_with("docs"));
        }

        #[test]
        fn test_enter_on_file_opens_it() {
            let mut t = create_test_app();
            let (sender, _receiver) = create_test_channel();
            handle_event(create_ctrl_event('f'), &mut t.app, &sender).unwrap();
            handle_event(create_key_event(KeyCode::Down), &mut t.app, &sender).unwrap();
            handle_event(create_key_event(KeyCode::Enter), &mut t.app, &sender).unwrap();

            let expected = fs::canonicalize(t.root.path()).unwrap().join("docs/guide.md");
            assert_eq!(*t.opened.borrow(), vec![expected]);
            assert_eq!(t.app.mode, Mode::Finder);
        }
    }
}
