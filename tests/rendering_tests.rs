use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use gofileyourself::app::App;
use gofileyourself::async_task::Task;
use gofileyourself::config::SidePaths;
use gofileyourself::error::Result;
use gofileyourself::event::handle_event;
use gofileyourself::explorer::NavigationController;
use gofileyourself::launcher::{LaunchOutcome, Launcher};
use gofileyourself::screenshot::{render_app, render_to_string};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tokio::sync::mpsc;

struct NoopLauncher;

impl Launcher for NoopLauncher {
    fn open(&mut self, _path: &Path) -> Result<LaunchOutcome> {
        Ok(LaunchOutcome::Resumed)
    }

    fn edit(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

struct Scene {
    _side: TempDir,
    root: TempDir,
    app: App,
}

fn create_scene() -> Scene {
    let side = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("crates/core")).unwrap();
    fs::write(root.path().join("crates/core/lib.rs"), "pub fn core() {}\n").unwrap();
    fs::write(root.path().join("Cargo.toml"), "[workspace]\nmembers = [\"crates/core\"]\n").unwrap();
    fs::write(root.path().join("notes.txt"), "first line\nsecond line\n").unwrap();

    let explorer = NavigationController::new(
        root.path(),
        &SidePaths::in_dir(side.path()),
        10,
        Box::new(NoopLauncher),
    )
    .unwrap();
    Scene {
        _side: side,
        root,
        app: App::new(explorer),
    }
}

fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let (sender, _receiver) = mpsc::channel::<Task>(16);
    handle_event(Event::Key(KeyEvent::new(code, modifiers)), app, &sender).unwrap();
}

fn row_containing<'a>(screen: &'a str, needle: &str) -> Option<&'a str> {
    screen.lines().find(|line| line.contains(needle))
}

#[test]
fn test_explorer_shows_three_panes() {
    let scene = create_scene();
    let screen = render_app(&scene.app, 100, 20).unwrap();

    let root_name = scene.root.path().file_name().unwrap().to_string_lossy().to_string();
    assert!(row_containing(&screen, "Explore").is_some());
    // Header carries the full path
    assert!(screen.lines().nth(1).unwrap().contains(&root_name));
    // Current pane
    assert!(screen.contains("crates/"));
    assert!(screen.contains("Cargo.toml"));
    assert!(screen.contains("notes.txt"));
    // Preview of the selected directory
    assert!(screen.contains("core/"));
    assert_eq!(screen.lines().count(), 20);
}

#[test]
fn test_file_preview_shows_contents() {
    let mut scene = create_scene();
    press(&mut scene.app, KeyCode::Char('G'), KeyModifiers::NONE);
    let screen = render_app(&scene.app, 100, 20).unwrap();
    assert!(screen.contains("first line"));
    assert!(screen.contains("second line"));
}

#[test]
fn test_marks_are_prefixed_and_counted() {
    let mut scene = create_scene();
    press(&mut scene.app, KeyCode::Char('M'), KeyModifiers::NONE);
    let screen = render_app(&scene.app, 100, 20).unwrap();
    assert!(screen.contains("m> crates/"));
    assert!(screen.contains("1 marked"));
}

#[test]
fn test_prompt_replaces_status_line() {
    let mut scene = create_scene();
    press(&mut scene.app, KeyCode::Char(':'), KeyModifiers::NONE);
    for c in "mkdir out".chars() {
        press(&mut scene.app, KeyCode::Char(c), KeyModifiers::NONE);
    }
    let screen = render_app(&scene.app, 100, 20).unwrap();
    let footer = screen.lines().last().unwrap();
    assert!(footer.starts_with(":mkdir out"));
}

#[test]
fn test_finder_overlay_lists_recursive_entries() {
    let mut scene = create_scene();
    press(&mut scene.app, KeyCode::Char('f'), KeyModifiers::CONTROL);
    let screen = render_app(&scene.app, 100, 20).unwrap();

    assert!(screen.contains("Find (5/5)"));
    assert!(row_containing(&screen, "crates/core/lib.rs").is_some());
    assert!(!screen.contains("Explore"));
    assert!(screen.lines().last().unwrap().starts_with('/'));
}

#[test]
fn test_screenshot_of_directory() {
    let scene = create_scene();
    let screen = render_to_string(scene.root.path(), 80, 12).unwrap();
    assert_eq!(screen.lines().count(), 12);
    assert!(screen.lines().all(|line| line.chars().count() == 80));
    assert!(screen.contains("notes.txt"));
}
