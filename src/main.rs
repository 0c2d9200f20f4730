use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::PathBuf;
use std::{io, time::Duration};
use tokio::sync::mpsc;

use gofileyourself::app::App;
use gofileyourself::async_task::{self, Task, TaskResult};
use gofileyourself::cli::{Cli, Commands};
use gofileyourself::config::{Config, SidePaths};
use gofileyourself::error::Result;
use gofileyourself::explorer::NavigationController;
use gofileyourself::launcher::EditorLauncher;
use gofileyourself::{event, screenshot, ui};

const DEBUG_LOG_FILE: &str = "debug.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        init_logging()?;
        log::info!("gofileyourself starting up");
    }

    match cli.command {
        Some(Commands::Screenshot {
            path,
            width,
            height,
        }) => {
            print!("{}", screenshot::render_to_string(&path, width, height)?);
            Ok(())
        }
        None => run_interactive(cli.config, cli.choose_file, cli.selected).await,
    }
}

fn init_logging() -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(DEBUG_LOG_FILE)?;
    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .filter_level(log::LevelFilter::Debug)
        .init();
    Ok(())
}

async fn run_interactive(
    config_path: Option<PathBuf>,
    choose_file: Option<PathBuf>,
    selected: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(config_path.as_deref());
    let cwd = std::env::current_dir()?;
    let side_paths = SidePaths::from_home().unwrap_or_else(|| {
        log::warn!("main: no home directory, keeping side files in {:?}", cwd);
        SidePaths::in_dir(&cwd)
    });

    let launcher = EditorLauncher::from_env(choose_file);
    log::info!("main: editor is {:?}", launcher.editor());
    let start = selected.unwrap_or_else(|| cwd.clone());
    let explorer =
        NavigationController::new(&start, &side_paths, config.history_len, Box::new(launcher))?;
    let mut app = App::new(explorer);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup async task channels
    let (task_sender, task_receiver) = mpsc::channel::<Task>(32);
    let (result_sender, mut result_receiver) = mpsc::channel::<TaskResult>(32);
    let worker_handle = tokio::spawn(async_task::run_worker(task_receiver, result_sender));

    let outcome = run_loop(&mut terminal, &mut app, &task_sender, &mut result_receiver);

    // Cleanup
    worker_handle.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    log::info!("main: exiting in {:?}", app.explorer.current_path());

    outcome
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    task_sender: &mpsc::Sender<Task>,
    result_receiver: &mut mpsc::Receiver<TaskResult>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(50);
    loop {
        // Handle forced screen redraw after the editor returns
        if app.force_redraw {
            terminal.clear()?;
            app.force_redraw = false;
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if crossterm::event::poll(tick_rate)? {
            let event = crossterm::event::read()?;
            if let Err(e) = event::handle_event(event, app, task_sender) {
                app.status_message = format!("Error handling event: {}", e);
            }
        }

        while let Ok(result) = result_receiver.try_recv() {
            app.handle_task_result(result);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
