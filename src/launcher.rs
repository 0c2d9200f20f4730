//! Handing files to the outside world
//!
//! The explorer never spawns processes itself. It talks to a [`Launcher`],
//! which either suspends the terminal and runs the user's editor, or (in
//! chooser mode) writes the picked path to a file and asks the program to exit.

use crate::error::{Error, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const FALLBACK_EDITOR: &str = "nvim";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Control came back to the browser; the screen must be repainted
    Resumed,
    /// A path was chosen and the program should exit
    Chosen,
}

pub trait Launcher {
    /// Open a file the user picked.
    fn open(&mut self, path: &Path) -> Result<LaunchOutcome>;

    /// Edit `path` in place and block until the editor exits.
    fn edit(&mut self, path: &Path) -> Result<()>;
}

/// Runs `$EDITOR` (or `nvim`) with the terminal suspended.
#[derive(Debug, Clone)]
pub struct EditorLauncher {
    editor: String,
    choose_file: Option<PathBuf>,
}

impl EditorLauncher {
    pub fn new(editor: String, choose_file: Option<PathBuf>) -> Self {
        Self {
            editor,
            choose_file,
        }
    }

    /// Editor from `$EDITOR`, falling back to `nvim`.
    pub fn from_env(choose_file: Option<PathBuf>) -> Self {
        let editor = std::env::var("EDITOR")
            .ok()
            .filter(|editor| !editor.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_EDITOR.to_string());
        Self::new(editor, choose_file)
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    fn run_editor(&self, path: &Path) -> Result<()> {
        let mut words = self.editor.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| Error::Editor("empty editor command".to_string()))?;

        log::info!("launcher: {} {:?}", self.editor, path);
        suspend_terminal()?;
        let status = Command::new(program).args(words).arg(path).status();
        resume_terminal()?;

        let status = status.map_err(|e| Error::Editor(format!("{}: {}", program, e)))?;
        if !status.success() {
            log::warn!("launcher: {} exited with {}", program, status);
        }
        Ok(())
    }
}

impl Launcher for EditorLauncher {
    fn open(&mut self, path: &Path) -> Result<LaunchOutcome> {
        match &self.choose_file {
            Some(out) => {
                write_choice(out, path)?;
                Ok(LaunchOutcome::Chosen)
            }
            None => {
                self.run_editor(path)?;
                Ok(LaunchOutcome::Resumed)
            }
        }
    }

    fn edit(&mut self, path: &Path) -> Result<()> {
        self.run_editor(path)
    }
}

/// Write the chosen path plus a newline to `out`.
pub fn write_choice(out: &Path, chosen: &Path) -> Result<()> {
    fs::write(out, format!("{}\n", chosen.display()))?;
    log::info!("launcher: chose {:?} into {:?}", chosen, out);
    Ok(())
}

fn suspend_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn resume_terminal() -> Result<()> {
    execute!(io::stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    Ok(())
}
