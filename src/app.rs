use crate::async_task::TaskResult;
use crate::chord::KeyChord;
use crate::error::Result;
use crate::explorer::NavigationController;
use crate::finder::Finder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Explorer,
    Finder,
}

/// Footer line being edited in the explorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// `/` in-place search, highlighted live while typing
    Search(String),
    /// `:` command such as `mkdir NAME`
    Command(String),
}

impl Prompt {
    pub fn prefix(&self) -> char {
        match self {
            Prompt::Search(_) => '/',
            Prompt::Command(_) => ':',
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Prompt::Search(text) | Prompt::Command(text) => text,
        }
    }

    pub fn text_mut(&mut self) -> &mut String {
        match self {
            Prompt::Search(text) | Prompt::Command(text) => text,
        }
    }
}

pub struct App {
    pub explorer: NavigationController,
    pub finder: Option<Finder>,
    pub mode: Mode,
    pub prompt: Option<Prompt>,
    pub chord: KeyChord,
    pub should_quit: bool,
    pub force_redraw: bool,
    pub status_message: String,
}

impl App {
    pub fn new(explorer: NavigationController) -> Self {
        Self {
            explorer,
            finder: None,
            mode: Mode::Explorer,
            prompt: None,
            chord: KeyChord::new(),
            should_quit: false,
            force_redraw: false,
            status_message: "Ready".to_string(),
        }
    }

    pub fn open_finder(&mut self) -> Result<()> {
        let finder = Finder::open(self.explorer.current_path(), self.explorer.show_hidden())?;
        self.status_message = format!("{} entries", finder.candidate_count());
        self.finder = Some(finder);
        self.mode = Mode::Finder;
        self.chord.clear();
        self.prompt = None;
        Ok(())
    }

    pub fn close_finder(&mut self) {
        self.finder = None;
        self.mode = Mode::Explorer;
        self.status_message = "Ready".to_string();
    }

    /// Text to highlight in the current pane: the search being typed, or the
    /// last committed one.
    pub fn highlight_term(&self) -> Option<&str> {
        match &self.prompt {
            Some(Prompt::Search(text)) if !text.is_empty() => Some(text.as_str()),
            Some(_) => None,
            None => self.explorer.search_term(),
        }
    }

    /// Unwrap an operation result, logging and showing any error in the
    /// status bar.
    pub fn report<T>(&mut self, what: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("{} failed: {}", what, e);
                self.status_message = format!("{}: {}", what, e);
                None
            }
        }
    }

    pub fn handle_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::SearchFinished {
                generation,
                matches,
            } => {
                let count = matches.len();
                let Some(finder) = self.finder.as_mut() else {
                    log::debug!("app: finder closed, dropping generation {}", generation);
                    return;
                };
                // Race condition protection: only the newest query may repaint
                if finder.apply_results(generation, matches) {
                    self.status_message = format!("{} matches", count);
                }
            }
            TaskResult::SearchCancelled { generation } => {
                log::debug!("app: search generation {} cancelled", generation);
            }
            TaskResult::Error { message } => {
                log::error!("app: worker error: {}", message);
                self.status_message = format!("Error: {}", message);
            }
        }
    }
}
