//! Three-pane navigation state
//!
//! [`NavigationController`] owns the current directory, its parent and the
//! preview of the selected entry, plus everything the user accumulates while
//! browsing: marks, the yank buffer, remembered selections and the in-place
//! search. Every transition runs to completion and leaves the current listing
//! non-empty with a valid selection.

use crate::anchors::AnchorStore;
use crate::config::SidePaths;
use crate::error::{Error, Result};
use crate::fs_ops;
use crate::history::HistoryStore;
use crate::index_memory::PathIndexMemory;
use crate::launcher::{LaunchOutcome, Launcher};
use crate::listing::{self, DirectoryEntry, Listing, ScanOptions};
use crate::preview::{self, Preview};
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound for a half-page scroll.
pub const MAX_SCROLL_AMOUNT: usize = 20;

const RENAME_SCRATCH_PREFIX: &str = "gofileyourself_rm";

/// Outcome of a batch rename through the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRename {
    pub marked: usize,
    pub lines: usize,
    pub renamed: usize,
}

impl BatchRename {
    pub fn is_aligned(&self) -> bool {
        self.marked == self.lines
    }
}

pub struct NavigationController {
    current_path: PathBuf,
    current: Listing,
    parent: Listing,
    preview: Preview,
    memory: PathIndexMemory,
    marked: Vec<PathBuf>,
    yanked: Option<PathBuf>,
    yanked_marked: Vec<PathBuf>,
    search_term: Option<String>,
    matches: Vec<usize>,
    show_hidden: bool,
    recent_cursor: usize,
    history: HistoryStore,
    anchors: AnchorStore,
    last_dir_file: PathBuf,
    launcher: Box<dyn Launcher>,
}

impl NavigationController {
    /// Open the browser at `start`. A directory is entered directly; a file
    /// is shown selected inside its parent.
    pub fn new(
        start: &Path,
        side_paths: &SidePaths,
        history_len: usize,
        launcher: Box<dyn Launcher>,
    ) -> Result<Self> {
        let start = fs::canonicalize(start)?;
        let mut controller = Self {
            current_path: start.clone(),
            current: Listing::default(),
            parent: Listing::default(),
            preview: Preview::Empty,
            memory: PathIndexMemory::new(),
            marked: Vec::new(),
            yanked: None,
            yanked_marked: Vec::new(),
            search_term: None,
            matches: Vec::new(),
            show_hidden: false,
            recent_cursor: 0,
            history: HistoryStore::new(side_paths.history.clone(), history_len),
            anchors: AnchorStore::new(side_paths.anchors.clone()),
            last_dir_file: side_paths.last_dir.clone(),
            launcher,
        };

        if start.is_dir() {
            controller.enter_directory(&start)?;
        } else {
            controller.reveal(&start)?;
        }
        log::info!("explorer: started in {:?}", controller.current_path);
        Ok(controller)
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn current(&self) -> &Listing {
        &self.current
    }

    pub fn parent(&self) -> &Listing {
        &self.parent
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn marked(&self) -> &[PathBuf] {
        &self.marked
    }

    pub fn yanked(&self) -> Option<&Path> {
        self.yanked.as_deref()
    }

    pub fn yanked_marked(&self) -> &[PathBuf] {
        &self.yanked_marked
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn memory(&self) -> &PathIndexMemory {
        &self.memory
    }

    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.current.selected_entry()
    }

    /// Absolute path of the selected entry.
    pub fn selected_path(&self) -> Option<PathBuf> {
        self.current
            .selected_entry()
            .map(|entry| self.current_path.join(&entry.rel_path))
    }

    fn scan_options(&self) -> ScanOptions<'_> {
        ScanOptions {
            show_hidden: self.show_hidden,
            recursive: false,
            marked: Some(self.marked.as_slice()),
        }
    }

    fn require_selected(&self) -> Result<PathBuf> {
        self.selected_path()
            .ok_or_else(|| Error::EmptyDirectory(self.current_path.clone()))
    }

    /// Make `path` the current directory.
    ///
    /// An empty target is refused. When the empty target is the directory we
    /// are already in (its last entry was just deleted, or we started in an
    /// empty directory) we fall back to its parent instead, so the current
    /// listing never ends up empty.
    pub fn enter_directory(&mut self, path: &Path) -> Result<()> {
        let target = fs::canonicalize(path)?;
        let mut current = listing::build_dir(&target, self.scan_options())?;

        if current.is_empty() {
            if target == self.current_path {
                if let Some(parent) = target.parent() {
                    log::debug!("explorer: {:?} is empty, moving to parent", target);
                    return self.enter_directory(parent);
                }
            }
            return Err(Error::EmptyDirectory(target));
        }

        current.select(self.memory.get_selection(&target));
        self.parent = self.build_parent(&target);
        self.current = current;
        self.current_path = target;
        self.refresh_preview();
        self.refresh_matches();
        if let Err(e) = self.write_last_dir() {
            log::warn!("explorer: could not record last directory: {}", e);
        }
        log::debug!(
            "explorer: entered {:?} ({} entries, selected {})",
            self.current_path,
            self.current.len(),
            self.current.selected()
        );
        Ok(())
    }

    fn build_parent(&mut self, child: &Path) -> Listing {
        let parent_path = match child.parent() {
            Some(parent) => parent.to_path_buf(),
            None => return Listing::default(),
        };
        let mut parent = match listing::build_dir(&parent_path, self.scan_options()) {
            Ok(listing) => listing,
            Err(e) => {
                log::warn!("explorer: parent {:?} unreadable: {}", parent_path, e);
                return Listing::default();
            }
        };
        let name = child
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let index = parent.select(parent.find_exact(&name));
        self.memory.record_selection(&parent_path, index);
        parent
    }

    /// Rebuild every pane for the current directory.
    pub fn reload(&mut self) -> Result<()> {
        let path = self.current_path.clone();
        self.enter_directory(&path)
    }

    /// Recompute the preview for whatever is selected.
    pub fn refresh_preview(&mut self) {
        self.preview = match self.selected_path() {
            Some(path) => {
                let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
                preview::load(&path, self.scan_options(), self.memory.get_selection(&key))
            }
            None => Preview::Empty,
        };
    }

    /// Select `index`, clipped into range, and remember it for this directory.
    pub fn set_selection(&mut self, index: usize) {
        let index = self.current.select(index);
        self.memory.record_selection(&self.current_path, index);
        self.refresh_preview();
    }

    pub fn move_selection(&mut self, delta: isize) {
        let index = self.current.selected() as isize + delta;
        self.set_selection(index.max(0) as usize);
    }

    pub fn goto_top(&mut self) {
        self.set_selection(0);
    }

    pub fn goto_bottom(&mut self) {
        self.set_selection(self.current.len().saturating_sub(1));
    }

    /// Scroll by half the listing, at most [`MAX_SCROLL_AMOUNT`] entries.
    pub fn scroll_half_page(&mut self, down: bool) {
        let amount = (self.current.len() / 2).min(MAX_SCROLL_AMOUNT) as isize;
        self.move_selection(if down { amount } else { -amount });
    }

    pub fn go_to_parent(&mut self) -> Result<()> {
        match self.current_path.parent() {
            Some(parent) => {
                let parent = parent.to_path_buf();
                self.enter_directory(&parent)
            }
            None => Ok(()),
        }
    }

    /// Enter the selected directory or open the selected file.
    pub fn open_selected(&mut self) -> Result<Option<LaunchOutcome>> {
        let path = self.require_selected()?;
        if path.is_dir() {
            self.enter_directory(&path)?;
            Ok(None)
        } else {
            self.open_file(&path).map(Some)
        }
    }

    /// Hand a file to the launcher and record it in the history.
    pub fn open_file(&mut self, path: &Path) -> Result<LaunchOutcome> {
        let outcome = self.launcher.open(path)?;
        self.history.append(path)?;
        if outcome == LaunchOutcome::Resumed {
            self.refresh_preview();
        }
        Ok(outcome)
    }

    /// Navigate to the directory holding `path` and select it.
    pub fn reveal(&mut self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| Error::NotFound(path.to_path_buf()))?;
        self.enter_directory(dir)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let index = self.current.find_exact(&name);
        self.set_selection(index);
        Ok(())
    }

    pub fn toggle_mark(&mut self) -> Result<()> {
        let path = self.require_selected()?;
        match self.marked.iter().position(|marked| *marked == path) {
            Some(index) => {
                self.marked.remove(index);
            }
            None => self.marked.push(path),
        }
        self.reload()?;
        self.move_selection(1);
        Ok(())
    }

    pub fn unmark_all(&mut self) -> Result<()> {
        self.marked.clear();
        self.reload()
    }

    pub fn yank_selected(&mut self) -> Result<()> {
        let path = self.require_selected()?;
        log::debug!("explorer: yanked {:?}", path);
        self.yanked = Some(path);
        Ok(())
    }

    /// Copy the yanked entry into the current directory.
    pub fn paste(&mut self) -> Result<PathBuf> {
        let source = self.yanked.clone().ok_or(Error::NothingToPaste)?;
        let written = fs_ops::copy_into(&source, &self.current_path)?;
        self.reload()?;
        Ok(written)
    }

    pub fn yank_marked(&mut self) {
        self.yanked_marked = self.marked.clone();
    }

    /// Copy every yanked-marked entry into the current directory. Marks are
    /// left alone.
    pub fn paste_marked(&mut self) -> Result<usize> {
        if self.yanked_marked.is_empty() {
            return Err(Error::NothingToPaste);
        }
        let total = self.yanked_marked.len();
        let mut failed = 0;
        for source in &self.yanked_marked {
            if let Err(e) = fs_ops::copy_into(source, &self.current_path) {
                log::warn!("explorer: paste of {:?} failed: {}", source, e);
                failed += 1;
            }
        }
        self.reload()?;
        if failed > 0 {
            return Err(Error::Partial { failed, total });
        }
        Ok(total)
    }

    pub fn delete_selected(&mut self, forced: bool) -> Result<()> {
        let path = self.require_selected()?;
        fs_ops::delete(&path, forced)?;
        self.marked.retain(|marked| *marked != path);
        self.reload()
    }

    /// Delete every marked entry. Paths that could not be deleted stay marked.
    pub fn delete_marked(&mut self, forced: bool) -> Result<usize> {
        let total = self.marked.len();
        let mut deleted = Vec::new();
        for path in &self.marked {
            match fs_ops::delete(path, forced) {
                Ok(()) => deleted.push(path.clone()),
                Err(e) => log::warn!("explorer: delete of {:?} failed: {}", path, e),
            }
        }
        self.marked.retain(|path| !deleted.contains(path));
        self.reload()?;

        let failed = total - deleted.len();
        if failed > 0 {
            return Err(Error::Partial { failed, total });
        }
        Ok(deleted.len())
    }

    pub fn rename_selected(&mut self, new_name: &str) -> Result<()> {
        let path = self.require_selected()?;
        let renamed = fs_ops::rename_in_place(&path, new_name)?;
        self.reload()?;
        self.select_by_name(&renamed);
        Ok(())
    }

    /// Rename every marked entry through the editor.
    ///
    /// The scratch file lists one base name per line in mark order, and line
    /// `n` of the edited file renames marked entry `n`. Blank lines are
    /// skipped, extra lines are ignored, and marked entries without a line
    /// keep their name. A line naming an entry that is not being renamed
    /// fails for that entry only. Marks are cleared afterwards.
    pub fn rename_marked(&mut self) -> Result<BatchRename> {
        if self.marked.is_empty() {
            return Ok(BatchRename {
                marked: 0,
                lines: 0,
                renamed: 0,
            });
        }

        let scratch = tempfile::Builder::new()
            .prefix(RENAME_SCRATCH_PREFIX)
            .tempfile()?;
        let names: Vec<String> = self
            .marked
            .iter()
            .map(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default()
            })
            .collect();
        fs::write(scratch.path(), format!("{}\n", names.join("\n")))?;

        self.launcher.edit(scratch.path())?;

        let edited = fs::read_to_string(scratch.path())?;
        let lines: Vec<&str> = edited.lines().filter(|line| !line.is_empty()).collect();

        let mut renamed = 0;
        let mut failed = 0;

        // Everything moves aside first so swapped or cycled names never
        // land on an entry that is itself about to be renamed.
        let mut staged = Vec::new();
        for ((path, old_name), new_name) in self.marked.iter().zip(&names).zip(&lines) {
            if old_name.as_str() == *new_name {
                continue;
            }
            match fs_ops::stage_aside(path) {
                Ok(aside) => staged.push((path, aside, *new_name)),
                Err(e) => {
                    log::warn!("explorer: rename of {:?} failed: {}", path, e);
                    failed += 1;
                }
            }
        }
        for (path, aside, new_name) in staged {
            match fs_ops::rename_in_place(&aside, new_name) {
                Ok(_) => renamed += 1,
                Err(e) => {
                    log::warn!("explorer: rename of {:?} failed: {}", path, e);
                    failed += 1;
                    if let Err(e) = fs_ops::move_entry(&aside, path) {
                        log::error!("explorer: {:?} left at {:?}: {}", path, aside, e);
                    }
                }
            }
        }

        let report = BatchRename {
            marked: self.marked.len(),
            lines: lines.len(),
            renamed,
        };
        if !report.is_aligned() {
            log::warn!(
                "explorer: batch rename got {} lines for {} marked entries",
                report.lines,
                report.marked
            );
        }

        self.marked.clear();
        self.reload()?;
        if failed > 0 {
            return Err(Error::Partial {
                failed,
                total: report.marked,
            });
        }
        Ok(report)
    }

    pub fn set_anchor(&mut self, key: char) -> Result<()> {
        let path = self.require_selected()?;
        self.anchors.set(key, &path)
    }

    /// Jump to the entry bound to `key`. Returns false when no anchor exists.
    pub fn jump_to_anchor(&mut self, key: char) -> Result<bool> {
        match self.anchors.get(key)? {
            Some(path) => {
                self.reveal(&path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Step through recently opened files, newest first. The cursor moves
    /// before the lookup and saturates at both ends.
    pub fn cycle_recent(&mut self, backward: bool) -> Result<()> {
        if backward {
            self.recent_cursor = self.recent_cursor.saturating_sub(1);
        } else {
            self.recent_cursor += 1;
        }

        match self.history.get_nth(self.recent_cursor) {
            Ok(path) => self.reveal(&path),
            Err(e) => {
                if backward {
                    self.recent_cursor = 0;
                } else {
                    self.recent_cursor -= 1;
                }
                Err(e)
            }
        }
    }

    pub fn recent_cursor(&self) -> usize {
        self.recent_cursor
    }

    /// Search the current listing and jump to the first match. An empty term
    /// clears the search.
    pub fn search(&mut self, term: &str) {
        self.search_term = if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        };
        self.refresh_matches();
        if let Some(&first) = self.matches.first() {
            self.set_selection(first);
        }
    }

    fn refresh_matches(&mut self) {
        self.matches = match &self.search_term {
            Some(term) => self.current.find_matches(term),
            None => Vec::new(),
        };
    }

    /// Next match after the selection, wrapping to the first.
    pub fn next_match(&mut self) {
        let selected = self.current.selected();
        let target = self
            .matches
            .iter()
            .copied()
            .find(|&index| index > selected)
            .or_else(|| self.matches.first().copied());
        if let Some(index) = target {
            self.set_selection(index);
        }
    }

    /// Previous match before the selection, wrapping to the last.
    pub fn previous_match(&mut self) {
        let selected = self.current.selected();
        let target = self
            .matches
            .iter()
            .rev()
            .copied()
            .find(|&index| index < selected)
            .or_else(|| self.matches.last().copied());
        if let Some(index) = target {
            self.set_selection(index);
        }
    }

    /// Flip hidden-file visibility, keeping the selected entries by name.
    pub fn toggle_hidden(&mut self) -> Result<()> {
        let current_name = self.selected_entry().map(|entry| entry.rel_path.clone());
        let preview_name = self
            .preview
            .as_listing()
            .and_then(Listing::selected_entry)
            .map(|entry| entry.rel_path.clone());

        self.show_hidden = !self.show_hidden;
        if let Err(e) = self.reload() {
            self.show_hidden = !self.show_hidden;
            return Err(e);
        }

        if let Some(name) = current_name {
            let index = self.current.find_exact(&name);
            self.set_selection(index);
        }
        if let (Some(name), Some(selected)) = (preview_name, self.selected_path()) {
            if let Some(preview) = self.preview.as_listing_mut() {
                let index = preview.select(preview.find_exact(&name));
                let key = fs::canonicalize(&selected).unwrap_or(selected);
                self.memory.record_selection(&key, index);
            }
        }
        log::debug!("explorer: show_hidden = {}", self.show_hidden);
        Ok(())
    }

    pub fn make_directory(&mut self, name: &str) -> Result<()> {
        let path = self.current_path.join(name);
        fs_ops::create_directory(&path)?;
        self.reload()?;
        self.select_by_name(&path);
        Ok(())
    }

    pub fn touch(&mut self, name: &str) -> Result<()> {
        let path = self.current_path.join(name);
        fs_ops::touch_file(&path)?;
        self.reload()?;
        self.select_by_name(&path);
        Ok(())
    }

    fn select_by_name(&mut self, path: &Path) {
        if let Ok(relative) = path.strip_prefix(&self.current_path) {
            let name = relative.to_string_lossy().to_string();
            let index = self.current.find_exact(&name);
            self.set_selection(index);
        }
    }

    /// Write the current directory for the shell wrapper to `cd` into.
    pub fn write_last_dir(&self) -> Result<()> {
        fs::write(
            &self.last_dir_file,
            self.current_path.to_string_lossy().as_bytes(),
        )?;
        Ok(())
    }
}
