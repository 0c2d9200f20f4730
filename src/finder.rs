//! Finder overlay state
//!
//! The candidate list is a recursive listing taken once when the overlay
//! opens. Every query edit bumps the generation, cancels the search still in
//! flight and produces a [`Task`] for the worker. Results carrying an older
//! generation are dropped on arrival, so only the latest query is ever shown.

use crate::async_task::Task;
use crate::error::Result;
use crate::fuzzy::{self, FuzzyMatch};
use crate::listing::{self, DirectoryEntry, ScanOptions};
use crate::preview::{self, Preview};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct Finder {
    root: PathBuf,
    show_hidden: bool,
    entries: Vec<DirectoryEntry>,
    candidates: Arc<Vec<String>>,
    query: String,
    results: Vec<FuzzyMatch>,
    selected: usize,
    generation: u64,
    cancellation_token: Option<CancellationToken>,
    preview: Preview,
}

impl Finder {
    /// Walk `root` recursively and show every entry.
    pub fn open(root: &Path, show_hidden: bool) -> Result<Self> {
        let start = std::time::Instant::now();
        let listing = listing::build_dir(
            root,
            ScanOptions {
                show_hidden,
                recursive: true,
                marked: None,
            },
        )?;
        let entries = listing.entries().to_vec();
        let candidates: Vec<String> = entries.iter().map(|entry| entry.rel_path.clone()).collect();
        log::debug!(
            "finder: {} candidates under {:?} in {:?}",
            candidates.len(),
            root,
            start.elapsed()
        );

        let mut finder = Self {
            root: root.to_path_buf(),
            show_hidden,
            entries,
            candidates: Arc::new(candidates),
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            generation: 0,
            cancellation_token: None,
            preview: Preview::Empty,
        };
        finder.results = fuzzy::search("", &finder.candidates);
        finder.refresh_preview();
        Ok(finder)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[FuzzyMatch] {
        &self.results
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Entry behind a result row.
    pub fn entry(&self, result: &FuzzyMatch) -> Option<&DirectoryEntry> {
        self.entries.get(result.index)
    }

    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.results
            .get(self.selected)
            .and_then(|result| self.entry(result))
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_entry()
            .map(|entry| self.root.join(&entry.rel_path))
    }

    pub fn push_char(&mut self, c: char) -> Option<Task> {
        let mut query = self.query.clone();
        query.push(c);
        self.set_query(query)
    }

    pub fn pop_char(&mut self) -> Option<Task> {
        let mut query = self.query.clone();
        query.pop();
        self.set_query(query)
    }

    /// Replace the query. An empty query is answered on the spot; anything
    /// else yields a search task for the worker.
    pub fn set_query(&mut self, query: String) -> Option<Task> {
        self.generation += 1;
        if let Some(token) = self.cancellation_token.take() {
            token.cancel();
        }
        self.query = query;

        if self.query.trim().is_empty() {
            let results = fuzzy::search("", &self.candidates);
            self.apply_results(self.generation, results);
            return None;
        }

        let token = CancellationToken::new();
        self.cancellation_token = Some(token.clone());
        Some(Task::FuzzySearch {
            generation: self.generation,
            query: self.query.clone(),
            candidates: Arc::clone(&self.candidates),
            cancellation_token: token,
        })
    }

    /// Install results for `generation`. Returns false and leaves the view
    /// untouched when a newer query has been issued since.
    pub fn apply_results(&mut self, generation: u64, results: Vec<FuzzyMatch>) -> bool {
        if generation != self.generation {
            log::debug!(
                "finder: dropping stale results (generation {} < {})",
                generation,
                self.generation
            );
            return false;
        }
        self.cancellation_token = None;
        self.results = results;
        self.selected = 0;
        self.refresh_preview();
        true
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.results.is_empty() {
            return;
        }
        let target = (self.selected as isize + delta).max(0) as usize;
        self.selected = target.min(self.results.len() - 1);
        self.refresh_preview();
    }

    fn refresh_preview(&mut self) {
        self.preview = match self.selected_path() {
            Some(path) => preview::load(
                &path,
                ScanOptions {
                    show_hidden: self.show_hidden,
                    ..Default::default()
                },
                0,
            ),
            None => Preview::Empty,
        };
    }

    /// Cancel any search still running.
    pub fn close(&mut self) {
        if let Some(token) = self.cancellation_token.take() {
            token.cancel();
        }
    }
}

impl Drop for Finder {
    fn drop(&mut self) {
        self.close();
    }
}
