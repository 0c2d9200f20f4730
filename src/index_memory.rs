use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Remembers, per directory, which entry was selected last.
///
/// Keys are expected to be canonical absolute paths; canonicalizing is the
/// caller's job. Lives for the session and is never persisted.
#[derive(Debug, Default, Clone)]
pub struct PathIndexMemory {
    indices: HashMap<PathBuf, usize>,
}

impl PathIndexMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_selection(&mut self, dir: &Path, index: usize) {
        self.indices.insert(dir.to_path_buf(), index);
    }

    pub fn get_selection(&self, dir: &Path) -> usize {
        self.indices.get(dir).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
