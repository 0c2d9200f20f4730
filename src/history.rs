//! Recent-file log
//!
//! A newline-delimited file of opened paths, oldest first. Appends skip a
//! path equal to the last line, and the file is trimmed to the newest
//! `max_len` lines on every append and every read.

use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_len: usize,
}

impl HistoryStore {
    pub fn new(path: PathBuf, max_len: usize) -> Self {
        Self { path, max_len }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Record `entry` as the most recently opened file.
    pub fn append(&self, entry: &Path) -> Result<()> {
        let entry = entry.to_string_lossy().to_string();
        let mut lines = self.load_lines()?;
        if lines.last() != Some(&entry) {
            lines.push(entry);
        }
        self.trim(&mut lines);
        self.store(&lines)
    }

    /// Trimmed history, most recent last.
    pub fn read_recent(&self) -> Result<Vec<String>> {
        let mut lines = self.load_lines()?;
        if self.trim(&mut lines) {
            self.store(&lines)?;
        }
        Ok(lines)
    }

    /// The `index`-th most recent path, 0 being the newest.
    pub fn get_nth(&self, index: usize) -> Result<PathBuf> {
        let lines = self.read_recent()?;
        if index >= lines.len() {
            return Err(Error::HistoryOutOfRange {
                index,
                len: lines.len(),
            });
        }
        Ok(PathBuf::from(&lines[lines.len() - index - 1]))
    }

    fn load_lines(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Drop lines from the head until at most `max_len` remain.
    fn trim(&self, lines: &mut Vec<String>) -> bool {
        let overflow = lines.len().saturating_sub(self.max_len);
        if overflow > 0 {
            log::debug!("history: trimming {} old entries", overflow);
            lines.drain(..overflow);
        }
        overflow > 0
    }

    fn store(&self, lines: &[String]) -> Result<()> {
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir, max_len: usize) -> HistoryStore {
        HistoryStore::new(dir.path().join("history"), max_len)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let history = store(&dir, 5);
        assert!(history.read_recent().unwrap().is_empty());
    }

    #[test]
    fn test_append_skips_immediate_duplicate() {
        let dir = TempDir::new().unwrap();
        let history = store(&dir, 5);
        history.append(Path::new("/a")).unwrap();
        history.append(Path::new("/a")).unwrap();
        history.append(Path::new("/b")).unwrap();
        history.append(Path::new("/a")).unwrap();
        assert_eq!(history.read_recent().unwrap(), vec!["/a", "/b", "/a"]);
    }

    #[test]
    fn test_trims_to_newest_entries() {
        let dir = TempDir::new().unwrap();
        let history = store(&dir, 3);
        for name in ["/1", "/2", "/3", "/4", "/5"] {
            history.append(Path::new(name)).unwrap();
        }
        assert_eq!(history.read_recent().unwrap(), vec!["/3", "/4", "/5"]);
        let on_disk = fs::read_to_string(history.path()).unwrap();
        assert_eq!(on_disk, "/3\n/4\n/5\n");
    }

    #[test]
    fn test_read_trims_oversized_file() {
        let dir = TempDir::new().unwrap();
        let history = store(&dir, 2);
        fs::write(history.path(), "/x\n/y\n/z\n").unwrap();
        assert_eq!(history.read_recent().unwrap(), vec!["/y", "/z"]);
        assert_eq!(fs::read_to_string(history.path()).unwrap(), "/y\n/z\n");
    }

    #[test]
    fn test_get_nth_counts_from_newest() {
        let dir = TempDir::new().unwrap();
        let history = store(&dir, 10);
        for name in ["/old", "/mid", "/new"] {
            history.append(Path::new(name)).unwrap();
        }
        assert_eq!(history.get_nth(0).unwrap(), PathBuf::from("/new"));
        assert_eq!(history.get_nth(2).unwrap(), PathBuf::from("/old"));
        assert!(matches!(
            history.get_nth(3),
            Err(Error::HistoryOutOfRange { index: 3, len: 3 })
        ));
    }

    proptest! {
        #[test]
        fn prop_history_never_exceeds_max_len(
            max_len in 1usize..8,
            picks in proptest::collection::vec(0u8..4, 0..30),
        ) {
            let dir = TempDir::new().unwrap();
            let history = store(&dir, max_len);
            let mut appended = 0usize;
            let mut last: Option<u8> = None;
            for pick in &picks {
                history.append(Path::new(&format!("/f{}", pick))).unwrap();
                if last != Some(*pick) {
                    appended += 1;
                }
                last = Some(*pick);
            }
            let lines = history.read_recent().unwrap();
            prop_assert_eq!(lines.len(), appended.min(max_len));
            for pair in lines.windows(2) {
                prop_assert_ne!(&pair[0], &pair[1]);
            }
            if let Some(pick) = picks.last() {
                let newest = format!("/f{}", pick);
                prop_assert_eq!(lines.last(), Some(&newest));
            }
        }
    }
}
