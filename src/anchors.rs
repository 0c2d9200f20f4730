use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SEPARATOR: &str = " > ";

/// Single-character bookmarks stored as `key > path` lines.
#[derive(Debug, Clone)]
pub struct AnchorStore {
    path: PathBuf,
}

impl AnchorStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bind `key` to `target`, replacing any previous binding in place.
    pub fn set(&self, key: char, target: &Path) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let line = format!("{}{}{}", key, SEPARATOR, target.display());
        let mut lines = self.load_lines()?;
        match lines.iter().position(|existing| parse_line(existing).map(|(k, _)| k) == Some(key)) {
            Some(index) => lines[index] = line,
            None => lines.push(line),
        }

        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&self.path, content)?;
        log::debug!("anchors: bound '{}' to {:?}", key, target);
        Ok(())
    }

    /// Path bound to `key`, if any. A missing anchors file means no anchors.
    pub fn get(&self, key: char) -> Result<Option<PathBuf>> {
        Ok(self
            .load_lines()?
            .iter()
            .filter_map(|line| parse_line(line))
            .find(|(k, _)| *k == key)
            .map(|(_, path)| PathBuf::from(path)))
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
}

fn parse_line(line: &str) -> Option<(char, &str)> {
    let (key, path) = line.split_once(SEPARATOR)?;
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(key), None) => Some((key, path)),
        _ => None,
    }
}
