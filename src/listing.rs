//! Directory listings
//!
//! A [`Listing`] is an ordered, immutable snapshot of a directory: directories
//! first, then files, each group sorted by name. Recursive listings flatten the
//! subtree depth-first and identify every entry by its path relative to the
//! scan root. Listings are rebuilt, never patched, whenever the directory or
//! the filter flags change.

use crate::error::{Error, Result};
use ignore::WalkBuilder;
use std::cmp::Ordering;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Upper bound on entries visited by a single (recursive) scan.
pub const MAX_WALK_ENTRIES: usize = 100_000;

pub const MARK_PREFIX: &str = "m> ";

const TEXT_SNIFF_BYTES: usize = 4096;

/// A single entry of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Path relative to the scan root, e.g. `src/main.rs` in a recursive scan
    pub rel_path: String,
    pub is_dir: bool,
    pub is_executable: bool,
    pub is_marked: bool,
}

impl DirectoryEntry {
    /// Text shown in a pane: mark prefix, relative path, type suffix.
    pub fn display_text(&self) -> String {
        let mut text = String::with_capacity(self.rel_path.len() + 4);
        if self.is_marked {
            text.push_str(MARK_PREFIX);
        }
        text.push_str(&self.rel_path);
        if self.is_dir {
            text.push('/');
        } else if self.is_executable {
            text.push('*');
        }
        text
    }
}

/// Ordered directory contents plus a cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    entries: Vec<DirectoryEntry>,
    selected: usize,
}

/// Outcome of scanning a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// The path is a directory; the listing may be empty
    Directory(Listing),
    /// The path is not a directory and should be previewed as a file
    File,
}

/// Options shared by every scan
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions<'a> {
    pub show_hidden: bool,
    pub recursive: bool,
    pub marked: Option<&'a [PathBuf]>,
}

impl Listing {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries, selected: 0 }
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DirectoryEntry> {
        self.entries.get(index)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.entries.get(self.selected)
    }

    /// Move the cursor, clipping into the valid range. Returns the index
    /// actually selected.
    pub fn select(&mut self, index: usize) -> usize {
        self.selected = index.min(self.entries.len().saturating_sub(1));
        self.selected
    }

    /// Indices of entries whose name contains `term`, ignoring case.
    pub fn find_matches(&self, term: &str) -> Vec<usize> {
        let needle = term.to_lowercase();
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.rel_path.to_lowercase().contains(&needle))
            .map(|(index, _)| index)
            .collect()
    }

    /// Locate an entry by name: a single substring match wins, otherwise an
    /// entry whose name equals `term` exactly, otherwise index 0.
    pub fn find_exact(&self, term: &str) -> usize {
        let matches = self.find_matches(term);
        if matches.len() == 1 {
            return matches[0];
        }
        matches
            .into_iter()
            .find(|&index| self.entries[index].rel_path == term)
            .unwrap_or(0)
    }
}

/// Build the listing for `path`.
pub fn build(path: &Path, options: ScanOptions<'_>) -> Result<Scan> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_dir() {
        return Ok(Scan::File);
    }

    let mut entries = Vec::new();
    scan_into(path, path, &options, &mut entries)?;
    log::debug!("listing: {:?} -> {} entries", path, entries.len());
    Ok(Scan::Directory(Listing::new(entries)))
}

/// Build a listing and require `path` to be a directory.
pub fn build_dir(path: &Path, options: ScanOptions<'_>) -> Result<Listing> {
    match build(path, options)? {
        Scan::Directory(listing) => Ok(listing),
        Scan::File => Err(Error::NotADirectory(path.to_path_buf())),
    }
}

struct RawEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
    is_real_dir: bool,
    is_executable: bool,
}

fn read_level(dir: &Path, show_hidden: bool) -> Result<Vec<RawEntry>> {
    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .hidden(!show_hidden)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .build();

    let mut raw = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) if e.depth().map_or(false, |depth| depth > 0) => {
                log::warn!("listing: skipping entry in {:?}: {}", dir, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if entry.depth() == 0 {
            continue;
        }
        let path = entry.path().to_path_buf();
        let name = entry.file_name().to_string_lossy().to_string();
        let is_real_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        // Symlinks to directories are navigable, but never expanded recursively
        let is_dir = is_real_dir || path.is_dir();
        let is_executable = !is_dir && is_executable(&path);
        raw.push(RawEntry {
            name,
            path,
            is_dir,
            is_real_dir,
            is_executable,
        });
    }

    raw.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });
    Ok(raw)
}

fn scan_into(
    root: &Path,
    dir: &Path,
    options: &ScanOptions<'_>,
    entries: &mut Vec<DirectoryEntry>,
) -> Result<()> {
    for raw in read_level(dir, options.show_hidden)? {
        if entries.len() >= MAX_WALK_ENTRIES {
            return Err(Error::WalkLimit {
                limit: MAX_WALK_ENTRIES,
            });
        }

        let rel_path = raw
            .path
            .strip_prefix(root)
            .map(|rel| rel.to_string_lossy().to_string())
            .unwrap_or_else(|_| raw.name.clone());
        let is_marked = options
            .marked
            .map(|marked| marked.contains(&raw.path))
            .unwrap_or(false);

        entries.push(DirectoryEntry {
            rel_path,
            is_dir: raw.is_dir,
            is_executable: raw.is_executable,
            is_marked,
        });

        if options.recursive && raw.is_real_dir {
            scan_into(root, &raw.path, options, entries)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}

/// True when the first 4 KiB of the file contain no NUL byte and are valid
/// UTF-8. A multi-byte sequence cut off at the sniff boundary still counts
/// as text.
pub fn is_text_file(path: &Path) -> bool {
    let mut file = match fs::File::open(path) {
        Ok(file) => file,
        Err(_) => return false,
    };
    let mut buffer = Vec::with_capacity(TEXT_SNIFF_BYTES);
    if file
        .by_ref()
        .take(TEXT_SNIFF_BYTES as u64)
        .read_to_end(&mut buffer)
        .is_err()
    {
        return false;
    }
    is_text(&buffer, buffer.len() == TEXT_SNIFF_BYTES)
}

fn is_text(bytes: &[u8], truncated: bool) -> bool {
    if bytes.contains(&0) {
        return false;
    }
    match std::str::from_utf8(bytes) {
        Ok(_) => true,
        // error_len() is None only for an incomplete sequence at the very end
        Err(e) => truncated && e.error_len().is_none(),
    }
}
