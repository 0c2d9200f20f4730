use crate::highlight;
use crate::listing::{self, Listing, Scan, ScanOptions};
use ratatui::text::Line;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Bytes read from a file for its preview.
pub const MAX_PREVIEW_BYTES: u64 = 256 * 1024;

/// What the right-hand pane shows for the selected entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Listing(Listing),
    Text(Vec<Line<'static>>),
    /// Not valid text; never handed to the highlighter
    Binary,
    /// The selection is an empty directory
    Empty,
    Unavailable(String),
}

impl Preview {
    pub fn as_listing(&self) -> Option<&Listing> {
        match self {
            Preview::Listing(listing) => Some(listing),
            _ => None,
        }
    }

    pub fn as_listing_mut(&mut self) -> Option<&mut Listing> {
        match self {
            Preview::Listing(listing) => Some(listing),
            _ => None,
        }
    }
}

/// Preview `path`. Directory previews are flat scans with `remembered`
/// selected.
pub fn load(path: &Path, options: ScanOptions<'_>, remembered: usize) -> Preview {
    let options = ScanOptions {
        recursive: false,
        ..options
    };
    match listing::build(path, options) {
        Ok(Scan::Directory(listing)) if listing.is_empty() => Preview::Empty,
        Ok(Scan::Directory(mut listing)) => {
            listing.select(remembered);
            Preview::Listing(listing)
        }
        Ok(Scan::File) => load_file(path),
        Err(e) => {
            log::debug!("preview: {:?} unavailable: {}", path, e);
            Preview::Unavailable(e.to_string())
        }
    }
}

fn load_file(path: &Path) -> Preview {
    if !listing::is_text_file(path) {
        return Preview::Binary;
    }

    let mut bytes = Vec::new();
    let read = fs::File::open(path).and_then(|file| file.take(MAX_PREVIEW_BYTES).read_to_end(&mut bytes));
    if let Err(e) = read {
        return Preview::Unavailable(e.to_string());
    }

    let content = String::from_utf8_lossy(&bytes);
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let start = std::time::Instant::now();
    let lines = highlight::highlight(&content, &file_name);
    log::debug!("preview: highlighted {} in {:?}", file_name, start.elapsed());
    Preview::Text(lines)
}
