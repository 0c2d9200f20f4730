use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Directory is empty: {0:?}")]
    EmptyDirectory(PathBuf),

    #[error("Not found: {0:?}")]
    NotFound(PathBuf),

    #[error("History index {index} out of range ({len} entries)")]
    HistoryOutOfRange { index: usize, len: usize },

    #[error("Already exists: {0:?}")]
    AlreadyExists(PathBuf),

    #[error("Cannot copy {src:?} into itself ({dest:?})")]
    CopyIntoSelf { src: PathBuf, dest: PathBuf },

    #[error("Nothing to paste")]
    NothingToPaste,

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Directory walk stopped after {limit} entries")]
    WalkLimit { limit: usize },

    #[error("{failed} of {total} entries failed")]
    Partial { failed: usize, total: usize },

    #[error("Error: {0}")]
    Generic(String),
}

impl From<ignore::Error> for Error {
    fn from(error: ignore::Error) -> Self {
        match error.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::Generic("directory walk failed".to_string()),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        let message = error.to_string();
        match error.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::Generic(message),
        }
    }
}
