pub mod anchors;
pub mod app;
pub mod async_task;
pub mod chord;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod explorer;
pub mod finder;
pub mod fs_ops;
pub mod fuzzy;
pub mod highlight;
pub mod history;
pub mod index_memory;
pub mod launcher;
pub mod listing;
pub mod preview;
pub mod screenshot;
pub mod theme;
pub mod ui;
